//! Frame rendering for `simulate`: JSON lines, SVG path data, or a table.

#[cfg(test)]
#[path = "output_test.rs"]
mod output_test;

use std::io::Write;

use serde::Serialize;
use waterdrop::contour::{LEADING, TOP, TRAILING};
use waterdrop::{Contour, DropEngine, Phase, path};

use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// One JSON object per frame.
    Json,
    /// One SVG path `d` string per frame.
    Svg,
    /// Fixed-width columns for reading in a terminal.
    Table,
    /// One JSON array of sampled outline points per frame.
    Points,
}

/// Points per cubic span for [`Format::Points`].
const SAMPLES_PER_SPAN: u32 = 12;

/// Snapshot of the engine after one input call.
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub frame: usize,
    pub phase: Phase,
    pub progress: f64,
    pub settled: bool,
    pub contour: Option<Contour>,
}

impl FrameRecord {
    pub fn capture(frame: usize, engine: &DropEngine) -> Self {
        Self {
            frame,
            phase: engine.phase(),
            progress: engine.progress(),
            settled: engine.is_settled(),
            contour: engine.contour(),
        }
    }
}

pub fn write_header(out: &mut impl Write, format: Format) -> Result<(), CliError> {
    if format == Format::Table {
        writeln!(
            out,
            "{:>5}  {:<11} {:>10} {:>10} {:>10} {:>10} {:>10} {:>9}",
            "frame", "phase", "progress", "leading", "middle", "trailing", "width", "handle"
        )?;
    }
    Ok(())
}

pub fn write_frame(out: &mut impl Write, format: Format, record: &FrameRecord) -> Result<(), CliError> {
    match format {
        Format::Json => {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
        Format::Svg => {
            let data = record.contour.as_ref().map(path::svg_path_data).unwrap_or_default();
            writeln!(out, "{data}")?;
        }
        Format::Table => {
            let anchors = record.contour.map(|c| c.anchors()).unwrap_or_default();
            let handle = record.contour.map_or(0.0, |c| c.curvature());
            let width = record.contour.map_or(0.0, |c| {
                let (lo, hi) = c.x_extent();
                hi - lo
            });
            writeln!(
                out,
                "{:>5}  {:<11} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>9.3}",
                record.frame,
                phase_name(record.phase),
                record.progress,
                anchors[LEADING].x,
                anchors[TOP].x,
                anchors[TRAILING].x,
                width,
                handle
            )?;
        }
        Format::Points => {
            let points = record.contour.as_ref().map(|c| path::sample(c, SAMPLES_PER_SPAN)).unwrap_or_default();
            serde_json::to_writer(&mut *out, &points)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Rest => "rest",
        Phase::Stretch => "stretch",
        Phase::Ellipse => "ellipse",
        Phase::Translate => "translate",
        Phase::Recontract => "recontract",
        Phase::Shrink => "shrink",
        Phase::Overshoot => "overshoot",
    }
}
