use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use waterdrop::{ConfigError, DropConfig, DropEngine, EngineError, Phase, ProgressMode};

mod output;

use output::{Format, FrameRecord};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration rejected: {0}")]
    Config(#[from] ConfigError),
    #[error("engine rejected input: {0}")]
    Engine(#[from] EngineError),
    #[error("io failed: {0}")]
    Io(#[from] io::Error),
    #[error("json encode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("step must be positive and finite, got {0}")]
    InvalidStep(f64),
}

#[derive(Parser, Debug)]
#[command(name = "waterdrop", about = "Drive the water-drop contour engine with synthetic input")]
struct Cli {
    /// Log verbosity on stderr: -v for debug, -vv for trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one drop from rest through the spring and print every frame.
    Simulate(SimulateArgs),
    /// Print the phase length and progress breakpoints for a drop.
    Thresholds(ShapeArgs),
}

#[derive(Args, Debug)]
struct ShapeArgs {
    #[arg(long, env = "WATERDROP_RADIUS", default_value_t = 50.0)]
    radius: f64,

    #[arg(long, env = "WATERDROP_TRAVEL", default_value_t = 600.0)]
    travel: f64,

    /// JSON tuning file; without it tuning comes from WATERDROP_* variables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured progress mode; tuning values are kept.
    #[arg(long)]
    mode: Option<ProgressMode>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    shape: ShapeArgs,

    /// Progress per input event, in travel units.
    #[arg(long, default_value_t = 10.0)]
    step: f64,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    #[arg(long, default_value_t = 10_000)]
    max_frames: usize,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match cli.command {
        Command::Simulate(args) => run_simulate(&args, &mut out)?,
        Command::Thresholds(args) => run_thresholds(&args, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn load_config(args: &ShapeArgs) -> Result<DropConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => DropConfig::from_json(&fs::read_to_string(path)?)?,
        None => DropConfig::from_env()?,
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    Ok(config)
}

fn configure(args: &ShapeArgs) -> Result<DropEngine, CliError> {
    let config = load_config(args)?;
    Ok(DropEngine::configured(config, args.radius, args.travel)?)
}

fn run_thresholds(args: &ShapeArgs, out: &mut impl Write) -> Result<(), CliError> {
    let engine = configure(args)?;
    let Some(thresholds) = engine.thresholds() else {
        return Err(EngineError::NotConfigured.into());
    };
    writeln!(out, "phase_length {}", thresholds.phase_length)?;
    let starts = Phase::SEQUENCE.iter().map(|&phase| (phase, thresholds.start(phase)));
    for (phase, start) in starts {
        writeln!(out, "{:<11} {start}", output::phase_name(phase))?;
    }
    Ok(())
}

fn run_simulate(args: &SimulateArgs, out: &mut impl Write) -> Result<(), CliError> {
    if !(args.step.is_finite() && args.step > 0.0) {
        return Err(CliError::InvalidStep(args.step));
    }
    let mut engine = configure(&args.shape)?;
    let mode = engine.config().mode;
    let span = engine.thresholds().map_or(0.0, |t| t.settle_point());

    output::write_header(out, args.format)?;
    output::write_frame(out, args.format, &FrameRecord::capture(0, &engine))?;
    if mode == ProgressMode::Static {
        return Ok(());
    }

    let fraction_step = args.step / span;
    let mut fraction = 0.0_f64;
    for frame in 1..=args.max_frames {
        if engine.is_settled() {
            break;
        }
        if engine.phase() == Phase::Overshoot {
            engine.tick()?;
        } else if mode == ProgressMode::Paging {
            let next = (fraction + fraction_step).min(1.0);
            engine.advance_fraction(fraction, next)?;
            fraction = next;
        } else {
            engine.advance(args.step)?;
        }
        output::write_frame(out, args.format, &FrameRecord::capture(frame, &engine))?;
    }

    if !engine.is_settled() {
        tracing::warn!(max_frames = args.max_frames, phase = ?engine.phase(), "stopped before the drop settled");
    }
    Ok(())
}
