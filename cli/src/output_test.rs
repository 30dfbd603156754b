use super::*;
use waterdrop::DropConfig;

fn engine() -> DropEngine {
    DropEngine::configured(DropConfig::drag(), 50.0, 600.0).unwrap_or_default()
}

fn render(format: Format, record: &FrameRecord) -> String {
    let mut buf = Vec::new();
    assert!(write_frame(&mut buf, format, record).is_ok());
    String::from_utf8(buf).unwrap_or_default()
}

#[test]
fn json_frame_is_one_line_with_contour() {
    let line = render(Format::Json, &FrameRecord::capture(3, &engine()));
    assert_eq!(line.lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap_or_default();
    assert_eq!(value["frame"], 3);
    assert_eq!(value["phase"], "rest");
    assert_eq!(value["settled"], false);
    assert_eq!(value["contour"]["anchors"][0]["x"], 50.0);
}

#[test]
fn svg_frame_is_path_data() {
    let line = render(Format::Svg, &FrameRecord::capture(0, &engine()));
    assert!(line.starts_with("M 50 0 C "), "{line}");
    assert!(line.trim_end().ends_with('Z'));
}

#[test]
fn table_frame_lists_extremes() {
    let mut engine = engine();
    assert!(engine.advance(30.0).is_ok());
    let line = render(Format::Table, &FrameRecord::capture(1, &engine));
    let cols: Vec<&str> = line.split_whitespace().collect();
    assert_eq!(cols, vec!["1", "stretch", "30.00", "80.00", "0.00", "-50.00", "130.00", "27.614"]);
}

#[test]
fn header_only_for_table() {
    let mut buf = Vec::new();
    assert!(write_header(&mut buf, Format::Json).is_ok());
    assert!(buf.is_empty());
    assert!(write_header(&mut buf, Format::Table).is_ok());
    assert!(String::from_utf8_lossy(&buf).starts_with("frame"));
}

#[test]
fn phase_names_match_serde_names() {
    for phase in [Phase::Rest, Phase::Stretch, Phase::Overshoot, Phase::Recontract] {
        let serialized = serde_json::to_value(phase).unwrap_or_default();
        assert_eq!(serialized, phase_name(phase));
    }
}

#[test]
fn points_frame_is_a_sampled_outline() {
    let line = render(Format::Points, &FrameRecord::capture(0, &engine()));
    let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap_or_default();
    let points = value.as_array().cloned().unwrap_or_default();
    assert_eq!(points.len(), 48);
    assert_eq!(points[0]["x"], 50.0);
    assert_eq!(points[0]["y"], 0.0);
}
