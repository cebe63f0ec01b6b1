use chart_dashboard::api::{DashboardConfig, InputEvent, OutputSet, OutputSetJsonContractV1};
use chart_dashboard::render::{JsonLinesRenderer, NullRenderer, Renderer};

fn config() -> DashboardConfig {
    DashboardConfig::from_json_str(
        r#"{
            "source": { "mode": "generated", "days": 20, "volatility": 0.0 },
            "defaults": { "range_end": "2023-01-10" }
        }"#,
    )
    .expect("parse")
}

#[test]
fn null_renderer_counts_published_charts() {
    let mut controller = config().start().expect("start");
    let mut renderer = NullRenderer::default();

    renderer.render(controller.outputs()).expect("render");
    assert_eq!(renderer.frames, 1);
    assert_eq!(renderer.last_chart_count, 5);
    assert_eq!(renderer.last_error_count, 0);
    // main, summary slices, totals, histogram samples, box samples
    assert_eq!(renderer.last_point_count, 10 + 2 + 2 + 10 + 10);

    let outputs = controller.handle(InputEvent::ChartKind("radar".to_owned()));
    renderer.render(outputs).expect("render");
    assert_eq!(renderer.frames, 2);
    assert_eq!(renderer.last_error_count, 1);
    assert_eq!(renderer.last_point_count, 2 + 2 + 10 + 10);
}

#[test]
fn null_renderer_accepts_empty_output_set() {
    let mut renderer = NullRenderer::default();
    renderer.render(&OutputSet::default()).expect("render");
    assert_eq!(renderer.frames, 1);
    assert_eq!(renderer.last_chart_count, 0);
}

#[test]
fn json_lines_renderer_writes_one_contract_per_cycle() {
    let mut controller = config().start().expect("start");
    let mut renderer = JsonLinesRenderer::new(Vec::new());

    renderer.render(controller.outputs()).expect("render");
    let outputs = controller.handle(InputEvent::Category("League Two".to_owned()));
    renderer.render(outputs).expect("render");

    let written = String::from_utf8(renderer.into_inner()).expect("utf8");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        let payload: OutputSetJsonContractV1 = serde_json::from_str(line).expect("contract line");
        assert_eq!(payload.outputs.len(), 6);
    }
    let last: OutputSetJsonContractV1 = serde_json::from_str(lines[1]).expect("contract line");
    assert_eq!(&last.outputs, controller.outputs());
}

#[test]
fn pretty_json_renderer_output_parses() {
    let controller = config().start().expect("start");
    let mut renderer = JsonLinesRenderer::new(Vec::new()).pretty(true);
    renderer.render(controller.outputs()).expect("render");

    let written = String::from_utf8(renderer.into_inner()).expect("utf8");
    assert!(written.lines().count() > 1);
    let parsed = OutputSet::from_json_compat_str(&written).expect("parse");
    assert_eq!(&parsed, controller.outputs());
}
