use std::fs;
use std::path::PathBuf;

use chart_dashboard::api::{DashboardConfig, InputEvent, InputState, LayoutPreset, SlotId, SourceConfig};
use chart_dashboard::chart::{ChartSpecKind, DEFAULT_HISTOGRAM_BUCKETS};
use chart_dashboard::data::GeneratedSourceConfig;
use chart_dashboard::error::DashboardError;
use chrono::NaiveDate;
use tempfile::TempDir;

const SEASON: &str = "\
date,value,category
2023-08-05,8120,League One
2023-08-05,4310,League Two
2023-08-12,7950,League One
2023-08-19,4475,League Two
";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn empty_object_is_the_default_config() {
    let config = DashboardConfig::from_json_str("{}").expect("parse");
    assert_eq!(config, DashboardConfig::default());
    assert_eq!(
        config.source,
        SourceConfig::Generated(GeneratedSourceConfig::default())
    );
    assert_eq!(config.histogram_buckets, DEFAULT_HISTOGRAM_BUCKETS);
    assert_eq!(config.layout, LayoutPreset::Overview);
    assert_eq!(config.defaults, InputState::default());
    assert_eq!(config.defaults.dataset_key(), "data1");
    assert_eq!(config.defaults.range_start(), date(2023, 1, 1));
    assert_eq!(config.defaults.range_end(), date(2023, 12, 31));
    assert_eq!(config.defaults.chart_kind(), "line");
    assert_eq!(config.defaults.category(), "All");
    config.validate().expect("default config is valid");
}

#[test]
fn config_round_trips_through_json() {
    let mut config = DashboardConfig::default();
    config.histogram_buckets = 12;
    config.layout = LayoutPreset::SingleChart;
    config.defaults = InputState::new(
        "data2",
        date(2023, 3, 1),
        date(2023, 3, 31),
        "bar",
        "League One",
    );

    let json = config.to_json_pretty().expect("serialize");
    let restored = DashboardConfig::from_json_str(&json).expect("parse");
    assert_eq!(restored, config);
}

#[test]
fn malformed_json_is_invalid_config() {
    assert!(matches!(
        DashboardConfig::from_json_str("{ not json"),
        Err(DashboardError::InvalidConfig(_))
    ));
    assert!(matches!(
        DashboardConfig::from_json_str(r#"{"source": {"mode": "remote"}}"#),
        Err(DashboardError::InvalidConfig(_))
    ));
}

#[test]
fn zero_histogram_buckets_fail_validation() {
    let config = DashboardConfig::from_json_str(r#"{"histogram_buckets": 0}"#).expect("parse");
    assert!(matches!(
        config.validate(),
        Err(DashboardError::InvalidConfig(_))
    ));
    assert!(config.start().is_err());
}

#[test]
fn generated_config_starts_and_reacts() {
    let config = DashboardConfig::from_json_str(
        r#"{
            "source": { "mode": "generated", "days": 30, "categories": ["North", "South", "East"] },
            "defaults": { "range_end": "2023-01-09" }
        }"#,
    )
    .expect("parse");
    let mut controller = config.start().expect("start");

    let summary = controller
        .outputs()
        .chart(SlotId::SUMMARY)
        .expect("summary chart");
    assert_eq!(summary.group_count(), 3);
    assert_eq!(
        controller.outputs().status(SlotId::STATUS),
        Some("Showing 9 points for data1 from 2023-01-01 to 2023-01-09")
    );

    let outputs = controller.handle(InputEvent::ChartKind("scatter".to_owned()));
    let main = outputs.chart(SlotId::MAIN).expect("main chart");
    assert_eq!(main.kind, ChartSpecKind::Scatter);
    assert_eq!(main.point_count(), 9);
}

#[test]
fn static_config_resolves_relative_paths() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("season.csv"), SEASON).expect("write csv");
    let config_path = dir.path().join("dashboard.json");
    fs::write(
        &config_path,
        r#"{
            "source": { "mode": "static", "files": { "season": "season.csv" } },
            "defaults": { "dataset_key": "season", "range_start": "2023-08-01", "range_end": "2023-08-31" }
        }"#,
    )
    .expect("write config");

    let config = DashboardConfig::from_path(&config_path).expect("load config");
    let SourceConfig::Static { files } = &config.source else {
        panic!("static source expected");
    };
    assert_eq!(files.get("season"), Some(&dir.path().join("season.csv")));

    let controller = config.start().expect("start");
    let outputs = controller.outputs();
    assert_eq!(outputs.error_slots().count(), 0);
    assert_eq!(
        outputs.status(SlotId::STATUS),
        Some("Showing 4 points for season from 2023-08-01 to 2023-08-31")
    );
}

#[test]
fn static_start_fails_when_default_dataset_is_missing() {
    let dir = TempDir::new().expect("temp dir");
    let missing: PathBuf = dir.path().join("missing.csv");
    let mut config = DashboardConfig::default();
    config.source = SourceConfig::Static {
        files: [("data1".to_owned(), missing)].into_iter().collect(),
    };

    match config.start() {
        Err(DashboardError::DataUnavailable { key, .. }) => assert_eq!(key, "data1"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("start must fail without the default dataset"),
    }
}

#[test]
fn static_file_removed_mid_session_is_slot_local() {
    let dir = TempDir::new().expect("temp dir");
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    fs::write(&first, SEASON).expect("write csv");
    fs::write(&second, SEASON).expect("write csv");

    let mut config = DashboardConfig::default();
    config.source = SourceConfig::Static {
        files: [
            ("first".to_owned(), first),
            ("second".to_owned(), second.clone()),
        ]
        .into_iter()
        .collect(),
    };
    config.defaults =
        InputState::new("first", date(2023, 8, 1), date(2023, 8, 31), "line", "All");
    let mut controller = config.start().expect("start");

    fs::remove_file(&second).expect("remove csv");
    let outputs = controller.handle(InputEvent::DatasetKey("second".to_owned()));
    assert_eq!(outputs.error_slots().count(), 5);
    let status = outputs.status(SlotId::STATUS).expect("status");
    assert!(status.starts_with("Error: data unavailable for `second`"));

    let outputs = controller.handle(InputEvent::DatasetKey("first".to_owned()));
    assert_eq!(outputs.error_slots().count(), 0);
}

#[test]
fn custom_layout_loads_from_json() {
    let config = DashboardConfig::from_json_str(
        r#"{
            "layout": { "custom": [
                {
                    "id": "trend",
                    "title": "Trend",
                    "content": { "type": "chart", "kind": "input", "fields": { "x": "date", "y": "value" } },
                    "depends_on": ["dataset_key", "range_start", "range_end", "chart_kind", "category"]
                },
                {
                    "id": "status",
                    "title": "Status",
                    "content": { "type": "status" },
                    "depends_on": ["dataset_key", "range_start", "range_end", "category"]
                }
            ] }
        }"#,
    )
    .expect("parse");
    let layout = config.layout().expect("valid layout");
    assert_eq!(layout.len(), 2);

    let controller = config.start().expect("start");
    assert_eq!(
        controller.outputs().slot_ids().collect::<Vec<_>>(),
        ["trend", "status"]
    );
}

#[test]
fn custom_layout_with_undeclared_input_is_rejected() {
    let config = DashboardConfig::from_json_str(
        r#"{
            "layout": { "custom": [
                {
                    "id": "trend",
                    "title": "Trend",
                    "content": { "type": "chart", "kind": "input", "fields": { "x": "date", "y": "value" } },
                    "depends_on": ["dataset_key"]
                }
            ] }
        }"#,
    )
    .expect("parse");
    assert!(matches!(
        config.start(),
        Err(DashboardError::InvalidConfig(_))
    ));
}
