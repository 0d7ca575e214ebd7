//! End-to-end properties of the public series builder API.

use experiment_telemetry::domain::run::{Run, RunStatus, Sample};
use experiment_telemetry::domain::telemetry::SeriesPoint;
use experiment_telemetry::domain::view_context::ViewContext;
use experiment_telemetry::domain::workload::WorkloadGroup;
use experiment_telemetry::{build, format_group_label};
use serde_json::json;

fn run(id: &str, workload: serde_json::Value, samples: &[(i64, f64)]) -> Run {
    Run {
        id: id.to_string(),
        experiment_id: 3,
        experiment_name: "sweep".to_string(),
        workload_group: WorkloadGroup::from_raw(3, &workload),
        label: None,
        duration_ms: None,
        start_time: 0,
        status: RunStatus::Finished,
        model: String::new(),
        params: String::new(),
        source: String::new(),
        samples: samples
            .iter()
            .enumerate()
            .map(|(step, (t, v))| Sample::new(*t, *v, step as i64))
            .collect(),
    }
}

fn context(blob: serde_json::Value) -> ViewContext {
    serde_json::from_value(blob).expect("valid view context")
}

#[test]
fn empty_input_builds_nothing() {
    assert!(build(&[], &context(json!({ "smoothing": 30 }))).is_empty());
}

#[test]
fn samples_rezero_per_series() {
    let runs = vec![
        run("aaaaaaaa", json!(1), &[(5000, 1.0), (7000, 2.0)]),
        run("bbbbbbbb", json!(2), &[(90_000, 5.0), (91_000, 6.0)]),
    ];
    let series = build(&runs, &ViewContext::default());

    assert_eq!(
        series[0].points,
        vec![SeriesPoint::new(0, 1.0), SeriesPoint::new(2000, 2.0)]
    );
    assert_eq!(
        series[1].points,
        vec![SeriesPoint::new(0, 5.0), SeriesPoint::new(1000, 6.0)]
    );
}

#[test]
fn every_ungrouped_sentinel_splits_per_run() {
    let runs = vec![
        run("aaaaaaaa", json!(null), &[(0, 1.0)]),
        run("bbbbbbbb", json!("null"), &[(0, 1.0)]),
        run("cccccccc", json!(-1), &[(0, 1.0)]),
    ];
    let names: Vec<String> = build(&runs, &ViewContext::default())
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["3-aaaaa", "3-bbbbb", "3-ccccc"]);
}

#[test]
fn persisted_context_drives_grouping_visibility_and_smoothing() {
    let runs = vec![
        run("aaaaaaaa", json!(1), &[(0, 10.0), (10, 10.0), (20, 10.0)]),
        run("bbbbbbbb", json!(2), &[(0, 0.0), (10, 8.0)]),
        run("cccccccc", json!(2), &[(0, 1.0)]),
    ];
    let context = context(json!({
        "smoothing": 50,
        "expandedGroups": ["3-2"],
        "hiddenSeriesNames": ["Workload 3-1"],
        "zoomRange": { "min": 0, "max": 10 }
    }));

    let series = build(&runs, &context);
    let summary: Vec<(&str, bool, usize)> = series
        .iter()
        .map(|s| (s.name.as_str(), s.visible, s.points.len()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Workload 3-1", false, 3),
            ("3-2-bbbbb", true, 2),
            ("3-2-ccccc", true, 1)
        ]
    );
    assert!(series[0].points.iter().all(|p| p.value() == 10.0));
    assert_eq!(series[1].points[1], SeriesPoint::new(10, 4.0));
    assert_eq!(series[2].points, vec![SeriesPoint::new(0, 1.0)]);
}

#[test]
fn group_labels_match_series_names() {
    let group = WorkloadGroup::from_raw(3, &json!(7));
    let runs = vec![run("aaaaaaaa", json!(7), &[(0, 1.0)])];
    assert_eq!(build(&runs, &ViewContext::default())[0].name, format_group_label(&group));
    assert_eq!(
        format_group_label(&WorkloadGroup::from_raw(3, &json!(null))),
        "Unsorted Runs"
    );
}
