// Series builder - Turns raw run samples into chart-ready series
//
// Pure: the same runs and view context always produce the same series. The
// view context is read, never modified.
use crate::domain::run::{Run, RunSummary};
use crate::domain::smoothing::calc_ema;
use crate::domain::telemetry::{Series, SeriesPoint};
use crate::domain::view_context::ViewContext;
use crate::domain::workload::{format_group_label, WorkloadGroup};
use std::collections::{HashMap, HashSet};

const SERIES_ID_CHARS: usize = 5;

/// What a series is keyed on: a collapsed workload, or a single run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SeriesKey {
    Workload(WorkloadGroup),
    Run { run_id: String, name: String },
}

impl SeriesKey {
    fn for_run(run: &Run, expanded: &HashSet<WorkloadGroup>) -> Self {
        let group = &run.workload_group;
        if group.is_ungrouped() || expanded.contains(group) {
            SeriesKey::Run {
                run_id: run.id.clone(),
                name: run_series_name(run),
            }
        } else {
            SeriesKey::Workload(group.clone())
        }
    }

    fn id(&self) -> String {
        match self {
            SeriesKey::Workload(group) => format!("workload:{}", group.key()),
            SeriesKey::Run { run_id, .. } => format!("run:{}", run_id),
        }
    }

    fn display_name(&self) -> String {
        match self {
            SeriesKey::Workload(group) => format_group_label(group),
            SeriesKey::Run { name, .. } => name.clone(),
        }
    }
}

fn run_series_name(run: &Run) -> String {
    let base = run.workload_group.run_name_base();
    let short_id = run.short_id(SERIES_ID_CHARS);
    match run.label.as_deref() {
        None => format!("{}-{}", base, short_id),
        Some(label) if label.chars().count() == 1 => format!("{} {}", base, label),
        Some(label) => format!("{} {} ({})", base, label, short_id),
    }
}

struct SeriesAccumulator {
    key: SeriesKey,
    points: Vec<SeriesPoint>,
    source_runs: Vec<RunSummary>,
}

impl SeriesAccumulator {
    fn new(key: SeriesKey) -> Self {
        Self {
            key,
            points: Vec::new(),
            source_runs: Vec::new(),
        }
    }

    fn absorb(&mut self, run: &Run) {
        self.points.extend(
            run.samples
                .iter()
                .map(|s| SeriesPoint::new(s.timestamp, s.value)),
        );
        if !self.source_runs.iter().any(|r| r.id == run.id) {
            self.source_runs.push(run.summary());
        }
    }

    fn finish(self, context: &ViewContext) -> Series {
        let name = self.key.display_name();
        let visible = !context.is_hidden(&name);
        let points = smooth(normalize_points(self.points), context.smoothing_weight());

        Series {
            id: self.key.id(),
            name,
            points,
            visible,
            source_runs: self.source_runs,
        }
    }
}

/// Build one series per workload (or per run for unsorted and expanded workloads).
pub fn build(runs: &[Run], context: &ViewContext) -> Vec<Series> {
    let mut accumulators: Vec<SeriesAccumulator> = Vec::new();
    let mut slots: HashMap<SeriesKey, usize> = HashMap::new();
    let expanded = context.expanded_workloads();

    for run in runs.iter().filter(|r| !r.samples.is_empty()) {
        let key = SeriesKey::for_run(run, &expanded);
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            accumulators.push(SeriesAccumulator::new(key));
            accumulators.len() - 1
        });
        accumulators[slot].absorb(run);
    }

    tracing::debug!(
        "Built {} series from {} runs (smoothing {})",
        accumulators.len(),
        runs.len(),
        context.smoothing_weight()
    );

    accumulators
        .into_iter()
        .map(|acc| acc.finish(context))
        .collect()
}

/// Stable-sort by time and shift so the earliest point sits at zero.
pub fn normalize_points(mut points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    points.sort_by_key(|p| p.time_ms());
    let Some(t0) = points.first().map(|p| p.time_ms()) else {
        return points;
    };
    points
        .into_iter()
        .map(|p| SeriesPoint::new(p.time_ms().saturating_sub(t0), p.value()))
        .collect()
}

fn smooth(points: Vec<SeriesPoint>, weight_percent: u8) -> Vec<SeriesPoint> {
    if weight_percent == 0 || points.len() < 2 {
        return points;
    }
    let times: Vec<i64> = points.iter().map(|p| p.time_ms()).collect();
    let values: Vec<f64> = points.iter().map(|p| p.value()).collect();
    SeriesPoint::pair(&times, &calc_ema(&values, weight_percent))
}
