// Telemetry series domain models
use super::run::RunSummary;
use super::view_context::ViewContext;
use serde::{Deserialize, Serialize};

/// `[elapsed_ms, value]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint(pub i64, pub f64);

impl SeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self(time_ms, value)
    }

    pub fn time_ms(&self) -> i64 {
        self.0
    }

    pub fn value(&self) -> f64 {
        self.1
    }

    /// Zip separate time and value columns back into points.
    ///
    /// Panics when the columns differ in length: that is a caller bug, not data.
    pub fn pair(times: &[i64], values: &[f64]) -> Vec<SeriesPoint> {
        assert_eq!(
            times.len(),
            values.len(),
            "time and value columns must have the same length"
        );
        times
            .iter()
            .zip(values)
            .map(|(t, v)| SeriesPoint::new(*t, *v))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: String,
    pub name: String,
    pub points: Vec<SeriesPoint>,
    pub visible: bool,
    pub source_runs: Vec<RunSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: String,
    pub metric: String,
    pub series: Vec<Series>,
    pub context: ViewContext,
}

impl ChartData {
    pub fn new(id: String, metric: String, series: Vec<Series>, context: ViewContext) -> Self {
        Self {
            id,
            metric,
            series,
            context,
        }
    }

    /// Chart ids are derived from the metric so reloads find their persisted view.
    ///
    /// Distinct metrics always get distinct ids. Lowercase letters, digits and
    /// `_` are kept, an uppercase letter becomes `-` plus its lowercase form,
    /// and every other byte becomes `--` plus two hex digits.
    pub fn id_for_metric(metric: &str) -> String {
        let mut id = String::with_capacity(metric.len());
        for c in metric.chars() {
            match c {
                'a'..='z' | '0'..='9' | '_' => id.push(c),
                'A'..='Z' => {
                    id.push('-');
                    id.push(c.to_ascii_lowercase());
                }
                _ => {
                    let mut buf = [0u8; 4];
                    for byte in c.encode_utf8(&mut buf).bytes() {
                        id.push_str(&format!("--{:02x}", byte));
                    }
                }
            }
        }
        id
    }
}

/// CSV export of the visible series.
pub fn series_to_csv(series: &[Series]) -> String {
    let mut csv = String::from("series,elapsed_ms,value\n");
    for s in series.iter().filter(|s| s.visible) {
        let name = escape_csv(&s.name);
        for point in &s.points {
            csv.push_str(&format!("{},{},{}\n", name, point.time_ms(), point.value()));
        }
    }
    csv
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, visible: bool, points: Vec<SeriesPoint>) -> Series {
        Series {
            id: name.to_string(),
            name: name.to_string(),
            points,
            visible,
            source_runs: Vec::new(),
        }
    }

    #[test]
    fn test_point_wire_format() {
        let encoded = serde_json::to_string(&SeriesPoint::new(2000, 1.5)).unwrap();
        assert_eq!(encoded, "[2000,1.5]");
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_pair_rejects_mismatched_columns() {
        SeriesPoint::pair(&[0, 1, 2], &[1.0, 2.0]);
    }

    #[test]
    fn test_csv_skips_hidden_series() {
        let all = vec![
            series("Workload 3-1", true, vec![SeriesPoint::new(0, 1.0), SeriesPoint::new(10, 2.5)]),
            series("hidden", false, vec![SeriesPoint::new(0, 9.0)]),
            series("3 lr, wd (abcde)", true, vec![SeriesPoint::new(0, 4.0)]),
        ];
        assert_eq!(
            series_to_csv(&all),
            "series,elapsed_ms,value\n\
             Workload 3-1,0,1\n\
             Workload 3-1,10,2.5\n\
             \"3 lr, wd (abcde)\",0,4\n"
        );
    }

    #[test]
    fn test_id_for_metric() {
        assert_eq!(ChartData::id_for_metric("loss"), "loss");
        assert_eq!(ChartData::id_for_metric("gpu_util"), "gpu_util");
        assert_eq!(ChartData::id_for_metric("GPU Util"), "-g-p-u--20-util");
        assert_eq!(ChartData::id_for_metric("train/loss"), "train--2floss");
        assert_eq!(ChartData::id_for_metric("µs"), "--c2--b5s");
    }

    #[test]
    fn test_similar_metrics_get_distinct_ids() {
        let metrics = ["GPU Util", "gpu util", "GPU_Util", "gpu-util", "gpu_util", "-g"];
        let ids: std::collections::HashSet<String> =
            metrics.iter().map(|m| ChartData::id_for_metric(m)).collect();
        assert_eq!(ids.len(), metrics.len());
        assert!(ids.iter().all(|id| id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')));
    }
}
