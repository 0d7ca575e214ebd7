// Progressive chart dashboard messages
use super::telemetry::ChartData;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSkeleton {
    pub id: String,
    pub metric: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSkeleton {
    pub run_ids: Vec<String>,
    pub charts: Vec<ChartSkeleton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub charts: usize,
    pub duration_ms: i64,
}

/// One chunk of a streamed dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum StreamMessage {
    Skeleton(DashboardSkeleton),
    ChartUpdate(ChartData),
    Complete(CompletionEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_tagged() {
        let msg = StreamMessage::Complete(CompletionEvent {
            charts: 2,
            duration_ms: 15,
        });
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"type":"complete","payload":{"charts":2,"durationMs":15}}"#
        );
    }
}
