// Streaming dashboard service - Progressive loading of several metric charts
use crate::application::chart_service::ChartService;
use crate::domain::dashboard::{ChartSkeleton, CompletionEvent, DashboardSkeleton, StreamMessage};
use crate::domain::telemetry::ChartData;
use crate::domain::view_context::ViewContext;
use std::collections::HashSet;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct StreamingDashboardService {
    charts: ChartService,
}

impl StreamingDashboardService {
    pub fn new(charts: ChartService) -> Self {
        Self { charts }
    }

    /// Sends a skeleton, then one update per metric as each chart is ready,
    /// then a completion event once every chart task has finished.
    pub fn stream_charts(
        &self,
        run_ids: Vec<String>,
        metrics: Vec<String>,
        context: Option<ViewContext>,
    ) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(100);
        let start_time = Instant::now();

        let mut metrics = metrics;
        let mut seen = HashSet::new();
        metrics.retain(|m| seen.insert(ChartData::id_for_metric(m)));

        let skeleton = DashboardSkeleton {
            run_ids: run_ids.clone(),
            charts: metrics
                .iter()
                .map(|m| ChartSkeleton {
                    id: ChartData::id_for_metric(m),
                    metric: m.clone(),
                })
                .collect(),
        };
        let total_charts = skeleton.charts.len();

        let service = self.charts.clone();
        tokio::spawn(async move {
            if tx.send(StreamMessage::Skeleton(skeleton)).await.is_err() {
                return;
            }

            let mut handles = Vec::with_capacity(metrics.len());
            for metric in metrics {
                let tx = tx.clone();
                let service = service.clone();
                let run_ids = run_ids.clone();
                let context = context.clone();

                handles.push(tokio::spawn(async move {
                    match service.build_chart(&run_ids, &metric, context).await {
                        Ok(chart) => {
                            let _ = tx.send(StreamMessage::ChartUpdate(chart)).await;
                        }
                        Err(e) => {
                            tracing::error!("Error building chart for {}: {:#}", metric, e);
                        }
                    }
                }));
            }

            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!("Chart task failed: {}", e);
                }
            }

            let complete = CompletionEvent {
                charts: total_charts,
                duration_ms: start_time.elapsed().as_millis() as i64,
            };
            let _ = tx.send(StreamMessage::Complete(complete)).await;
        });

        rx
    }
}
