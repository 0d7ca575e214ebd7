// In-memory repositories for service tests
use crate::application::experiment_repository::{ExperimentRepository, RunSample};
use crate::application::view_repository::ViewRepository;
use crate::domain::experiment::Experiment;
use crate::domain::run::Run;
use crate::domain::selection::Selection;
use crate::domain::view_context::ViewContext;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Runs carry their samples for `metric`; everything else is keyed off them.
#[derive(Default)]
pub struct FakeExperimentRepository {
    pub experiments: Vec<Experiment>,
    pub runs: Vec<Run>,
    pub metric: String,
    pub failing: bool,
}

impl FakeExperimentRepository {
    fn check(&self) -> anyhow::Result<()> {
        if self.failing {
            anyhow::bail!("store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ExperimentRepository for FakeExperimentRepository {
    async fn list_experiments(&self) -> anyhow::Result<Vec<Experiment>> {
        self.check()?;
        Ok(self.experiments.clone())
    }

    async fn list_runs(&self) -> anyhow::Result<Vec<Run>> {
        self.check()?;
        Ok(self
            .runs
            .iter()
            .map(|r| Run {
                samples: Vec::new(),
                experiment_name: String::new(),
                ..r.clone()
            })
            .collect())
    }

    async fn list_metric_keys(&self, run_ids: &[String]) -> anyhow::Result<Vec<String>> {
        self.check()?;
        let any = self
            .runs
            .iter()
            .any(|r| run_ids.contains(&r.id) && !r.samples.is_empty());
        Ok(if any {
            vec![self.metric.clone(), self.metric.clone()]
        } else {
            Vec::new()
        })
    }

    async fn fetch_samples(
        &self,
        run_ids: &[String],
        metric: &str,
    ) -> anyhow::Result<Vec<RunSample>> {
        self.check()?;
        if metric != self.metric {
            return Ok(Vec::new());
        }
        Ok(self
            .runs
            .iter()
            .filter(|r| run_ids.contains(&r.id))
            .flat_map(|r| {
                r.samples.iter().map(|s| RunSample {
                    run_id: r.id.clone(),
                    sample: *s,
                })
            })
            .collect())
    }
}

/// With `unreadable` set, every saved view fails to load.
#[derive(Default)]
pub struct FakeViewRepository {
    pub views: Mutex<HashMap<String, ViewContext>>,
    pub selection: Mutex<Selection>,
    pub unreadable: bool,
}

#[async_trait]
impl ViewRepository for FakeViewRepository {
    async fn load_view(&self, chart_id: &str) -> anyhow::Result<Option<ViewContext>> {
        if self.unreadable {
            anyhow::bail!("view {} is corrupt", chart_id);
        }
        Ok(self.views.lock().unwrap().get(chart_id).cloned())
    }

    async fn save_view(&self, chart_id: &str, context: &ViewContext) -> anyhow::Result<()> {
        self.views
            .lock()
            .unwrap()
            .insert(chart_id.to_string(), context.clone());
        Ok(())
    }

    async fn delete_view(&self, chart_id: &str) -> anyhow::Result<bool> {
        Ok(self.views.lock().unwrap().remove(chart_id).is_some())
    }

    async fn load_selection(&self) -> anyhow::Result<Selection> {
        Ok(self.selection.lock().unwrap().clone())
    }

    async fn save_selection(&self, selection: &Selection) -> anyhow::Result<()> {
        *self.selection.lock().unwrap() = selection.clone();
        Ok(())
    }
}
