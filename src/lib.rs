// Experiment telemetry dashboard: series building core plus its collaborators
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::series_builder::build;
pub use domain::workload::format_group_label;
