// Domain layer - Pure models and rules, no I/O
pub mod dashboard;
pub mod experiment;
pub mod run;
pub mod selection;
pub mod smoothing;
pub mod telemetry;
pub mod time_format;
pub mod view_context;
pub mod workload;
