use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "config/dashboard";
const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub postgrest: PostgrestSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PostgrestSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub endpoints: EndpointSettings,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// PostgREST view names.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EndpointSettings {
    pub experiments: String,
    pub runs: String,
    pub metrics_available: String,
    pub metrics: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            experiments: "fe_experiments".to_string(),
            runs: "fe_runs".to_string(),
            metrics_available: "fe_metrics_available".to_string(),
            metrics: "fe_metrics".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    #[serde(default = "default_view_dir")]
    pub view_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            view_dir: default_view_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChartSettings {
    /// Smoothing applied to charts that have no saved view yet.
    #[serde(default)]
    pub default_smoothing: i64,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_view_dir() -> PathBuf {
    PathBuf::from("data/views")
}

fn default_timeout_secs() -> u64 {
    30
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_dashboard_config_from(DEFAULT_CONFIG)
}

/// Load `<path>.toml` (or any extension the config crate knows), then apply
/// `DASHBOARD__SECTION__KEY` environment overrides.
pub fn load_dashboard_config_from(path: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
