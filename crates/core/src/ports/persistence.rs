use crate::domain::{AutoSync, Platform};
use anyhow::Result;

/// Configuration store interface
pub trait ConfigStore: Send + Sync {
    /// Load configuration from storage
    fn load(&self) -> Result<AppConfig>;

    /// Save configuration to storage
    fn save(&self, config: &AppConfig) -> Result<()>;
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AppConfig {
    pub version: u32,
    /// Name of the backend channel carrying progress events
    #[serde(default = "default_progress_channel")]
    pub progress_channel: String,
    /// Seconds without any event before a running import counts as stalled
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
    /// How long notifications stay visible
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
    /// Fallback tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub defaults: FormDefaults,
}

/// Initial values for the add-repository form
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub platform: Platform,
    pub auto_sync: AutoSync,
    pub add_submodules: bool,
    pub clone_data: bool,
}

fn default_progress_channel() -> String {
    "add-repo-progress".to_string()
}

fn default_stale_after_secs() -> u64 {
    30
}

fn default_toast_secs() -> u64 {
    10
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            progress_channel: default_progress_channel(),
            stale_after_secs: default_stale_after_secs(),
            toast_secs: default_toast_secs(),
            log_filter: default_log_filter(),
            defaults: FormDefaults::default(),
        }
    }
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            platform: Platform::GitHub,
            auto_sync: AutoSync::Global,
            add_submodules: true,
            clone_data: false,
        }
    }
}
