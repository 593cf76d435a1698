use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use gitchest_core::ports::{AppConfig, ConfigStore};
use std::fs;
use std::path::{Path, PathBuf};

/// File-based configuration store that implements ConfigStore
pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Result<Self> {
        let config_path = Self::get_default_config_path()?;
        Ok(Self { config_path })
    }

    pub fn with_path<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    fn get_default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "gitchest")
            .context("Failed to determine project directories")?;

        let config_dir = proj_dirs.config_dir();
        Ok(config_dir.join("gitchest.toml"))
    }

    /// Create default config if it doesn't exist
    fn ensure_config_exists(&self) -> Result<()> {
        if !self.config_path.exists() {
            if let Some(parent) = self.config_path.parent() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
            self.save(&AppConfig::default())?;
        }
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<AppConfig> {
        self.ensure_config_exists()?;

        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config: AppConfig = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        // A blank channel name never receives progress
        if config.progress_channel.trim().is_empty() {
            bail!("progress_channel is empty in config file: {}", self.config_path.display());
        }

        Ok(config)
    }

    fn save(&self, config: &AppConfig) -> Result<()> {
        let contents =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!("Failed to write config file: {}", self.config_path.display())
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitchest_core::domain::{AutoSync, Platform};
    use tempfile::TempDir;

    #[test]
    fn test_config_load_nonexistent_creates_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("gitchest.toml");

        let store = FileConfigStore::with_path(&config_path);
        let config = store.load()?;

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.progress_channel, "add-repo-progress");
        assert!(config_path.exists());

        Ok(())
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("test.toml");
        let store = FileConfigStore::with_path(&config_path);

        let mut config = AppConfig::default();
        config.stale_after_secs = 5;
        config.defaults.platform = Platform::GitLab;
        config.defaults.auto_sync = AutoSync::Disabled;

        store.save(&config)?;
        let loaded = store.load()?;

        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(&config_path, "version = 1\nstale_after_secs = 90\n")?;

        let config = FileConfigStore::with_path(&config_path).load()?;
        assert_eq!(config.stale_after_secs, 90);
        assert_eq!(config.toast_secs, 10);
        assert!(config.defaults.add_submodules);
        Ok(())
    }

    #[test]
    fn test_partial_defaults_table() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("defaults.toml");
        fs::write(&config_path, "version = 1\n\n[defaults]\nplatform = \"gitlab\"\n")?;

        let config = FileConfigStore::with_path(&config_path).load()?;
        assert_eq!(config.defaults.platform, Platform::GitLab);
        assert_eq!(config.defaults.auto_sync, AutoSync::Global);
        assert!(config.defaults.add_submodules);
        assert!(!config.defaults.clone_data);
        Ok(())
    }

    #[test]
    fn test_blank_progress_channel_is_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("blank.toml");
        fs::write(&config_path, "version = 1\nprogress_channel = \"  \"\n")?;

        let err = FileConfigStore::with_path(&config_path).load().unwrap_err();
        assert!(err.to_string().contains("progress_channel is empty"));
        Ok(())
    }

    #[test]
    fn test_malformed_config_reports_path() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "version = \"one\"")?;

        let err = FileConfigStore::with_path(&config_path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }

    #[test]
    fn test_get_default_config_path() -> Result<()> {
        let path = FileConfigStore::get_default_config_path()?;
        assert!(path.ends_with("gitchest.toml"));
        Ok(())
    }
}
