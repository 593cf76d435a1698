use clap::{Args, Parser, Subcommand};
use gitchest_core::app::AddRepoForm;
use gitchest_core::domain::{AutoSync, Platform, WatchEvent};
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "gitchest")]
#[command(about = "Add repositories to Git Chest and follow their import progress")]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum CliCommand {
    /// Add a repository and watch the import
    Add(AddArgs),
}

#[derive(Args, Debug, PartialEq, Default)]
pub struct AddArgs {
    /// Repository URL, e.g. https://github.com/octocat/Hello-World
    pub url: Option<String>,

    /// Platform (bitbucket, github, gitlab, gitea); overrides the URL
    #[arg(long, value_parser = parse_platform)]
    pub platform: Option<Platform>,

    /// Repository owner; overrides the URL
    #[arg(long)]
    pub user: Option<String>,

    /// Repository name; overrides the URL
    #[arg(long)]
    pub repo: Option<String>,

    /// Download the repository contents as well
    #[arg(long)]
    pub clone_data: bool,

    /// Do not add submodules as repositories
    #[arg(long)]
    pub no_submodules: bool,

    /// Automatic sync mode (disabled, enabled, global)
    #[arg(long, value_parser = parse_auto_sync)]
    pub auto_sync: Option<AutoSync>,

    /// Repository events to watch; may be repeated
    #[arg(long = "watch", value_parser = parse_watch_event)]
    pub watch: Vec<WatchEvent>,
}

impl AddArgs {
    /// Apply explicit flags on top of a form that may already hold
    /// values filled from the URL
    pub fn apply_overrides(&self, form: &mut AddRepoForm) {
        if let Some(platform) = self.platform {
            form.platform = Some(platform);
        }
        if let Some(user) = &self.user {
            form.user = user.clone();
        }
        if let Some(repo) = &self.repo {
            form.repo = repo.clone();
        }
        if let Some(auto_sync) = self.auto_sync {
            form.auto_sync = auto_sync;
        }
        if self.clone_data {
            form.clone_data = true;
        }
        if self.no_submodules {
            form.add_submodules = false;
        }
        form.watch_events.extend(self.watch.iter().copied());
    }
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    value.parse().map_err(|e| format!("{}", e))
}

fn parse_auto_sync(value: &str) -> Result<AutoSync, String> {
    value.parse().map_err(|e| format!("{}", e))
}

fn parse_watch_event(value: &str) -> Result<WatchEvent, String> {
    value.parse().map_err(|e| format!("{}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitchest_core::ports::FormDefaults;

    #[test]
    fn test_cli_parse_url_only() {
        let args =
            CliArgs::parse_from(["gitchest", "add", "https://github.com/octocat/Hello-World"]);
        let CliCommand::Add(add) = args.command;
        assert_eq!(add.url.as_deref(), Some("https://github.com/octocat/Hello-World"));
        assert_eq!(args.config, None);
        assert!(add.watch.is_empty());
    }

    #[test]
    fn test_cli_parse_flags() {
        let args = CliArgs::parse_from([
            "gitchest",
            "--config", "/custom/config.toml",
            "add",
            "--platform", "gitea",
            "--user", "gitea",
            "--repo", "tea",
            "--auto-sync", "disabled",
            "--watch", "stars",
            "--watch", "pull_requests",
            "--no-submodules",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));

        let CliCommand::Add(add) = args.command;
        assert_eq!(add.platform, Some(Platform::Gitea));
        assert_eq!(add.auto_sync, Some(AutoSync::Disabled));
        assert_eq!(add.watch, vec![WatchEvent::Stars, WatchEvent::PullRequests]);
        assert!(add.no_submodules);
    }

    #[test]
    fn test_cli_rejects_unknown_platform() {
        let result = CliArgs::try_parse_from(["gitchest", "add", "--platform", "sourcehut"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_win_over_url_values() {
        let mut form = AddRepoForm::from_defaults(&FormDefaults::default());
        form.user = "octocat".into();
        form.repo = "Hello-World".into();

        let add = AddArgs {
            repo: Some("Spoon-Knife".into()),
            clone_data: true,
            ..AddArgs::default()
        };
        add.apply_overrides(&mut form);

        assert_eq!(form.user, "octocat");
        assert_eq!(form.repo, "Spoon-Knife");
        assert!(form.clone_data);
        assert!(form.add_submodules);
    }
}
