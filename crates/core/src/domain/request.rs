use serde::{Deserialize, Serialize};

use super::{job::JobKey, platform::Platform};

/// Repository activity the backend can be asked to watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchEvent {
    Branches,
    Contributors,
    Commits,
    Discussions,
    Forks,
    Issues,
    PullRequests,
    Releases,
    Stars,
    Tags,
}

impl WatchEvent {
    pub const ALL: [WatchEvent; 10] = [
        WatchEvent::Branches,
        WatchEvent::Contributors,
        WatchEvent::Commits,
        WatchEvent::Discussions,
        WatchEvent::Forks,
        WatchEvent::Issues,
        WatchEvent::PullRequests,
        WatchEvent::Releases,
        WatchEvent::Stars,
        WatchEvent::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchEvent::Branches => "branches",
            WatchEvent::Contributors => "contributors",
            WatchEvent::Commits => "commits",
            WatchEvent::Discussions => "discussions",
            WatchEvent::Forks => "forks",
            WatchEvent::Issues => "issues",
            WatchEvent::PullRequests => "pull_requests",
            WatchEvent::Releases => "releases",
            WatchEvent::Stars => "stars",
            WatchEvent::Tags => "tags",
        }
    }
}

impl std::str::FromStr for WatchEvent {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WatchEvent::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| crate::error::CoreError::InvalidValue {
                field: "watch_events",
                value: s.to_string(),
            })
    }
}

/// Automatic sync mode for a newly added repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoSync {
    Disabled,
    Enabled,
    #[default]
    Global,
}

impl std::str::FromStr for AutoSync {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled" => Ok(AutoSync::Disabled),
            "enabled" => Ok(AutoSync::Enabled),
            "global" => Ok(AutoSync::Global),
            other => Err(crate::error::CoreError::InvalidValue {
                field: "auto_sync",
                value: other.to_string(),
            }),
        }
    }
}

/// Validated "add repository" request as sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRepoRequest {
    pub platform: Platform,
    pub user: String,
    pub repo: String,
    pub clone_data: bool,
    pub auto_sync: AutoSync,
    pub add_submodules: bool,
    pub watch_events: Vec<WatchEvent>,
}

impl AddRepoRequest {
    pub fn job_key(&self) -> JobKey {
        JobKey::new(self.platform, self.user.clone(), self.repo.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_snake_case() {
        let request = AddRepoRequest {
            platform: Platform::GitHub,
            user: "octocat".into(),
            repo: "Hello-World".into(),
            clone_data: false,
            auto_sync: AutoSync::Global,
            add_submodules: true,
            watch_events: vec![WatchEvent::PullRequests, WatchEvent::Stars],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["platform"], "github");
        assert_eq!(json["auto_sync"], "global");
        assert_eq!(json["watch_events"][0], "pull_requests");
    }

    #[test]
    fn test_watch_event_from_str() {
        assert_eq!("tags".parse::<WatchEvent>().unwrap(), WatchEvent::Tags);
        assert!("tag".parse::<WatchEvent>().is_err());
    }
}
