use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Hosting platform a repository lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Bitbucket,
    #[serde(rename = "github")]
    GitHub,
    #[serde(rename = "gitlab")]
    GitLab,
    Gitea,
}

/// Client-side bounds on user and repository name lengths (in characters)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameLimits {
    pub min_user: usize,
    pub max_user: usize,
    pub max_repo: usize,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Bitbucket,
        Platform::GitHub,
        Platform::GitLab,
        Platform::Gitea,
    ];

    /// Identifier used on the wire and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Bitbucket => "bitbucket",
            Platform::GitHub => "github",
            Platform::GitLab => "gitlab",
            Platform::Gitea => "gitea",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Bitbucket => "Bitbucket",
            Platform::GitHub => "GitHub",
            Platform::GitLab => "GitLab",
            Platform::Gitea => "Gitea",
        }
    }

    pub fn domain(&self) -> &'static str {
        match self {
            Platform::Bitbucket => "bitbucket.com",
            Platform::GitHub => "github.com",
            Platform::GitLab => "gitlab.com",
            Platform::Gitea => "gitea.com",
        }
    }

    pub fn name_limits(&self) -> NameLimits {
        match self {
            Platform::Bitbucket | Platform::GitHub => NameLimits {
                min_user: 1,
                max_user: 39,
                max_repo: 100,
            },
            Platform::GitLab => NameLimits {
                min_user: 1,
                max_user: 255,
                max_repo: 255,
            },
            Platform::Gitea => NameLimits {
                min_user: 2,
                max_user: 40,
                max_repo: 100,
            },
        }
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::UnknownPlatform {
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parses_wire_names() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_unknown_platform_is_an_error() {
        let err = "sourceforge".parse::<Platform>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownPlatform { .. }));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Platform::GitHub).unwrap();
        assert_eq!(json, "\"github\"");
        let parsed: Platform = serde_json::from_str("\"gitlab\"").unwrap();
        assert_eq!(parsed, Platform::GitLab);
    }

    #[test]
    fn test_gitea_requires_two_character_users() {
        assert_eq!(Platform::Gitea.name_limits().min_user, 2);
        assert_eq!(Platform::GitLab.name_limits().max_repo, 255);
    }
}
