use thiserror::Error;

use crate::domain::{AddRepoRequest, AutoSync, Platform, WatchEvent};
use crate::ports::FormDefaults;

/// Inline error attached to one form field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw state of the add-repository form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRepoForm {
    pub platform: Option<Platform>,
    pub user: String,
    pub repo: String,
    pub clone_data: bool,
    pub auto_sync: AutoSync,
    pub add_submodules: bool,
    pub watch_events: Vec<WatchEvent>,
}

impl AddRepoForm {
    pub fn from_defaults(defaults: &FormDefaults) -> Self {
        Self {
            platform: Some(defaults.platform),
            user: String::new(),
            repo: String::new(),
            clone_data: defaults.clone_data,
            auto_sync: defaults.auto_sync,
            add_submodules: defaults.add_submodules,
            watch_events: Vec::new(),
        }
    }

    /// Check required fields and the platform's name limits
    pub fn validate(&self) -> Result<AddRepoRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        let user = self.user.trim();
        let repo = self.repo.trim();

        let Some(platform) = self.platform else {
            errors.push(FieldError::new("platform", "A platform is required."));
            if user.is_empty() {
                errors.push(FieldError::new("user", "A user is required."));
            }
            if repo.is_empty() {
                errors.push(FieldError::new("repo", "A repository is required."));
            }
            return Err(errors);
        };

        let limits = platform.name_limits();
        let user_len = user.chars().count();
        let repo_len = repo.chars().count();

        if user.is_empty() {
            errors.push(FieldError::new("user", "A user is required."));
        } else if user_len < limits.min_user {
            errors.push(FieldError::new(
                "user",
                format!(
                    "Users cannot have less than {} characters on the selected platform.",
                    limits.min_user
                ),
            ));
        } else if user_len > limits.max_user {
            errors.push(FieldError::new(
                "user",
                format!(
                    "Users cannot have more than {} characters on the selected platform.",
                    limits.max_user
                ),
            ));
        }

        if repo.is_empty() {
            errors.push(FieldError::new("repo", "A repository is required."));
        } else if repo_len > limits.max_repo {
            errors.push(FieldError::new(
                "repo",
                format!(
                    "Repositories cannot have more than {} characters on the selected platform.",
                    limits.max_repo
                ),
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut watch_events: Vec<WatchEvent> = Vec::with_capacity(self.watch_events.len());
        for event in &self.watch_events {
            if !watch_events.contains(event) {
                watch_events.push(*event);
            }
        }

        Ok(AddRepoRequest {
            platform,
            user: user.to_string(),
            repo: repo.to_string(),
            clone_data: self.clone_data,
            auto_sync: self.auto_sync,
            add_submodules: self.add_submodules,
            watch_events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(platform: Platform, user: &str, repo: &str) -> AddRepoForm {
        AddRepoForm {
            user: user.into(),
            repo: repo.into(),
            platform: Some(platform),
            ..AddRepoForm::from_defaults(&FormDefaults::default())
        }
    }

    #[test]
    fn test_valid_form_produces_request() {
        let request = form(Platform::GitHub, " octocat ", "Hello-World").validate().unwrap();
        assert_eq!(request.user, "octocat");
        assert_eq!(request.auto_sync, AutoSync::Global);
        assert!(request.add_submodules);
    }

    #[test]
    fn test_required_fields() {
        let errors = form(Platform::GitHub, "", "").validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["user", "repo"]);

        let mut no_platform = form(Platform::GitHub, "u", "r");
        no_platform.platform = None;
        assert_eq!(no_platform.validate().unwrap_err()[0].field, "platform");
    }

    #[test]
    fn test_platform_specific_lengths() {
        let errors = form(Platform::Gitea, "a", "repo").validate().unwrap_err();
        assert_eq!(
            errors[0].message,
            "Users cannot have less than 2 characters on the selected platform."
        );

        let long_user = "u".repeat(40);
        assert!(form(Platform::GitHub, &long_user, "r").validate().is_err());
        assert!(form(Platform::Gitea, &long_user, "r").validate().is_ok());
        assert!(form(Platform::GitLab, &long_user, "r").validate().is_ok());

        let long_repo = "r".repeat(101);
        assert!(form(Platform::Bitbucket, "u", &long_repo).validate().is_err());
        assert!(form(Platform::GitLab, "u", &long_repo).validate().is_ok());
    }
}
