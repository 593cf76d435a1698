use thiserror::Error;

use crate::domain::Platform;

/// Where a pasted URL points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub platform: Platform,
    pub user: String,
    pub repo: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutofillError {
    #[error("Protocol not currently supported.")]
    UnsupportedProtocol,

    #[error("Unsupported platform or incorrect domain name.")]
    UnsupportedPlatform,

    #[error("User not provided.")]
    MissingUser,

    #[error("User or repo not provided.")]
    MissingRepo,
}

const UNSUPPORTED_PROTOCOLS: [&str; 4] = ["http", "git", "ssh", "file"];
const HTTPS: &str = "https://";

/// Split a pasted repository URL into platform, user and repo
pub fn parse_repo_url(input: &str) -> Result<RepoLocation, AutofillError> {
    let value = input.trim();

    if UNSUPPORTED_PROTOCOLS
        .iter()
        .any(|proto| value.starts_with(&format!("{}://", proto)))
    {
        return Err(AutofillError::UnsupportedProtocol);
    }
    let value = value.strip_prefix(HTTPS).unwrap_or(value);

    let (platform, path) = Platform::ALL
        .into_iter()
        .find_map(|platform| {
            let rest = value.strip_prefix(platform.domain())?;
            if rest.is_empty() {
                Some((platform, rest))
            } else {
                rest.strip_prefix('/').map(|path| (platform, path))
            }
        })
        .ok_or(AutofillError::UnsupportedPlatform)?;

    let path = path.strip_suffix('/').unwrap_or(path);
    let mut segments = path.split('/');
    let user = segments.next().unwrap_or_default();
    if user.is_empty() {
        return Err(AutofillError::MissingUser);
    }

    let repo = segments.next().ok_or(AutofillError::MissingRepo)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return Err(AutofillError::MissingRepo);
    }

    Ok(RepoLocation {
        platform,
        user: user.to_string(),
        repo: repo.to_string(),
    })
}
