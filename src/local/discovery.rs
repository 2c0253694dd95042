//! Branch and origin discovery from the local repository.

use std::path::Path;

use git2::Repository;

use super::error::LocalDiscoveryError;
use super::remote::parse_remote_slug;
use crate::github::RepoInfo;

/// Default remote name to look for when discovering the origin slug.
const DEFAULT_REMOTE_NAME: &str = "origin";

/// Branch name and origin slug discovered from the local repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalContext {
    branch: String,
    repo: RepoInfo,
}

impl LocalContext {
    /// Returns the current branch name.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Returns the repository identity from the origin remote.
    #[must_use]
    pub const fn repo(&self) -> &RepoInfo {
        &self.repo
    }

    /// Consumes the context, yielding the repository identity.
    #[must_use]
    pub fn into_repo(self) -> RepoInfo {
        self.repo
    }
}

/// Discovers the repository containing `start_path` and reads the current
/// branch name and the `origin` remote slug.
///
/// # Errors
///
/// Returns an error if:
/// - the path is not within a git repository (`NotARepository`)
/// - HEAD is detached (`DetachedHead`)
/// - the repository has no remotes (`NoRemotes`)
/// - the `origin` remote does not exist (`RemoteNotFound`)
/// - the remote URL cannot be parsed (`InvalidRemoteUrl`)
pub fn discover_context(start_path: &Path) -> Result<LocalContext, LocalDiscoveryError> {
    let repository = open_repository(start_path)?;
    let branch = current_branch(&repository)?;
    let repo = origin_slug(&repository, DEFAULT_REMOTE_NAME)?;

    Ok(LocalContext { branch, repo })
}

/// Opens a git repository searching upward from the given path.
fn open_repository(start_path: &Path) -> Result<Repository, LocalDiscoveryError> {
    Repository::discover(start_path).map_err(|error| {
        if error.code() == git2::ErrorCode::NotFound {
            LocalDiscoveryError::NotARepository
        } else {
            LocalDiscoveryError::from(error)
        }
    })
}

/// Reads the branch name HEAD currently points at.
fn current_branch(repository: &Repository) -> Result<String, LocalDiscoveryError> {
    let head = repository.head()?;
    if !head.is_branch() {
        return Err(LocalDiscoveryError::DetachedHead);
    }

    head.shorthand()
        .map(str::to_owned)
        .ok_or(LocalDiscoveryError::DetachedHead)
}

/// Reads and parses the URL of the named remote.
fn origin_slug(
    repository: &Repository,
    remote_name: &str,
) -> Result<RepoInfo, LocalDiscoveryError> {
    let remotes = repository.remotes()?;
    if remotes.is_empty() {
        return Err(LocalDiscoveryError::NoRemotes);
    }

    let remote = repository.find_remote(remote_name).map_err(|error| {
        if error.code() == git2::ErrorCode::NotFound {
            LocalDiscoveryError::RemoteNotFound {
                name: remote_name.to_owned(),
            }
        } else {
            LocalDiscoveryError::from(error)
        }
    })?;

    let url = remote
        .url()
        .ok_or_else(|| LocalDiscoveryError::InvalidRemoteUrl {
            url: "(no URL)".to_owned(),
        })?;

    parse_remote_slug(url)
}
