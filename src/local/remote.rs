//! Git remote URL parsing.
//!
//! Extracts the `owner/name` slug from a remote URL so the GitHub lookup
//! can query the right repository.

use super::error::LocalDiscoveryError;
use crate::github::RepoInfo;

/// Parses a git remote URL into an `owner/name` slug.
///
/// Supports the following URL formats:
/// - SCP-style SSH: `git@github.com:owner/repo.git`
/// - SSH with protocol: `ssh://git@github.com/owner/repo.git`
/// - HTTPS: `https://github.com/owner/repo.git`
///
/// The `.git` suffix is optional and stripped when present.
///
/// # Errors
///
/// Returns [`LocalDiscoveryError::InvalidRemoteUrl`] when the URL cannot
/// be parsed.
pub fn parse_remote_slug(raw: &str) -> Result<RepoInfo, LocalDiscoveryError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(LocalDiscoveryError::InvalidRemoteUrl {
            url: raw.to_owned(),
        });
    }

    // Try SCP-style SSH first: git@host:owner/repo.git
    if let Some(slug) = try_parse_scp_style(trimmed) {
        return Ok(slug);
    }

    // Then URL-style forms (https://, ssh://, git://)
    if let Some(slug) = try_parse_url_style(trimmed) {
        return Ok(slug);
    }

    Err(LocalDiscoveryError::InvalidRemoteUrl {
        url: raw.to_owned(),
    })
}

/// Attempts to parse an SCP-style SSH URL: `git@host:owner/repo.git`.
fn try_parse_scp_style(url: &str) -> Option<RepoInfo> {
    // Pattern: user@host:path
    let at_pos = url.find('@')?;
    let colon_pos = url.find(':')?;

    // Colon must come after @
    if colon_pos <= at_pos {
        return None;
    }

    // A :// marks a URL-style remote, not SCP-style
    if url.get(colon_pos..colon_pos.saturating_add(3)) == Some("://") {
        return None;
    }

    let path = url.get(colon_pos.saturating_add(1)..)?;
    extract_slug_from_path(path)
}

/// Attempts to parse a URL-style remote: `https://host/owner/repo.git`.
fn try_parse_url_style(url: &str) -> Option<RepoInfo> {
    let parsed = url::Url::parse(url).ok()?;
    let path_stripped = parsed.path().strip_prefix('/')?;
    extract_slug_from_path(path_stripped)
}

/// Extracts owner and repository from a path like `owner/repo.git`.
fn extract_slug_from_path(raw_path: &str) -> Option<RepoInfo> {
    let trimmed_path = raw_path.trim_matches('/');

    if trimmed_path.is_empty() {
        return None;
    }

    let mut parts = trimmed_path.split('/');
    let owner = parts.next()?;
    let name_with_suffix = parts.next()?;

    // Only owner/repo, not owner/repo/extra (a trailing slash leaves an
    // empty segment and is tolerated)
    let extra = parts.next();
    if extra.is_some_and(|segment| !segment.is_empty()) {
        return None;
    }

    if owner.is_empty() || name_with_suffix.is_empty() {
        return None;
    }

    let name = name_with_suffix
        .strip_suffix(".git")
        .unwrap_or(name_with_suffix);

    if name.is_empty() {
        return None;
    }

    Some(RepoInfo {
        owner: owner.to_owned(),
        name: name.to_owned(),
    })
}
