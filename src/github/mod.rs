//! GitHub pull request lookup.
//!
//! This module wraps Octocrab to find the open pull request whose head
//! matches the current branch. Errors are mapped into friendly variants so
//! callers can surface precise failures without exposing Octocrab
//! internals.

pub mod error;
pub mod gateway;
pub mod models;

pub use error::LookupError;
pub use gateway::{OctocrabLookup, PullRequestLookup};
pub use models::{PullRequestInfo, RepoInfo};

#[cfg(test)]
pub use gateway::MockPullRequestLookup;
