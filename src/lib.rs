//! Lighthouse gate library crate.
//!
//! The library resolves the pull request under test from CI environment
//! variables or local git state, then triggers a single audit run on a
//! hosted Lighthouse CI service and interprets the response. Errors are
//! split into soft failures (no pull request context, an expected state
//! for non-PR builds) and hard failures (the remote invocation itself
//! failed).

pub mod config;
pub mod github;
pub mod invoke;
pub mod local;
pub mod resolve;

pub use config::{CliArgs, Environment, GateConfig, Runner, UsageError};
pub use github::{LookupError, OctocrabLookup, PullRequestInfo, PullRequestLookup, RepoInfo};
pub use invoke::{InvokeError, RunInvoker, RunOutcome};
pub use resolve::{ResolveError, ResolvedPullRequest, resolve_pull_request};
