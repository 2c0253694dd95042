//! Local git repository discovery.
//!
//! Used when no CI environment variables identify the pull request: the
//! repository containing the working directory provides the current
//! branch name and the `origin` remote slug for the GitHub lookup.

pub mod discovery;
pub mod error;
pub mod remote;

pub use discovery::{LocalContext, discover_context};
pub use error::LocalDiscoveryError;
pub use remote::parse_remote_slug;
