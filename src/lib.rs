//! repovault - Mirror GitHub repositories into a local backup directory
//!
//! Lists the repositories of a personal account or an organization, clones the
//! ones that have no entry in the backup directory yet, then fetches every
//! entry of the backup directory.
//!
//! ## Modules
//!
//! - [`config`]: Configuration file loading
//! - [`local`]: Backup directory listing
//! - [`github`]: Paginated repository listing via the GitHub API
//! - [`git`]: `git clone` / `git fetch` invocation
//! - [`sync`]: The mirror pipeline
//! - [`error`]: Failure kinds and their exit codes

pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod local;
pub mod sync;

pub use config::{AccountMode, Config};
pub use error::MirrorError;
pub use git::{GitCli, Vcs};
pub use github::{GitHubClient, RemoteRepo, RepoLister, RepoQuery};
pub use sync::{repos_to_clone, MirrorEngine, MirrorSummary};
