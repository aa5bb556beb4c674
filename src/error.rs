//! Error taxonomy for a mirror run
//!
//! Every failure aborts the run. Library code returns [`MirrorError`] and the
//! binary maps it to a process exit status in one place.

use std::path::PathBuf;
use thiserror::Error;

use crate::github::RemoteRepo;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("failed to load configuration from {path:?}")]
    Config {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to read backup directory {path:?}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Enumeration stopped early; `partial` holds what was listed before the failure
    #[error("failed to list repositories from GitHub ({} listed before the error)", .partial.len())]
    Remote {
        partial: Vec<RemoteRepo>,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to clone {repo} after {processed} successful clones")]
    Clone {
        processed: usize,
        repo: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to fetch {entry} after {processed} successful fetches")]
    Fetch {
        processed: usize,
        entry: String,
        #[source]
        source: anyhow::Error,
    },
}

impl MirrorError {
    /// Process exit status for this failure kind
    pub fn exit_code(&self) -> u8 {
        match self {
            MirrorError::Config { .. } => 3,
            MirrorError::Scan { .. } => 4,
            MirrorError::Remote { .. } => 5,
            MirrorError::Clone { .. } => 6,
            MirrorError::Fetch { .. } => 7,
        }
    }

    /// Items completed in the failing phase before it aborted
    pub fn processed(&self) -> Option<usize> {
        match self {
            MirrorError::Clone { processed, .. } | MirrorError::Fetch { processed, .. } => {
                Some(*processed)
            }
            _ => None,
        }
    }
}
