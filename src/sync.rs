//! Mirror Engine - runs the backup pipeline
//!
//! Scan the backup directory, list the remote repositories, clone what is
//! missing, then fetch everything present. Each step is awaited before the
//! next one starts and the first failure aborts the run.

use crate::config::Config;
use crate::error::MirrorError;
use crate::git::{self, GitCli, Vcs};
use crate::github::{self, GitHubClient, RemoteRepo, RepoLister};
use crate::local;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Counts from a complete mirror run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorSummary {
    pub local_entries: usize,
    pub remote_repos: usize,
    pub to_clone: usize,
    pub cloned: usize,
    pub updated: usize,
}

/// Remote repositories whose name matches no local entry, in remote order
pub fn repos_to_clone(local: &[String], remote: &[RemoteRepo]) -> Vec<RemoteRepo> {
    let present: HashSet<&str> = local.iter().map(String::as_str).collect();

    remote
        .iter()
        .filter(|repo| !present.contains(repo.name.as_str()))
        .cloned()
        .collect()
}

pub struct MirrorEngine {
    config: Arc<Config>,
    lister: Box<dyn RepoLister>,
    vcs: Box<dyn Vcs>,
}

impl MirrorEngine {
    /// Engine backed by the GitHub API and the configured git binary
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let lister = GitHubClient::new(&config)?;
        let vcs = GitCli::new(config.git_binary.clone(), config.token.clone());
        Ok(Self::new(config, Box::new(lister), Box::new(vcs)))
    }

    pub fn new(config: Config, lister: Box<dyn RepoLister>, vcs: Box<dyn Vcs>) -> Self {
        Self {
            config: Arc::new(config),
            lister,
            vcs,
        }
    }

    fn backup_dir(&self) -> PathBuf {
        self.config.backup_path()
    }

    /// Names of the entries currently in the backup directory
    pub async fn scan_local(&self) -> Result<Vec<OsString>, MirrorError> {
        let path = self.backup_dir();
        local::scan_entries(&path)
            .await
            .map_err(|source| MirrorError::Scan { path, source })
    }

    /// Every remote repository for the configured account mode
    pub async fn discover(&self) -> Result<Vec<RemoteRepo>, MirrorError> {
        github::enumerate(self.lister.as_ref(), &self.config.mode()).await
    }

    /// Clone each repository into the backup directory, stopping at the first failure
    pub async fn clone_missing(&self, repos: &[RemoteRepo]) -> Result<usize, MirrorError> {
        let backup_dir = self.backup_dir();
        info!("Cloning {} repositories", repos.len());

        let mut processed = 0;
        for repo in repos {
            info!("Cloning {}", repo.full_name);
            let url = git::clone_url(repo, &self.config.token, &self.config.git_host);

            if let Err(source) = self.vcs.clone_repo(&url, &backup_dir).await {
                return Err(MirrorError::Clone {
                    processed,
                    repo: repo.full_name.clone(),
                    source,
                });
            }
            processed += 1;
        }

        Ok(processed)
    }

    /// Fetch every entry of a fresh listing of the backup directory
    pub async fn update_all(&self) -> Result<usize, MirrorError> {
        let backup_dir = self.backup_dir();
        let entries = self.scan_local().await?;
        info!("Updating {} repositories", entries.len());

        let mut processed = 0;
        for entry in entries {
            debug!("Fetching {:?}", entry);
            if let Err(source) = self.vcs.fetch(&backup_dir.join(&entry)).await {
                return Err(MirrorError::Fetch {
                    processed,
                    entry: entry.to_string_lossy().into_owned(),
                    source,
                });
            }
            processed += 1;
        }

        Ok(processed)
    }

    /// Run the whole pipeline. A dry run stops once the clone list is known.
    pub async fn run(&self, dry_run: bool) -> Result<MirrorSummary, MirrorError> {
        info!("Mirroring into {}", self.backup_dir().display());

        let local = local::display_names(&self.scan_local().await?);
        debug!("Backup directory entries: {:?}", local);

        let remote = self.discover().await?;
        let to_clone = repos_to_clone(&local, &remote);

        let mut summary = MirrorSummary {
            local_entries: local.len(),
            remote_repos: remote.len(),
            to_clone: to_clone.len(),
            ..MirrorSummary::default()
        };

        if dry_run {
            for repo in &to_clone {
                info!("Would clone {}", repo.full_name);
            }
            return Ok(summary);
        }

        summary.cloned = self.clone_missing(&to_clone).await?;
        summary.updated = self.update_all().await?;

        info!(
            "Mirror complete: {} cloned, {} updated",
            summary.cloned, summary.updated
        );
        Ok(summary)
    }
}
