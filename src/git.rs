use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command as AsyncCommand;
use tracing::debug;

use crate::github::RemoteRepo;

/// External version control operations used by the mirror
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Clone `url` into a new directory under `workdir`
    async fn clone_repo(&self, url: &str, workdir: &Path) -> Result<()>;

    /// Fetch all remotes of the clone at `repo_dir`
    async fn fetch(&self, repo_dir: &Path) -> Result<()>;
}

/// Runs the `git` command line client
pub struct GitCli {
    program: String,
    token: String,
}

impl GitCli {
    /// `token` is only used to scrub credentials out of error output
    pub fn new(program: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            token: token.into(),
        }
    }

    async fn run(&self, args: &[&str], dir: &Path) -> Result<()> {
        let output = AsyncCommand::new(&self.program)
            .args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await
            .with_context(|| format!("Failed to execute {} {}", self.program, args[0]))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "{} {} failed ({}): {}",
                self.program,
                args[0],
                output.status,
                redact(stderr.trim(), &self.token)
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl Vcs for GitCli {
    async fn clone_repo(&self, url: &str, workdir: &Path) -> Result<()> {
        debug!(
            "git clone {} in {}",
            redact(url, &self.token),
            workdir.display()
        );
        self.run(&["clone", url], workdir).await
    }

    async fn fetch(&self, repo_dir: &Path) -> Result<()> {
        debug!("git fetch in {}", repo_dir.display());
        self.run(&["fetch"], repo_dir).await
    }
}

/// HTTPS clone URL with the owner and token as basic-auth credentials
pub fn clone_url(repo: &RemoteRepo, token: &str, host: &str) -> String {
    format!(
        "https://{}:{}@{}/{}",
        repo.owner.login, token, host, repo.full_name
    )
}

/// Mask every occurrence of `token` in `text`
pub fn redact(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    text.replace(token, "***")
}
