use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Mirror configuration, loaded once per run from the `--creds` file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// GitHub personal access token, also embedded in clone URLs
    #[serde(default)]
    pub token: String,

    /// Visibility types to list in organization mode ("public", "internal", "private")
    #[serde(default)]
    pub types: Vec<String>,

    /// Organization login; empty selects personal mode
    #[serde(default, alias = "affiliation")]
    pub org: String,

    /// Directory whose entries are the existing clones
    #[serde(rename = "backup-dir", alias = "backup_dir")]
    pub backup_dir: String,

    /// GitHub API base URL (GitHub Enterprise or a test server)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Host used when building clone URLs
    #[serde(default = "default_git_host")]
    pub git_host: String,

    /// Program invoked for clone and fetch
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

/// Which listing the remote enumerator runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountMode {
    /// Repositories owned by the authenticated user
    Personal,
    /// Repositories of an organization, one listing per visibility type
    Organization { org: String, types: Vec<String> },
}

fn default_git_host() -> String {
    "github.com".to_string()
}
fn default_git_binary() -> String {
    "git".to_string()
}

impl Config {
    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file {:?} does not exist", path);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config = Self::parse(path, &content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.expand_paths()?;

        if config.token.is_empty() {
            warn!("No token configured, GitHub requests will be unauthenticated");
        }

        Ok(config)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(serde_yaml::from_str(content)?)
        }
    }

    /// Expand `~` and environment variables in the backup path and the token
    pub fn expand_paths(&mut self) -> Result<()> {
        self.backup_dir = shellexpand::full(&self.backup_dir)
            .context("Failed to expand backup-dir path")?
            .into_owned();

        self.token = shellexpand::env(&self.token)
            .context("Failed to expand token")?
            .into_owned();

        Ok(())
    }

    pub fn backup_path(&self) -> PathBuf {
        PathBuf::from(&self.backup_dir)
    }

    /// Personal mode when no organization is configured
    pub fn mode(&self) -> AccountMode {
        if self.org.is_empty() {
            AccountMode::Personal
        } else {
            AccountMode::Organization {
                org: self.org.clone(),
                types: self.types.clone(),
            }
        }
    }
}
