use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{AccountMode, Config};
use crate::error::MirrorError;

/// Page size used for every listing call
pub const PER_PAGE: u8 = 100;

/// The subset of a GitHub repository payload needed to clone it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteRepo {
    pub name: String,
    pub full_name: String,
    pub owner: RepoOwner,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepoOwner {
    pub login: String,
}

impl RemoteRepo {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            full_name: format!("{}/{}", owner, name),
            owner: RepoOwner {
                login: owner.to_string(),
            },
        }
    }
}

/// One paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoQuery {
    /// `GET /user/repos?affiliation=owner`
    Owned,
    /// `GET /orgs/{org}/repos?type={repo_type}`
    Organization { org: String, repo_type: String },
}

impl RepoQuery {
    /// Listings to run for an account mode, in order
    pub fn for_mode(mode: &AccountMode) -> Vec<RepoQuery> {
        match mode {
            AccountMode::Personal => vec![RepoQuery::Owned],
            AccountMode::Organization { org, types } => types
                .iter()
                .map(|repo_type| RepoQuery::Organization {
                    org: org.clone(),
                    repo_type: repo_type.clone(),
                })
                .collect(),
        }
    }
}

/// Source of repository pages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepoLister: Send + Sync {
    /// Fetch one page (1-based) of a listing
    async fn list_page(&self, query: &RepoQuery, page: u32) -> Result<Vec<RemoteRepo>>;
}

#[derive(Serialize)]
struct PageParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    affiliation: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    repo_type: Option<&'a str>,
    per_page: u8,
    page: u32,
}

/// GitHub REST client, built once and reused for every page of the run
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Octocrab::builder();

        if !config.token.is_empty() {
            builder = builder.personal_token(config.token.clone());
        }

        if let Some(api_url) = &config.api_url {
            debug!("Using GitHub API at {}", api_url);
            builder = builder
                .base_uri(api_url.as_str())
                .with_context(|| format!("Invalid api_url: {}", api_url))?;
        }

        let client = builder.build().context("Failed to create GitHub client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RepoLister for GitHubClient {
    async fn list_page(&self, query: &RepoQuery, page: u32) -> Result<Vec<RemoteRepo>> {
        // Raw routes: visibility types are free-form config strings, not octocrab's enum
        let (route, params) = match query {
            RepoQuery::Owned => (
                "/user/repos".to_string(),
                PageParams {
                    affiliation: Some("owner"),
                    repo_type: None,
                    per_page: PER_PAGE,
                    page,
                },
            ),
            RepoQuery::Organization { org, repo_type } => (
                format!("/orgs/{}/repos", org),
                PageParams {
                    affiliation: None,
                    repo_type: Some(repo_type.as_str()),
                    per_page: PER_PAGE,
                    page,
                },
            ),
        };

        let repos: Vec<RemoteRepo> = self
            .client
            .get(&route, Some(&params))
            .await
            .with_context(|| format!("Failed to fetch {} page {}", route, page))?;

        Ok(repos)
    }
}

/// Page through one listing until a page comes back empty, appending to `out`
pub async fn list_all(
    lister: &dyn RepoLister,
    query: &RepoQuery,
    out: &mut Vec<RemoteRepo>,
) -> Result<()> {
    let mut page = 1u32;

    loop {
        let items = lister.list_page(query, page).await?;
        debug!("{:?} page {}: {} repositories", query, page, items.len());

        if items.is_empty() {
            break;
        }

        out.extend(items);
        page += 1;
    }

    Ok(())
}

/// List every repository for the configured account mode.
///
/// Organization listings are concatenated per visibility type without
/// deduplication.
pub async fn enumerate(
    lister: &dyn RepoLister,
    mode: &AccountMode,
) -> Result<Vec<RemoteRepo>, MirrorError> {
    match mode {
        AccountMode::Personal => info!("Reading personal GitHub repositories"),
        AccountMode::Organization { org, types } => {
            info!("Reading repositories of organization {} ({:?})", org, types)
        }
    }

    let mut repositories = Vec::new();

    for query in RepoQuery::for_mode(mode) {
        if let Err(source) = list_all(lister, &query, &mut repositories).await {
            return Err(MirrorError::Remote {
                partial: repositories,
                source,
            });
        }
    }

    info!("Found {} repositories", repositories.len());
    Ok(repositories)
}
