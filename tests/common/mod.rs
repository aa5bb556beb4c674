/// Common test utilities and helpers for repovault tests

use assert_fs::prelude::*;
use assert_fs::TempDir;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Temporary backup directory plus a config file pointing at it
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub backup_dir: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let backup = temp_dir.child("backup");
        backup.create_dir_all().expect("Failed to create backup dir");
        let backup_dir = backup.path().to_path_buf();

        Self {
            temp_dir,
            backup_dir,
        }
    }

    /// Write a JSON creds file with `backup-dir` style keys
    pub fn write_config(
        &self,
        org: &str,
        types: &[&str],
        api_url: &str,
        git_binary: Option<&Path>,
    ) -> PathBuf {
        let mut content = json!({
            "token": "ghp_test_token",
            "types": types,
            "org": org,
            "backup-dir": self.backup_dir,
            "api_url": api_url,
        });
        if let Some(git_binary) = git_binary {
            content["git_binary"] = json!(git_binary);
        }

        let config = self.temp_dir.child("creds.json");
        config
            .write_str(&content.to_string())
            .expect("Failed to write test config");
        config.path().to_path_buf()
    }
}

/// JSON payload for one repository as the GitHub API returns it
pub fn repo_json(owner: &str, name: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("{}/{}", owner, name),
        "private": false,
        "fork": false,
        "owner": { "login": owner, "id": 2, "type": "User" },
        "html_url": format!("https://github.com/{}/{}", owner, name),
    })
}

pub fn repo_page(owner: &str, names: &[String]) -> Value {
    Value::Array(names.iter().map(|name| repo_json(owner, name)).collect())
}

/// Serve `names` from `route`, split into pages of 100, followed by an empty page
pub async fn mount_listing(
    server: &MockServer,
    route: &str,
    extra: Option<(&str, &str)>,
    owner: &str,
    names: &[String],
) {
    let pages: Vec<&[String]> = names.chunks(100).collect();

    for page in 1..=pages.len() + 1 {
        let body = match pages.get(page - 1) {
            Some(chunk) => repo_page(owner, chunk),
            None => json!([]),
        };

        let mut mock = Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("per_page", "100"))
            .and(query_param("page", page.to_string()));
        if let Some((key, value)) = extra {
            mock = mock.and(query_param(key, value));
        }

        mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }
}

pub fn repo_names(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}-{}", prefix, i)).collect()
}
