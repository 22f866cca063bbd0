use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub git: GitConfig,
    pub changelog: ChangelogConfig,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    /// Automation account used for basic auth; PRs it authored are never listed.
    pub bot: String,
    pub api_base: String,
    /// Only ever set from the command line or `GITHUB_TOKEN`.
    #[serde(skip)]
    pub token: Option<String>,
}

impl GithubConfig {
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

// Keep the token out of logs
impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("bot", &self.bot)
            .field("api_base", &self.api_base)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub remote: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    pub path: PathBuf,
    pub header: String,
    pub project_name: String,
    pub label_prefix: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            owner: "mlflow".to_string(),
            repo: "mlflow".to_string(),
            bot: "mlflow-automation".to_string(),
            api_base: "https://api.github.com".to_string(),
            token: None,
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: "origin".to_string(),
        }
    }
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: PathBuf::from("CHANGELOG.md"),
            header: "# CHANGELOG".to_string(),
            project_name: "MLflow".to_string(),
            label_prefix: "rn/".to_string(),
        }
    }
}
