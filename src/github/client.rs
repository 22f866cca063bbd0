use anyhow::{Context, Result};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use tracing::debug;
use crate::config::GithubConfig;
use super::types::PullRequestDetails;

pub struct GitHubClient {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub async fn new(config: &GithubConfig) -> Result<Self> {
        // A failed PR lookup aborts the run on the first response
        let mut builder = Octocrab::builder();
        builder.add_retry_config(RetryConfig::None);
        let mut builder = builder
            .base_uri(config.api_base.as_str())
            .with_context(|| format!("invalid GitHub API base {}", config.api_base))?;

        // Without a token requests go out unauthenticated and may be rate limited
        if let Some(token) = &config.token {
            builder = builder.basic_auth(config.bot.clone(), token.clone());
        } else {
            debug!("no GitHub token configured, using unauthenticated requests");
        }

        let client = builder.build()?;
        Ok(Self {
            client,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        })
    }

    /// Fails on any non-success status; there is no retry.
    pub async fn get_pull_request(&self, number: u64) -> Result<PullRequestDetails> {
        let route = format!("/repos/{}/{}/pulls/{}", self.owner, self.repo, number);
        let details = self
            .client
            .get::<PullRequestDetails, _, ()>(&route, None)
            .await
            .with_context(|| format!("failed to fetch PR #{}", number))?;
        Ok(details)
    }
}
