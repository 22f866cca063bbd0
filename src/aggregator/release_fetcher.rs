use anyhow::Result;
use tracing::info;
use crate::config::GithubConfig;
use crate::github::client::GitHubClient;
use crate::github::types::PullRequest;
use super::categorizer::{Categorized, Categorizer};
use super::commit_analyzer::CommitAnalyzer;

pub struct ReleaseAggregator<'a> {
    client: GitHubClient,
    github: &'a GithubConfig,
    label_prefix: &'a str,
}

impl<'a> ReleaseAggregator<'a> {
    pub fn new(client: GitHubClient, github: &'a GithubConfig, label_prefix: &'a str) -> Self {
        Self {
            client,
            github,
            label_prefix,
        }
    }

    /// Fetch and categorize every PR referenced by the given commit subjects.
    pub async fn aggregate(&self, subjects: &[String]) -> Result<Categorized> {
        let prs = self.fetch_pull_requests(subjects).await?;
        let categorized = Categorizer::new(&self.github.bot, self.label_prefix).categorize(&prs)?;
        Ok(categorized)
    }

    /// One request at a time, in commit order; the first failure aborts the run.
    pub async fn fetch_pull_requests(&self, subjects: &[String]) -> Result<Vec<PullRequest>> {
        let commits = CommitAnalyzer::analyze_commits(subjects);
        let mut prs = Vec::with_capacity(commits.len());

        for commit in commits {
            info!("Fetching PR #{}...", commit.number);
            let details = self.client.get_pull_request(commit.number).await?;
            prs.push(PullRequest {
                repository: self.github.slug(),
                number: commit.number,
                author: details.user.login.clone(),
                labels: details.label_names(),
                title: commit.title,
            });
        }

        Ok(prs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::categorizer::{CategorizeError, ReleaseNoteLabel};
    use pretty_assertions::assert_eq;

    fn subjects(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    async fn mock_pr(server: &mut mockito::Server, number: u64, body: &str) -> mockito::Mock {
        server
            .mock("GET", format!("/repos/mlflow/mlflow/pulls/{}", number).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    async fn client(github: &GithubConfig) -> GitHubClient {
        GitHubClient::new(github).await.unwrap()
    }

    fn github(api_base: String) -> GithubConfig {
        GithubConfig {
            api_base,
            token: Some("token".to_string()),
            ..GithubConfig::default()
        }
    }

    #[tokio::test]
    async fn fetches_referenced_prs_in_commit_order() {
        let mut server = mockito::Server::new_async().await;
        let first = mock_pr(
            &mut server,
            101,
            r#"{"user": {"login": "alice"}, "labels": [{"name": "rn/feature"}]}"#,
        )
        .await;
        let second = mock_pr(
            &mut server,
            102,
            r#"{"user": {"login": "bob"}, "labels": [{"name": "rn/none"}, {"name": "area/docs"}]}"#,
        )
        .await;

        let github = github(server.url());
        let client = client(&github).await;
        let aggregator = ReleaseAggregator::new(client, &github, "rn/");
        let prs = aggregator
            .fetch_pull_requests(&subjects(&[
                "Add tracing UI (#101)",
                "Bump version",
                "Fix docs typo (#102)",
            ]))
            .await
            .unwrap();

        assert_eq!(
            prs,
            vec![
                PullRequest {
                    repository: "mlflow/mlflow".to_string(),
                    number: 101,
                    title: "Add tracing UI".to_string(),
                    author: "alice".to_string(),
                    labels: vec!["rn/feature".to_string()],
                },
                PullRequest {
                    repository: "mlflow/mlflow".to_string(),
                    number: 102,
                    title: "Fix docs typo".to_string(),
                    author: "bob".to_string(),
                    labels: vec!["rn/none".to_string(), "area/docs".to_string()],
                },
            ]
        );
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn http_failure_aborts_before_later_requests() {
        let mut server = mockito::Server::new_async().await;
        let _broken = server
            .mock("GET", "/repos/mlflow/mlflow/pulls/1")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;
        let later = server
            .mock("GET", "/repos/mlflow/mlflow/pulls/2")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let github = github(server.url());
        let client = client(&github).await;
        let aggregator = ReleaseAggregator::new(client, &github, "rn/");
        let err = aggregator
            .aggregate(&subjects(&["Broken (#1)", "Fine (#2)"]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("failed to fetch PR #1"));
        later.assert_async().await;
    }

    #[tokio::test]
    async fn aggregate_categorizes_and_skips_bot() {
        let mut server = mockito::Server::new_async().await;
        let _bot = mock_pr(
            &mut server,
            7,
            r#"{"user": {"login": "mlflow-automation"}, "labels": []}"#,
        )
        .await;
        let _fix = mock_pr(
            &mut server,
            8,
            r#"{"user": {"login": "alice"}, "labels": [{"name": "rn/bug-fix"}]}"#,
        )
        .await;

        let github = github(server.url());
        let client = client(&github).await;
        let aggregator = ReleaseAggregator::new(client, &github, "rn/");
        let categorized = aggregator
            .aggregate(&subjects(&["Bump version (#7)", "Fix logging (#8)"]))
            .await
            .unwrap();

        let fixes = categorized.with_label(ReleaseNoteLabel::BugFix);
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].to_string(), "Fix logging (#8, @alice)");
    }

    #[tokio::test]
    async fn unlabelled_pr_surfaces_categorize_error() {
        let mut server = mockito::Server::new_async().await;
        let _untriaged =
            mock_pr(&mut server, 5, r#"{"user": {"login": "alice"}, "labels": []}"#).await;

        let github = github(server.url());
        let client = client(&github).await;
        let aggregator = ReleaseAggregator::new(client, &github, "rn/");
        let err = aggregator
            .aggregate(&subjects(&["Untriaged (#5)"]))
            .await
            .unwrap_err();

        let categorize = err.downcast_ref::<CategorizeError>().unwrap();
        assert!(categorize
            .to_string()
            .contains("https://github.com/mlflow/mlflow/pull/5"));
    }
}
