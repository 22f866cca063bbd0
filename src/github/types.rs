use serde::Deserialize;
use std::fmt;

/// The slice of `GET /repos/{owner}/{repo}/pulls/{number}` this tool reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestDetails {
    pub user: PullRequestUser,
    #[serde(default)]
    pub labels: Vec<PullRequestLabel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestLabel {
    pub name: String,
}

impl PullRequestDetails {
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}

/// A merged pull request as it will appear in the changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// `owner/repo`
    pub repository: String,
    pub number: u64,
    pub title: String,
    pub author: String,
    pub labels: Vec<String>,
}

impl PullRequest {
    pub fn url(&self) -> String {
        format!("https://github.com/{}/pull/{}", self.repository, self.number)
    }

    pub fn release_note_labels<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(move |label| label.starts_with(prefix))
    }
}

impl fmt::Display for PullRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{}, @{})", self.title, self.number, self.author)
    }
}
