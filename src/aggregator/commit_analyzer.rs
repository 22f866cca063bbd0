use regex::Regex;
use std::sync::LazyLock;

/// `(#123)` at the very end of a commit subject, as left by squash merges.
static PR_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)$").expect("PR reference pattern is valid"));

/// A commit subject that points at a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestCommit {
    pub number: u64,
    pub title: String,
}

pub struct CommitAnalyzer;

impl CommitAnalyzer {
    /// Commits without a PR reference are dropped silently.
    pub fn analyze_commits(subjects: &[String]) -> Vec<PullRequestCommit> {
        subjects
            .iter()
            .filter_map(|subject| Self::analyze_single_commit(subject))
            .collect()
    }

    fn analyze_single_commit(subject: &str) -> Option<PullRequestCommit> {
        match Self::extract_pr_number(subject) {
            Some(number) if number > 0 => Some(PullRequestCommit {
                number,
                title: Self::extract_title(subject),
            }),
            _ => None,
        }
    }

    pub fn extract_pr_number(subject: &str) -> Option<u64> {
        PR_REFERENCE
            .captures(subject)
            .and_then(|cap| cap.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
    }

    /// Everything before the last whitespace-separated token.
    pub fn extract_title(subject: &str) -> String {
        let subject = subject.trim_end();
        match subject.rsplit_once(char::is_whitespace) {
            Some((title, _)) => title.trim_end().to_string(),
            None => subject.to_string(),
        }
    }
}
