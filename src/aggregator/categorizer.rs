use crate::github::types::PullRequest;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Release-note labels, without the configured prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseNoteLabel {
    Feature,
    BreakingChange,
    BugFix,
    Documentation,
    /// Not worth a changelog line; credited under small fixes by author.
    None,
}

impl ReleaseNoteLabel {
    pub const ALL: [ReleaseNoteLabel; 5] = [
        ReleaseNoteLabel::Feature,
        ReleaseNoteLabel::BreakingChange,
        ReleaseNoteLabel::BugFix,
        ReleaseNoteLabel::Documentation,
        ReleaseNoteLabel::None,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReleaseNoteLabel::Feature => "feature",
            ReleaseNoteLabel::BreakingChange => "breaking-change",
            ReleaseNoteLabel::BugFix => "bug-fix",
            ReleaseNoteLabel::Documentation => "documentation",
            ReleaseNoteLabel::None => "none",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.name() == name)
    }
}

impl fmt::Display for ReleaseNoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum CategorizeError {
    #[error("The following PRs need to be categorized:\n{}", bullet_urls(.0))]
    Unlabelled(Vec<PullRequest>),

    #[error("Unknown labels: {}", join_labels(.0))]
    UnknownLabels(BTreeSet<String>),
}

fn bullet_urls(prs: &[PullRequest]) -> String {
    prs.iter()
        .map(|pr| format!("- {}", pr.url()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_labels(labels: &BTreeSet<String>) -> String {
    labels.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// PRs credited to one author under small fixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorBucket {
    pub author: String,
    pub pull_requests: Vec<PullRequest>,
}

#[derive(Debug, Default)]
pub struct Categorized {
    by_label: HashMap<ReleaseNoteLabel, Vec<PullRequest>>,
    /// First-seen author order.
    pub by_author: Vec<AuthorBucket>,
}

impl Categorized {
    pub fn with_label(&self, label: ReleaseNoteLabel) -> &[PullRequest] {
        self.by_label.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    fn push_author(&mut self, pr: &PullRequest) {
        match self.by_author.iter_mut().find(|b| b.author == pr.author) {
            Some(bucket) => bucket.pull_requests.push(pr.clone()),
            None => self.by_author.push(AuthorBucket {
                author: pr.author.clone(),
                pull_requests: vec![pr.clone()],
            }),
        }
    }
}

pub struct Categorizer<'a> {
    bot: &'a str,
    label_prefix: &'a str,
}

impl<'a> Categorizer<'a> {
    pub fn new(bot: &'a str, label_prefix: &'a str) -> Self {
        Self { bot, label_prefix }
    }

    /// Every listed PR must carry a recognized release-note label, otherwise nothing is produced.
    pub fn categorize(&self, prs: &[PullRequest]) -> Result<Categorized, CategorizeError> {
        let mut categorized = Categorized::default();
        let mut unlabelled = Vec::new();
        let mut unknown = BTreeSet::new();

        for pr in prs {
            if pr.author == self.bot {
                debug!("skipping #{} authored by {}", pr.number, self.bot);
                continue;
            }

            let mut labels = pr.release_note_labels(self.label_prefix).peekable();
            if labels.peek().is_none() {
                unlabelled.push(pr.clone());
                continue;
            }

            for label in labels {
                let name = &label[self.label_prefix.len()..];
                match ReleaseNoteLabel::from_name(name) {
                    Some(ReleaseNoteLabel::None) => categorized.push_author(pr),
                    Some(known) => {
                        debug!("#{} -> {}", pr.number, known);
                        categorized.by_label.entry(known).or_default().push(pr.clone());
                    }
                    None => {
                        unknown.insert(label.to_string());
                    }
                }
            }
        }

        if !unlabelled.is_empty() {
            return Err(CategorizeError::Unlabelled(unlabelled));
        }
        if !unknown.is_empty() {
            return Err(CategorizeError::UnknownLabels(unknown));
        }

        Ok(categorized)
    }
}
