use anyhow::{Context, Result};
use chrono::NaiveDate;
use handlebars::Handlebars;
use serde_json::json;
use std::fmt;
use std::path::Path;
use super::categorizer::{AuthorBucket, Categorized, ReleaseNoteLabel};

const TEMPLATE_NAME: &str = "release";

const SMALL_FIXES_TITLE: &str = "Small bug fixes and documentation updates:";

/// A titled bullet list; displays as nothing when it has no items.
#[derive(Debug, Clone)]
pub struct Section<T> {
    pub title: String,
    pub items: Vec<T>,
}

impl<T> Section<T> {
    pub fn new(title: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Section<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return Ok(());
        }
        write!(f, "{}\n\n", self.title)?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "- {}", item)?;
        }
        Ok(())
    }
}

/// What goes into one rendered changelog entry.
pub struct ReleaseNotes<'a> {
    pub project: &'a str,
    pub version: &'a str,
    pub date: NaiveDate,
    pub categorized: &'a Categorized,
}

pub struct ChangelogGenerator {
    template_engine: Handlebars<'static>,
}

impl ChangelogGenerator {
    pub fn new(template_path: Option<&Path>) -> Result<Self> {
        match template_path {
            Some(path) => {
                let template = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read template {}", path.display()))?;
                Self::with_template(&template)
            }
            None => Self::with_template(include_str!("../../templates/release_section.md.hbs")),
        }
    }

    pub fn with_template(template: &str) -> Result<Self> {
        let mut template_engine = Handlebars::new();
        // Output is markdown, not HTML
        template_engine.register_escape_fn(handlebars::no_escape);
        template_engine
            .register_template_string(TEMPLATE_NAME, template)
            .context("invalid changelog template")?;
        Ok(Self { template_engine })
    }

    pub fn generate(&self, notes: &ReleaseNotes<'_>) -> Result<String> {
        let data = json!({
            "project": notes.project,
            "version": notes.version,
            "date": notes.date.format("%Y-%m-%d").to_string(),
            "sections": Self::sections(notes.categorized),
        });

        let rendered = self.template_engine.render(TEMPLATE_NAME, &data)?;
        Ok(rendered.trim_end().to_string())
    }

    /// Non-empty blocks below the intro line, in changelog order.
    fn sections(categorized: &Categorized) -> Vec<String> {
        let labelled = [
            ("Breaking changes:", ReleaseNoteLabel::BreakingChange),
            ("Features:", ReleaseNoteLabel::Feature),
            ("Bug fixes:", ReleaseNoteLabel::BugFix),
            ("Documentation updates:", ReleaseNoteLabel::Documentation),
        ];

        labelled
            .into_iter()
            .map(|(title, label)| {
                Section::new(title, categorized.with_label(label).to_vec()).to_string()
            })
            .chain(std::iter::once(Self::small_fixes(&categorized.by_author)))
            .filter(|block| !block.trim().is_empty())
            .collect()
    }

    fn small_fixes(buckets: &[AuthorBucket]) -> String {
        if buckets.is_empty() {
            return String::new();
        }

        let credits = buckets
            .iter()
            .map(|bucket| {
                bucket
                    .pull_requests
                    .iter()
                    .map(|pr| format!("#{}", pr.number))
                    .chain(std::iter::once(format!("@{}", bucket.author)))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect::<Vec<_>>()
            .join("; ");

        format!("{}\n\n{}", SMALL_FIXES_TITLE, credits)
    }
}
