use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Prepends rendered entries to a changelog file below its top-level header.
pub struct ChangelogWriter {
    path: PathBuf,
    header: String,
}

impl ChangelogWriter {
    pub fn new(path: impl Into<PathBuf>, header: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            header: header.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Splice `entry` under the header of `existing`; the header is stripped at most once.
    /// CRLF line endings are rewritten as LF.
    pub fn splice(&self, existing: &str, entry: &str) -> String {
        let existing = existing.replace("\r\n", "\n");
        let leading_header = format!("{}\n\n", self.header);
        let body = existing.strip_prefix(&leading_header).unwrap_or(existing.as_str());
        format!("{}\n\n{}\n\n{}", self.header, entry, body)
    }

    /// Rewrites the whole file; there is no backup.
    pub fn prepend(&self, entry: &str) -> Result<()> {
        let existing = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let updated = self.splice(&existing, entry);
        std::fs::write(&self.path, updated)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        info!("Updated {}", self.path.display());
        Ok(())
    }
}
