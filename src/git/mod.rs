//! Commit range extraction via the `git` binary.

use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Marker `--left-right --graph` puts in front of commits only reachable from the right ref.
const RIGHT_SIDE_MARKER: &str = "> ";

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("`git {args}` exited with {status}: {stderr}")]
    Failed {
        args: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Symmetric difference between two branches of a remote.
#[derive(Debug, Clone)]
pub struct CommitRange {
    pub remote: String,
    pub previous: String,
    pub current: String,
}

impl CommitRange {
    pub fn new(remote: &str, previous: &str, current: &str) -> Self {
        Self {
            remote: remote.to_string(),
            previous: previous.to_string(),
            current: current.to_string(),
        }
    }

    pub fn revision(&self) -> String {
        format!(
            "{remote}/{}...{remote}/{}",
            self.previous,
            self.current,
            remote = self.remote
        )
    }

    fn log_args(&self) -> Vec<String> {
        vec![
            "log".to_string(),
            "--left-right".to_string(),
            "--graph".to_string(),
            "--cherry-pick".to_string(),
            "--pretty=format:%s".to_string(),
            self.revision(),
        ]
    }

    /// Subjects of the commits that are only on the current branch, newest first.
    pub fn subjects(&self) -> Result<Vec<String>, GitError> {
        self.subjects_in(None)
    }

    pub fn subjects_in(&self, repo_dir: Option<&Path>) -> Result<Vec<String>, GitError> {
        let args = self.log_args();
        let mut command = Command::new("git");
        command.args(&args);
        if let Some(dir) = repo_dir {
            command.current_dir(dir);
        }

        debug!("running git {}", args.join(" "));
        let output = command.output()?;
        if !output.status.success() {
            return Err(GitError::Failed {
                args: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let subjects = right_side_subjects(&stdout);
        debug!("{} commits only on {}", subjects.len(), self.current);
        Ok(subjects)
    }
}

/// Keep the right-side-only lines of `git log --left-right --graph` output, marker stripped.
pub fn right_side_subjects(log_output: &str) -> Vec<String> {
    log_output
        .lines()
        .filter_map(|line| line.strip_prefix(RIGHT_SIDE_MARKER))
        .map(str::to_string)
        .collect()
}
