//! Commit analysis: read a commit and classify the files it touches.

use tracing::debug;

use crate::error::{ExtractError, GitError};
use crate::git::GitGateway;

use super::classify::classify;

/// Length of the abbreviated commit id used in branch names and messages.
pub const SHORT_SHA_LEN: usize = 7;

/// Everything the extraction needs to know about one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
    pub prompt_files: Vec<String>,
    pub other_files: Vec<String>,
    /// Branch the commit was made on.
    pub source_branch: String,
}

impl CommitInfo {
    /// A mixed commit touches prompt files and other files.
    pub fn is_mixed(&self) -> bool {
        !self.other_files.is_empty()
    }

    pub fn has_prompt_files(&self) -> bool {
        !self.prompt_files.is_empty()
    }

    /// First seven characters of the commit id.
    pub fn short_sha(&self) -> &str {
        self.sha.get(..SHORT_SHA_LEN).unwrap_or(&self.sha)
    }
}

/// Read the commit's message, the current branch and its changed files.
///
/// Nothing is mutated, so failures need no cleanup.
pub fn analyze_commit<G, S>(git: &G, rev: &str, patterns: &[S]) -> Result<CommitInfo, ExtractError>
where
    G: GitGateway + ?Sized,
    S: AsRef<str>,
{
    read_commit(git, rev, patterns).map_err(ExtractError::Analysis)
}

fn read_commit<G, S>(git: &G, rev: &str, patterns: &[S]) -> Result<CommitInfo, GitError>
where
    G: GitGateway + ?Sized,
    S: AsRef<str>,
{
    let sha = git.resolve_commit(rev)?;
    let message = git.commit_message(&sha)?;
    let source_branch = git.current_branch()?;
    let changed = git.changed_files(&sha)?;

    let classification = classify(changed.as_slice(), patterns);

    debug!(
        "Commit {} on {}: {} prompt file(s), {} other file(s)",
        sha,
        source_branch,
        classification.prompt_files.len(),
        classification.other_files.len()
    );

    Ok(CommitInfo {
        sha,
        message,
        prompt_files: classification.prompt_files,
        other_files: classification.other_files,
        source_branch,
    })
}
