//! Error types for prrompt modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Bare repository not supported")]
    BareRepository,

    #[error("Failed to find reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to read commit {0}: {1}")]
    ReadCommit(String, #[source] git2::Error),

    #[error("Failed to diff commit {0}: {1}")]
    DiffFailed(String, #[source] git2::Error),

    #[error("Could not determine HEAD: {0}")]
    Head(#[source] git2::Error),

    #[error("HEAD is detached; no branch is checked out")]
    DetachedHead,

    #[error("Could not read git config: {0}")]
    Config(#[source] git2::Error),

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },
}

/// Errors from the extraction protocol.
///
/// `Analysis` and `Stash` leave the repository untouched; every other variant
/// is raised after it was mutated.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("error analyzing commit: {0}")]
    Analysis(#[source] GitError),

    #[error("failed to stash uncommitted changes: {source}")]
    Stash {
        #[source]
        source: GitError,
    },

    #[error("failed to create branch {branch}: {source}")]
    CreateBranch {
        branch: String,
        #[source]
        source: GitError,
    },

    #[error("failed to cherry-pick {sha}: {source}")]
    CherryPick {
        sha: String,
        #[source]
        source: GitError,
    },

    #[error("failed to exclude {path} from the extraction commit: {source}")]
    Isolate {
        path: String,
        #[source]
        source: GitError,
    },

    #[error("failed to commit on {branch}: {source}")]
    Commit {
        branch: String,
        #[source]
        source: GitError,
    },

    #[error(
        "failed to return to original branch {branch}: {source}. You are still on the extraction branch; run `git checkout -f {branch}` to recover."
    )]
    Restore {
        branch: String,
        #[source]
        source: GitError,
    },

    #[error(
        "failed to reapply uncommitted changes: {source}. They are kept in `git stash list`; run `git stash pop --index` to recover."
    )]
    Unstash {
        #[source]
        source: GitError,
    },
}

/// Errors from reading prrompt configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config key '{key}': {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: GitError,
    },
}

/// Errors from installing the post-commit hook.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Not in a git repository: {0}")]
    NotARepository(#[source] git2::Error),

    #[error("Cannot install hooks into a bare repository")]
    BareRepository,

    #[error("Could not read git config: {0}")]
    Config(#[source] git2::Error),

    #[error("Failed to create hooks directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to back up existing hook {path}: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write hook {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from parsing a remote URL.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Failed to parse repository URL: {0}")]
    InvalidRepositoryUrl(String),
}
