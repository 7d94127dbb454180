//! prrompt - A git post-commit hook that moves prompt file changes onto their own branch.
//!
//! # Overview
//!
//! When a commit touches files under configured prefixes (`prompts/` and
//! `.claude/skills/` by default), prrompt cherry-picks it onto a fresh
//! `skill-update/<short sha>` branch cut from the base branch, keeps only the
//! prompt files in the commit, pushes the branch and switches back. Mixed
//! commits leave their other files untouched on the source branch.

pub mod config;
pub mod error;
pub mod extract;
pub mod git;
pub mod hook;
pub mod logging;
pub mod remote;

// Re-export commonly used types
pub use config::{OtherFilesPolicy, PromptConfig};
pub use error::{ConfigError, ExtractError, GitError, HookError, RemoteError};
pub use extract::{CommitInfo, ExtractionReport, Extractor, Outcome, SkipReason};
pub use git::{GitCli, GitGateway};
