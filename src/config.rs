//! prrompt configuration, read once per invocation from git config.

use std::fmt;

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::git::GitGateway;

pub const DEFAULT_COMMIT_PREFIX: &str = "prompt";
pub const DEFAULT_BRANCH_PREFIX: &str = "skill-update";
pub const DEFAULT_BASE_BRANCH: &str = "main";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_PROMPT_PATTERNS: &[&str] = &[".claude/skills/", "prompts/"];

const KEY_COMMIT_PREFIX: &str = "prrompt.commitPrefix";
const KEY_BRANCH_PREFIX: &str = "prrompt.branchPrefix";
const KEY_BASE_BRANCH: &str = "prrompt.baseBranch";
const KEY_PROMPT_PATTERNS: &str = "prrompt.promptPatterns";
const KEY_REMOTE: &str = "prrompt.remote";
const KEY_OTHER_FILES: &str = "prrompt.otherFiles";

/// What happens to non-prompt files of a mixed commit on the extraction branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtherFilesPolicy {
    /// Remove from the index only; the files stay in the working tree.
    #[default]
    Unstage,
    /// Remove from the index and drop the working-tree content.
    Discard,
}

impl std::str::FromStr for OtherFilesPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unstage" => Ok(Self::Unstage),
            "discard" => Ok(Self::Discard),
            _ => Err(format!("Unknown other-files policy: {}", s)),
        }
    }
}

impl fmt::Display for OtherFilesPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtherFilesPolicy::Unstage => write!(f, "unstage"),
            OtherFilesPolicy::Discard => write!(f, "discard"),
        }
    }
}

/// Settings for one extraction run. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    /// Wrapped in brackets and prepended to extracted commit messages.
    pub commit_prefix: String,
    /// Prefix of generated branch names; also marks extraction branches.
    pub branch_prefix: String,
    /// Branch new extraction branches start from.
    pub base_branch: String,
    /// Path prefixes that identify prompt files.
    pub prompt_patterns: Vec<String>,
    pub remote: String,
    pub other_files: OtherFilesPolicy,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            commit_prefix: DEFAULT_COMMIT_PREFIX.to_string(),
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_string(),
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            prompt_patterns: default_patterns(),
            remote: DEFAULT_REMOTE.to_string(),
            other_files: OtherFilesPolicy::default(),
        }
    }
}

impl PromptConfig {
    /// Read every `prrompt.*` key once, applying defaults for missing or empty values.
    pub fn load<G: GitGateway + ?Sized>(git: &G) -> Result<Self, ConfigError> {
        let commit_prefix = read_or(git, KEY_COMMIT_PREFIX, DEFAULT_COMMIT_PREFIX)?;
        let branch_prefix = read_or(git, KEY_BRANCH_PREFIX, DEFAULT_BRANCH_PREFIX)?;
        let base_branch = read_or(git, KEY_BASE_BRANCH, DEFAULT_BASE_BRANCH)?;
        let remote = read_or(git, KEY_REMOTE, DEFAULT_REMOTE)?;

        let prompt_patterns = read_key(git, KEY_PROMPT_PATTERNS)?
            .map(|raw| parse_patterns(&raw))
            .filter(|patterns| !patterns.is_empty())
            .unwrap_or_else(default_patterns);

        let other_files = match read_key(git, KEY_OTHER_FILES)? {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{} in {}, using {}", e, KEY_OTHER_FILES, OtherFilesPolicy::default());
                OtherFilesPolicy::default()
            }),
            None => OtherFilesPolicy::default(),
        };

        let config = Self {
            commit_prefix,
            branch_prefix,
            base_branch,
            prompt_patterns,
            remote,
            other_files,
        };
        debug!("Loaded config: {:?}", config);

        Ok(config)
    }

    /// Branch name prefix including the separator, e.g. `skill-update/`.
    pub fn branch_namespace(&self) -> String {
        format!("{}/", self.branch_prefix)
    }
}

/// Split a comma-separated pattern list, trimming entries and dropping empty ones.
pub fn parse_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn default_patterns() -> Vec<String> {
    DEFAULT_PROMPT_PATTERNS.iter().map(|p| p.to_string()).collect()
}

/// Read a key, treating whitespace-only values as unset.
fn read_key<G: GitGateway + ?Sized>(git: &G, key: &str) -> Result<Option<String>, ConfigError> {
    let value = git
        .config_value(key)
        .map_err(|source| ConfigError::ReadFailed {
            key: key.to_string(),
            source,
        })?;

    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

fn read_or<G: GitGateway + ?Sized>(
    git: &G,
    key: &str,
    default: &str,
) -> Result<String, ConfigError> {
    Ok(read_key(git, key)?.unwrap_or_else(|| default.to_string()))
}
