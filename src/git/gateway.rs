//! Capability interface over the version control system.

use crate::error::GitError;

/// The set of git operations the extraction protocol needs.
///
/// Each method is one blocking, atomic step. This abstraction allows mocking
/// the repository in tests so the protocol and its recovery path can be
/// exercised without a working tree.
#[cfg_attr(test, mockall::automock)]
pub trait GitGateway {
    /// Name of the checked-out branch. Fails with [`GitError::DetachedHead`]
    /// when HEAD does not point at a branch.
    fn current_branch(&self) -> Result<String, GitError>;

    /// Resolve a revision (full or short hash, ref name) to a full commit id.
    fn resolve_commit(&self, rev: &str) -> Result<String, GitError>;

    /// Full commit message with trailing whitespace removed.
    fn commit_message(&self, sha: &str) -> Result<String, GitError>;

    /// Paths touched by the commit relative to its parent.
    fn changed_files(&self, sha: &str) -> Result<Vec<String>, GitError>;

    /// Whether tracked files have staged or unstaged changes. Untracked files
    /// do not count.
    fn has_local_changes(&self) -> Result<bool, GitError>;

    /// Save staged and unstaged changes to tracked files on the stash.
    fn stash_push(&self, message: &str) -> Result<(), GitError>;

    /// Reapply the newest stash entry, index included, and drop it.
    fn stash_pop(&self) -> Result<(), GitError>;

    /// Create `name` from `base` and switch to it.
    fn create_branch(&self, name: &str, base: &str) -> Result<(), GitError>;

    /// Switch to an existing branch, discarding local changes when `force` is set.
    fn checkout(&self, branch: &str, force: bool) -> Result<(), GitError>;

    /// Apply the commit's changes to the index and working tree without committing.
    fn cherry_pick_no_commit(&self, sha: &str) -> Result<(), GitError>;

    fn abort_cherry_pick(&self) -> Result<(), GitError>;

    /// Remove a path from the index, leaving the working-tree file alone.
    fn unstage(&self, path: &str) -> Result<(), GitError>;

    /// Drop working-tree changes to a path.
    fn discard_changes(&self, path: &str) -> Result<(), GitError>;

    fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Push a branch and set its upstream.
    fn push(&self, remote: &str, branch: &str) -> Result<(), GitError>;

    /// Force-delete a local branch.
    fn delete_branch(&self, name: &str) -> Result<(), GitError>;

    /// Read a configuration value. `Ok(None)` when the key is not set.
    fn config_value(&self, key: &str) -> Result<Option<String>, GitError>;

    /// URL of the named remote. `Ok(None)` when the remote does not exist.
    fn remote_url(&self, remote: &str) -> Result<Option<String>, GitError>;
}
