//! Production [`GitGateway`] backed by git2 and the `git` binary.
//!
//! Reads go through git2. Mutations shell out to the system `git` binary via
//! `std::process::Command`, inheriting the user's existing git config, SSH
//! agent, credential store and hooks.

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{ErrorCode, Oid, Repository};
use tracing::debug;

use crate::error::GitError;

use super::gateway::GitGateway;

/// Git access for one working tree.
pub struct GitCli {
    repo: Repository,
    workdir: PathBuf,
}

impl GitCli {
    /// Open the repository containing `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let repo = Repository::discover(path).map_err(GitError::OpenRepository)?;
        let workdir = repo
            .workdir()
            .ok_or(GitError::BareRepository)?
            .to_path_buf();

        Ok(Self { repo, workdir })
    }

    /// Root of the working tree every git command runs in.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run a git command in the working tree and return its trimmed stdout.
    fn run_git(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| GitError::SpawnFailed {
                operation: operation.to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                failure_detail(&String::from_utf8_lossy(&output.stdout))
            } else {
                failure_detail(&stderr)
            };
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                stderr: detail,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn find_commit(&self, sha: &str) -> Result<git2::Commit<'_>, GitError> {
        let oid = Oid::from_str(sha).map_err(|e| GitError::ReadCommit(sha.to_string(), e))?;
        self.repo
            .find_commit(oid)
            .map_err(|e| GitError::ReadCommit(sha.to_string(), e))
    }
}

/// Collapse git's diagnostic output to one line: advice (`hint:`) and blank
/// lines are dropped, the rest joined with `; `.
fn failure_detail(output: &str) -> String {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("hint:"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl GitGateway for GitCli {
    fn current_branch(&self) -> Result<String, GitError> {
        let head = self.repo.head().map_err(GitError::Head)?;

        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or_else(|| GitError::Head(git2::Error::from_str("branch name is not valid UTF-8")))
    }

    fn resolve_commit(&self, rev: &str) -> Result<String, GitError> {
        let object = self
            .repo
            .revparse_single(rev)
            .map_err(|e| GitError::ReferenceNotFound(rev.to_string(), e))?;
        let commit = object
            .peel_to_commit()
            .map_err(|e| GitError::ReadCommit(rev.to_string(), e))?;

        Ok(commit.id().to_string())
    }

    fn commit_message(&self, sha: &str) -> Result<String, GitError> {
        let commit = self.find_commit(sha)?;
        let message = String::from_utf8_lossy(commit.message_bytes());
        Ok(message.trim_end().to_string())
    }

    fn changed_files(&self, sha: &str) -> Result<Vec<String>, GitError> {
        let commit = self.find_commit(sha)?;

        // Merge commits have no single parent to diff against.
        if commit.parent_count() > 1 {
            debug!("{} is a merge commit; reporting no changed files", sha);
            return Ok(Vec::new());
        }

        let tree = commit
            .tree()
            .map_err(|e| GitError::DiffFailed(sha.to_string(), e))?;
        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(
                commit
                    .parent(0)
                    .and_then(|p| p.tree())
                    .map_err(|e| GitError::DiffFailed(sha.to_string(), e))?,
            ),
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .map_err(|e| GitError::DiffFailed(sha.to_string(), e))?;

        let files = diff
            .deltas()
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().to_string())
            })
            .collect();

        Ok(files)
    }

    fn has_local_changes(&self) -> Result<bool, GitError> {
        let status = self.run_git(
            &["status", "--porcelain", "--untracked-files=no"],
            "status",
        )?;
        Ok(!status.is_empty())
    }

    fn stash_push(&self, message: &str) -> Result<(), GitError> {
        self.run_git(&["stash", "push", "--quiet", "--message", message], "stash push")
            .map(drop)
    }

    fn stash_pop(&self) -> Result<(), GitError> {
        self.run_git(&["stash", "pop", "--quiet", "--index"], "stash pop")
            .map(drop)
    }

    fn create_branch(&self, name: &str, base: &str) -> Result<(), GitError> {
        self.run_git(&["checkout", "-b", name, base], "checkout -b")
            .map(drop)
    }

    fn checkout(&self, branch: &str, force: bool) -> Result<(), GitError> {
        let args: &[&str] = if force {
            &["checkout", "-f", branch]
        } else {
            &["checkout", branch]
        };
        self.run_git(args, "checkout").map(drop)
    }

    fn cherry_pick_no_commit(&self, sha: &str) -> Result<(), GitError> {
        self.run_git(&["cherry-pick", "--no-commit", sha], "cherry-pick")
            .map(drop)
    }

    fn abort_cherry_pick(&self) -> Result<(), GitError> {
        // A conflicted --no-commit pick leaves no CHERRY_PICK_HEAD, so
        // --abort refuses; reset --merge drops the half-applied index.
        match self.run_git(&["cherry-pick", "--abort"], "cherry-pick --abort") {
            Ok(_) => Ok(()),
            Err(abort_err) => {
                debug!("cherry-pick --abort failed: {}; trying reset --merge", abort_err);
                self.run_git(&["reset", "--merge"], "reset --merge").map(drop)
            }
        }
    }

    fn unstage(&self, path: &str) -> Result<(), GitError> {
        self.run_git(&["restore", "--staged", "--", path], "restore --staged")
            .map(drop)
    }

    fn discard_changes(&self, path: &str) -> Result<(), GitError> {
        // Files the commit added are untracked once unstaged, so restore has
        // nothing to go back to; clean removes them instead.
        match self.run_git(&["restore", "--worktree", "--", path], "restore") {
            Ok(_) => Ok(()),
            Err(restore_err) => {
                debug!("restore failed for {}: {}; trying clean", path, restore_err);
                self.run_git(&["clean", "-f", "-q", "--", path], "clean")
                    .map(drop)
            }
        }
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run_git(&["commit", "-m", message], "commit").map(drop)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run_git(&["push", "-u", remote, branch], "push").map(drop)
    }

    fn delete_branch(&self, name: &str) -> Result<(), GitError> {
        self.run_git(&["branch", "-D", name], "branch -D").map(drop)
    }

    fn config_value(&self, key: &str) -> Result<Option<String>, GitError> {
        let config = self.repo.config().map_err(GitError::Config)?;

        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Config(e)),
        }
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(remote) {
            Ok(r) => Ok(r.url().map(String::from)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::ReferenceNotFound(format!("remote {}", remote), e)),
        }
    }
}
