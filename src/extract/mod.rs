//! Prompt extraction: move the prompt-file half of a commit onto its own branch.
//!
//! A run walks through these states:
//!
//! ```text
//! Idle -> Analyzing -> NoPromptFiles -> Done
//!                   -> Extracting    -> Done
//!                          |
//!                          +-> Aborting -> error
//! ```
//!
//! Extracting stashes uncommitted changes to tracked files, creates
//! `<branch_prefix>/<short sha>` from the base branch, cherry-picks the commit
//! without committing, unstages the non-prompt files, commits, pushes,
//! switches back to the source branch and pops the stash. A failure after the
//! branch exists runs [`abort_extraction`] before the error is returned.

pub mod analysis;
pub mod classify;
pub mod recovery;

use tracing::{debug, error, info, warn};

use crate::config::{OtherFilesPolicy, PromptConfig};
use crate::error::{ExtractError, GitError};
use crate::git::GitGateway;
use crate::remote::{compare_url, manual_pr_hint};

pub use analysis::{CommitInfo, SHORT_SHA_LEN, analyze_commit};
pub use classify::{Classification, classify, is_prompt_file};
pub use recovery::{AbortReport, abort_extraction};

/// Why a run ended before analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The current branch is itself an extraction branch; the commit that
    /// triggered the hook was made by a previous run.
    OnExtractionBranch(String),
    /// No branch is checked out, so there is nothing to return to.
    DetachedHead,
}

/// Result of a completed extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub commit: CommitInfo,
    pub prompt_branch: String,
    /// Set when the push failed; the branch then exists only locally.
    pub push_warning: Option<String>,
    /// Pull request link, or instructions when the remote is not on GitHub.
    pub compare_url: String,
}

impl ExtractionReport {
    pub fn pushed(&self) -> bool {
        self.push_warning.is_none()
    }
}

/// How a run ended successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    /// The commit touches no prompt files. The common case.
    NoPromptFiles(CommitInfo),
    Extracted(ExtractionReport),
}

/// Drives one extraction run against a git gateway.
pub struct Extractor<'a, G: GitGateway + ?Sized> {
    git: &'a G,
    config: &'a PromptConfig,
}

impl<'a, G: GitGateway + ?Sized> Extractor<'a, G> {
    pub fn new(git: &'a G, config: &'a PromptConfig) -> Self {
        Self { git, config }
    }

    /// Analyze `rev` and, when it touches prompt files, extract them.
    pub fn run(&self, rev: &str) -> Result<Outcome, ExtractError> {
        // Commits made by the extraction itself re-trigger the hook.
        match self.git.current_branch() {
            Ok(branch) if branch.starts_with(&self.config.branch_namespace()) => {
                debug!("On extraction branch {}, skipping", branch);
                return Ok(Outcome::Skipped(SkipReason::OnExtractionBranch(branch)));
            }
            Err(GitError::DetachedHead) => {
                debug!("HEAD is detached, skipping");
                return Ok(Outcome::Skipped(SkipReason::DetachedHead));
            }
            Ok(_) => {}
            // Analysis reads the branch again and reports the failure.
            Err(e) => debug!("Could not read current branch before analysis: {}", e),
        }

        let info = analyze_commit(self.git, rev, &self.config.prompt_patterns)?;

        if !info.has_prompt_files() {
            debug!("No prompt files in {}", info.short_sha());
            return Ok(Outcome::NoPromptFiles(info));
        }

        self.extract(info).map(Outcome::Extracted)
    }

    /// Run the branch-isolation protocol for an analyzed commit.
    ///
    /// Uncommitted changes to tracked files are stashed first and reapplied
    /// once the source branch is checked out again, on success and on
    /// rollback alike.
    pub fn extract(&self, info: CommitInfo) -> Result<ExtractionReport, ExtractError> {
        let prompt_branch = extraction_branch_name(&self.config.branch_prefix, info.short_sha());

        info!(
            "Extracting {} prompt file(s) from {} ({}) onto {}",
            info.prompt_files.len(),
            info.short_sha(),
            if info.is_mixed() { "mixed" } else { "prompt-only" },
            prompt_branch
        );

        // ── Set uncommitted work aside ──
        let stashed = self.stash_local_changes(&info)?;

        // ── Create branch: only the stash to undo if this fails ──
        if let Err(source) = self
            .git
            .create_branch(&prompt_branch, &self.config.base_branch)
        {
            if stashed {
                self.reapply_stash_after_rollback();
            }
            return Err(ExtractError::CreateBranch {
                branch: prompt_branch,
                source,
            });
        }

        // ── Apply the commit without committing ──
        self.git
            .cherry_pick_no_commit(&info.sha)
            .map_err(|source| {
                self.rollback(
                    &info,
                    &prompt_branch,
                    stashed,
                    ExtractError::CherryPick {
                        sha: info.sha.clone(),
                        source,
                    },
                )
            })?;

        // ── Keep only prompt files staged ──
        if info.is_mixed() {
            self.exclude_other_files(&info)
                .map_err(|e| self.rollback(&info, &prompt_branch, stashed, e))?;
        }

        // ── Commit ──
        let message = build_commit_message(&self.config.commit_prefix, &info);
        self.git.commit(&message).map_err(|source| {
            self.rollback(
                &info,
                &prompt_branch,
                stashed,
                ExtractError::Commit {
                    branch: prompt_branch.clone(),
                    source,
                },
            )
        })?;
        info!("Created extraction branch {}", prompt_branch);

        // ── Push: failure leaves a local branch the user can push later ──
        let push_warning = match self.git.push(&self.config.remote, &prompt_branch) {
            Ok(()) => {
                info!("Pushed {} to {}", prompt_branch, self.config.remote);
                None
            }
            Err(e) => {
                warn!(
                    "Failed to push {} to {} (push it manually): {}",
                    prompt_branch, self.config.remote, e
                );
                Some(e.to_string())
            }
        };

        // ── Return to the source branch ──
        // The tree held nothing but extraction state since the stash, so the
        // forced checkout cannot lose user work.
        if let Err(source) = self.git.checkout(&info.source_branch, true) {
            if stashed {
                error!("Your uncommitted changes are saved in `git stash list`");
            }
            return Err(ExtractError::Restore {
                branch: info.source_branch.clone(),
                source,
            });
        }

        // ── Reapply uncommitted work ──
        if stashed {
            self.git
                .stash_pop()
                .map_err(|source| ExtractError::Unstash { source })?;
            debug!("Reapplied uncommitted changes");
        }

        let compare_url = self.compare_url(&prompt_branch);

        Ok(ExtractionReport {
            commit: info,
            prompt_branch,
            push_warning,
            compare_url,
        })
    }

    /// Stash tracked changes when there are any. Returns whether a stash
    /// entry was created.
    fn stash_local_changes(&self, info: &CommitInfo) -> Result<bool, ExtractError> {
        let dirty = self
            .git
            .has_local_changes()
            .map_err(|source| ExtractError::Stash { source })?;
        if !dirty {
            return Ok(false);
        }

        let message = format!("prrompt: uncommitted changes before extracting {}", info.short_sha());
        self.git
            .stash_push(&message)
            .map_err(|source| ExtractError::Stash { source })?;
        info!("Stashed uncommitted changes on {}", info.source_branch);
        Ok(true)
    }

    /// Unstage every non-prompt file so the next commit holds prompt files only.
    fn exclude_other_files(&self, info: &CommitInfo) -> Result<(), ExtractError> {
        for path in &info.other_files {
            debug!("Excluding {}", path);

            self.git
                .unstage(path)
                .map_err(|source| ExtractError::Isolate {
                    path: path.clone(),
                    source,
                })?;

            if self.config.other_files == OtherFilesPolicy::Discard {
                if let Err(e) = self.git.discard_changes(path) {
                    warn!("Could not discard working-tree changes to {}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// Run the compensating actions and hand back the error that caused them.
    fn rollback(
        &self,
        info: &CommitInfo,
        prompt_branch: &str,
        stashed: bool,
        cause: ExtractError,
    ) -> ExtractError {
        warn!("{}", cause);
        let report = abort_extraction(self.git, &info.source_branch, prompt_branch);
        if !report.is_clean() {
            warn!("Rollback of {} was incomplete: {:?}", prompt_branch, report);
        }

        if stashed {
            if report.returned_to_source {
                self.reapply_stash_after_rollback();
            } else {
                error!("Your uncommitted changes are saved in `git stash list`");
            }
        }

        cause
    }

    /// Pop the stash while a failure is already being reported.
    fn reapply_stash_after_rollback(&self) {
        if let Err(e) = self.git.stash_pop() {
            error!(
                "Could not reapply uncommitted changes: {}. Run `git stash pop --index` manually.",
                e
            );
        }
    }

    fn compare_url(&self, prompt_branch: &str) -> String {
        match self.git.remote_url(&self.config.remote) {
            Ok(Some(url)) => compare_url(&url, &self.config.base_branch, prompt_branch),
            Ok(None) => manual_pr_hint(prompt_branch),
            Err(e) => {
                debug!("Could not read remote {}: {}", self.config.remote, e);
                manual_pr_hint(prompt_branch)
            }
        }
    }
}

/// Name of the extraction branch for a commit, e.g. `skill-update/0123456`.
pub fn extraction_branch_name(branch_prefix: &str, short_sha: &str) -> String {
    format!("{}/{}", branch_prefix, short_sha)
}

/// Message for the extraction commit.
///
/// Mixed commits get a trailer naming the branch and commit they came from.
pub fn build_commit_message(commit_prefix: &str, info: &CommitInfo) -> String {
    let mut message = format!("[{}] {}", commit_prefix, info.message);

    if info.is_mixed() {
        message.push_str(&format!(
            "\n\nExtracted from {} ({})",
            info.source_branch,
            info.short_sha()
        ));
    }

    message
}
