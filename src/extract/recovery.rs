//! Compensating actions for a failed extraction.

use tracing::{error, info, warn};

use crate::git::GitGateway;

/// Which compensating steps succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortReport {
    pub cherry_pick_aborted: bool,
    pub returned_to_source: bool,
    pub branch_deleted: bool,
}

impl AbortReport {
    pub fn is_clean(&self) -> bool {
        self.returned_to_source && self.branch_deleted
    }
}

/// Undo a half-finished extraction.
///
/// Aborts any in-progress cherry-pick, force-switches back to
/// `source_branch` and force-deletes `prompt_branch`. Every step is attempted
/// regardless of the others. Failures are logged and never returned; the
/// caller surfaces the error that triggered the abort.
pub fn abort_extraction<G: GitGateway + ?Sized>(
    git: &G,
    source_branch: &str,
    prompt_branch: &str,
) -> AbortReport {
    info!("Rolling back extraction branch {}", prompt_branch);

    // Fails harmlessly when no cherry-pick is in progress.
    let cherry_pick_aborted = match git.abort_cherry_pick() {
        Ok(()) => true,
        Err(e) => {
            warn!("cherry-pick --abort: {}", e);
            false
        }
    };

    let returned_to_source = match git.checkout(source_branch, true) {
        Ok(()) => true,
        Err(e) => {
            error!(
                "Could not return to {}: {}. Run `git checkout -f {}` manually.",
                source_branch, e, source_branch
            );
            false
        }
    };

    // git refuses to delete the checked-out branch, so this only succeeds
    // once the checkout above did.
    let branch_deleted = match git.delete_branch(prompt_branch) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Could not delete {}: {}. Run `git branch -D {}` manually.",
                prompt_branch, e, prompt_branch
            );
            false
        }
    };

    AbortReport {
        cherry_pick_aborted,
        returned_to_source,
        branch_deleted,
    }
}
