//! Post-commit hook installation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::HookError;

/// Marker line identifying a hook written by prrompt.
pub const HOOK_MARKER: &str = "# prrompt post-commit hook";

const HOOK_NAME: &str = "post-commit";

/// Where the hook ended up and what it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledHook {
    pub path: PathBuf,
    /// Copy of a foreign hook that was replaced.
    pub backup: Option<PathBuf>,
}

/// Shell script that runs `exe` on every new commit.
pub fn hook_script(exe: &Path) -> String {
    format!(
        "#!/bin/sh\n{}\n\nCOMMIT_SHA=$(git rev-parse HEAD)\n\"{}\" \"$COMMIT_SHA\"\n",
        HOOK_MARKER,
        exe.display()
    )
}

/// Directory git runs hooks from: `core.hooksPath` when set, else `<git-dir>/hooks`.
pub fn hooks_dir(repo: &Repository) -> Result<PathBuf, HookError> {
    let workdir = repo.workdir().ok_or(HookError::BareRepository)?;
    let config = repo.config().map_err(HookError::Config)?;

    match config.get_path("core.hooksPath") {
        Ok(path) if path.is_absolute() => Ok(path),
        Ok(path) => Ok(workdir.join(path)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(repo.path().join("hooks")),
        Err(e) => Err(HookError::Config(e)),
    }
}

/// Install the post-commit hook for the repository containing `path`.
pub fn install(path: &Path, exe: &Path, force: bool) -> Result<InstalledHook, HookError> {
    let repo = Repository::discover(path).map_err(HookError::NotARepository)?;
    install_post_commit(&repo, exe, force)
}

/// Write the post-commit hook into the repository's hooks directory.
///
/// A hook that was not written by prrompt is copied to `post-commit.bak`
/// first, unless `force` is set.
pub fn install_post_commit(
    repo: &Repository,
    exe: &Path,
    force: bool,
) -> Result<InstalledHook, HookError> {
    let dir = hooks_dir(repo)?;
    fs::create_dir_all(&dir).map_err(|source| HookError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let hook_path = dir.join(HOOK_NAME);
    let backup = if force {
        None
    } else {
        backup_foreign_hook(&hook_path)?
    };

    write_executable(&dir, &hook_path, &hook_script(exe))?;
    info!("Installed post-commit hook at {}", hook_path.display());

    Ok(InstalledHook {
        path: hook_path,
        backup,
    })
}

/// Copy an existing hook aside unless prrompt wrote it.
fn backup_foreign_hook(hook_path: &Path) -> Result<Option<PathBuf>, HookError> {
    let existing = match fs::read_to_string(hook_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(HookError::BackupFailed {
                path: hook_path.to_path_buf(),
                source,
            });
        }
    };

    if existing.contains(HOOK_MARKER) {
        debug!("Replacing existing prrompt hook");
        return Ok(None);
    }

    let backup_path = hook_path.with_extension("bak");
    fs::copy(hook_path, &backup_path).map_err(|source| HookError::BackupFailed {
        path: backup_path.clone(),
        source,
    })?;
    info!("Backed up existing hook to {}", backup_path.display());

    Ok(Some(backup_path))
}

/// Atomically replace `path` with an executable file holding `content`.
fn write_executable(dir: &Path, path: &Path, content: &str) -> Result<(), HookError> {
    let write_err = |source| HookError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(0o755))
            .map_err(write_err)?;
    }

    file.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
