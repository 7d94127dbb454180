//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use git2::{BranchType, ObjectType, Oid, Repository, RepositoryInitOptions, Signature, TreeWalkMode, TreeWalkResult};

use prrompt::config::PromptConfig;
use prrompt::error::ExtractError;
use prrompt::extract::{Extractor, Outcome};
use prrompt::git::GitCli;

/// Branch the test commits are made on.
pub const FEATURE_BRANCH: &str = "feature-branch";

/// A test git repository with an empty `main` and a checked-out feature branch.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a repository with one empty commit on `main` and switch to
    /// `feature-branch`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");

        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &opts).expect("Failed to init git repo");

        {
            let mut config = repo.config().expect("Failed to open config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
            // Keep globally configured hooks out of the extraction commits
            config.set_str("core.hooksPath", "/dev/null").unwrap();
        }

        let test_repo = Self { dir, repo };
        let initial = test_repo.commit_files("Initial commit", &[]);
        test_repo.branch(FEATURE_BRANCH, initial);
        test_repo
            .repo
            .set_head(&format!("refs/heads/{}", FEATURE_BRANCH))
            .expect("Failed to switch to feature branch");

        test_repo
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `files` to the working tree, stage them and commit on HEAD.
    pub fn commit_files(&self, message: &str, files: &[(&str, &str)]) -> Oid {
        let mut index = self.repo.index().expect("Failed to get index");
        // The git binary may have rewritten the index since it was cached
        index.read(true).expect("Failed to reload index");

        for (path, content) in files {
            let full_path = self.path().join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create directories");
            }
            std::fs::write(&full_path, content).expect("Failed to write test file");
            index.add_path(Path::new(path)).expect("Failed to add file");
        }

        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let sig = self.signature();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a branch pointing to the given OID.
    pub fn branch(&self, name: &str, oid: Oid) {
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        self.repo.branch(name, &commit, false).expect("Failed to create branch");
    }

    /// Run the system git binary in the repository.
    pub fn git_cmd(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn set_config(&self, key: &str, value: &str) {
        self.repo
            .config()
            .expect("Failed to open config")
            .set_str(key, value)
            .expect("Failed to set config");
    }

    pub fn current_branch(&self) -> String {
        self.repo
            .head()
            .expect("Failed to read HEAD")
            .shorthand()
            .expect("HEAD is not valid UTF-8")
            .to_string()
    }

    pub fn local_branches(&self) -> Vec<String> {
        self.repo
            .branches(Some(BranchType::Local))
            .expect("Failed to list branches")
            .map(|b| {
                let (branch, _) = b.expect("Failed to read branch");
                branch.name().unwrap().unwrap().to_string()
            })
            .collect()
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.repo.find_branch(name, BranchType::Local).is_ok()
    }

    /// Files in the tree at the tip of `branch`.
    pub fn tree_files(&self, branch: &str) -> Vec<String> {
        let commit = self
            .repo
            .find_branch(branch, BranchType::Local)
            .expect("Branch not found")
            .get()
            .peel_to_commit()
            .expect("Failed to peel branch");
        let tree = commit.tree().expect("Failed to read tree");

        let mut files = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                files.push(format!("{}{}", root, entry.name().unwrap()));
            }
            TreeWalkResult::Ok
        })
        .expect("Failed to walk tree");
        files
    }

    /// Message of the commit at the tip of `branch`.
    pub fn tip_message(&self, branch: &str) -> String {
        let commit = self
            .repo
            .find_branch(branch, BranchType::Local)
            .expect("Branch not found")
            .get()
            .peel_to_commit()
            .expect("Failed to peel branch");
        commit.message().unwrap_or("").to_string()
    }

    /// Add a bare repository as `origin`. Keep the returned dir alive.
    pub fn add_bare_origin(&self) -> tempfile::TempDir {
        let remote_dir = tempfile::tempdir().expect("Failed to create remote dir");
        Repository::init_bare(remote_dir.path()).expect("Failed to init bare repo");
        self.repo
            .remote("origin", remote_dir.path().to_str().expect("Invalid remote path"))
            .expect("Failed to add origin remote");
        remote_dir
    }

    /// Run prrompt against `rev` with the repository's configuration.
    pub fn run_prrompt(&self, rev: &str) -> Result<Outcome, ExtractError> {
        let git = GitCli::open(self.path()).expect("Failed to open repository");
        let config = PromptConfig::load(&git).expect("Failed to load config");
        Extractor::new(&git, &config).run(rev)
    }
}

/// The seven-character form of a commit id.
pub fn short(oid: Oid) -> String {
    oid.to_string()[..7].to_string()
}
