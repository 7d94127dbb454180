//! Pull request links for extraction branches.

use crate::error::RemoteError;

/// Extract owner and repo from a GitHub remote URL.
///
/// Accepts `git@github.com:owner/repo.git`, `ssh://git@github.com/owner/repo.git`
/// and `https://github.com/owner/repo.git`, with or without the `.git` suffix.
pub fn parse_github_remote(url: &str) -> Result<(String, String), RemoteError> {
    let invalid = || RemoteError::InvalidRepositoryUrl(url.to_string());

    // Handle SSH format: git@github.com:owner/repo.git
    if let Some(path) = url.strip_prefix("git@github.com:") {
        return parse_owner_repo_path(path).ok_or_else(invalid);
    }

    // Handle HTTPS and ssh:// formats
    if url.contains("github.com/") {
        let path = url.split("github.com/").nth(1).ok_or_else(invalid)?;
        return parse_owner_repo_path(path).ok_or_else(invalid);
    }

    Err(invalid())
}

fn parse_owner_repo_path(path: &str) -> Option<(String, String)> {
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');

    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Some((owner.to_string(), repo.to_string()))
        }
        _ => None,
    }
}

/// Instruction shown when no pull request link can be built.
pub fn manual_pr_hint(branch: &str) -> String {
    format!("Create PR manually for branch: {}", branch)
}

/// Link to GitHub's compare page for `base...branch`, or [`manual_pr_hint`]
/// when the remote is not on GitHub.
pub fn compare_url(remote_url: &str, base: &str, branch: &str) -> String {
    match parse_github_remote(remote_url) {
        Ok((owner, repo)) => format!(
            "https://github.com/{}/{}/compare/{}...{}?expand=1",
            owner, repo, base, branch
        ),
        Err(_) => manual_pr_hint(branch),
    }
}
