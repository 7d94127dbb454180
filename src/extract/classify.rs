//! Split a commit's changed paths into prompt files and everything else.

/// Changed paths partitioned by whether they match a prompt pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub prompt_files: Vec<String>,
    pub other_files: Vec<String>,
}

/// Whether `path` starts with any of `patterns`.
pub fn is_prompt_file<S: AsRef<str>>(path: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|p| path.starts_with(p.as_ref()))
}

/// Partition changed paths by prefix match against `patterns`.
///
/// Blank entries are dropped; every other path is kept byte for byte, since
/// it is later handed back to git. Both output lists keep the input order.
pub fn classify<P, S>(changed_paths: &[P], patterns: &[S]) -> Classification
where
    P: AsRef<str>,
    S: AsRef<str>,
{
    let mut classification = Classification::default();

    for path in changed_paths {
        let path = path.as_ref();
        if path.trim().is_empty() {
            continue;
        }

        if is_prompt_file(path, patterns) {
            classification.prompt_files.push(path.to_string());
        } else {
            classification.other_files.push(path.to_string());
        }
    }

    classification
}
