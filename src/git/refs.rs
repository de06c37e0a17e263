//! Ref-name normalization.
//!
//! Turns the refs git prints (`refs/heads/main`, `refs/remotes/origin/main`,
//! `remotes/origin/main`, ...) into bare branch names. Tags, the `HEAD`
//! pseudo-branch and remote `HEAD` aliases never name a branch.

/// Normalize a fully-qualified ref (as printed by `git for-each-ref`).
///
/// Returns `None` for anything that is not a local or remote-tracking
/// branch.
///
/// ```
/// use waldo::git::branch_from_full_ref;
///
/// assert_eq!(branch_from_full_ref("refs/heads/main"), Some("main"));
/// assert_eq!(branch_from_full_ref("refs/remotes/origin/feature/x"), Some("feature/x"));
/// assert_eq!(branch_from_full_ref("refs/remotes/origin/HEAD"), None);
/// assert_eq!(branch_from_full_ref("refs/tags/v1.0"), None);
/// ```
pub fn branch_from_full_ref(raw: &str) -> Option<&str> {
    let name = raw.trim().strip_prefix("refs/")?;
    branch_from_namespaced(name)
}

/// Normalize a short ref (as printed by `git name-rev --name-only`).
///
/// Same rules as [`branch_from_full_ref`] without the `refs/` prefix; a
/// bare name with no namespace passes through unchanged.
pub fn branch_from_short_ref(raw: &str) -> Option<&str> {
    let name = raw.trim();

    if name.starts_with("heads/") || name.starts_with("remotes/") || name.starts_with("tags/") {
        return branch_from_namespaced(name);
    }

    valid_branch(name)
}

/// Normalize every line of `git for-each-ref` output.
///
/// Invalid refs are dropped and duplicates removed, keeping the order in
/// which each name was first seen.
pub fn branch_names_from_refs(output: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for name in output.lines().filter_map(branch_from_full_ref) {
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }

    names
}

/// Drop a `~N` / `^N` ancestry suffix from a `name-rev` answer.
///
/// Neither character may appear in a ref name.
pub fn strip_ancestry_suffix(name: &str) -> &str {
    match name.find(['~', '^']) {
        Some(idx) => &name[..idx],
        None => name,
    }
}

fn branch_from_namespaced(name: &str) -> Option<&str> {
    if let Some(branch) = name.strip_prefix("heads/") {
        return valid_branch(branch);
    }

    if let Some(remote_ref) = name.strip_prefix("remotes/") {
        let (_remote, branch) = remote_ref.split_once('/')?;
        return valid_branch(branch);
    }

    None
}

fn valid_branch(name: &str) -> Option<&str> {
    if name.is_empty() || name == "HEAD" {
        None
    } else {
        Some(name)
    }
}
