//! Unique app names for pull request previews

use crate::utils::sha256_hash;

/// App names must be at most 32 characters
pub const MAX_APP_NAME_LEN: usize = 32;

/// Length of the hash part of the suffix
const HASH_LEN: usize = 8;

/// Derive a short app name unique to `repo_owner/repo` at `git_ref`.
///
/// The readable prefix is the lower-cased `owner-repo` with characters the
/// platform rejects removed; the suffix hashes the unmodified inputs so every
/// ref gets its own app.
pub fn generate_app_name(repo_owner: &str, repo: &str, git_ref: &str) -> String {
    let base_name = format!("{}-{}", repo_owner, repo)
        .to_lowercase()
        .replace('/', "-")
        .replace(':', "")
        .replace('_', "-");

    let unique = format!("{}-{}-{}", repo_owner, repo, git_ref);
    let digest = sha256_hash(unique.as_bytes());
    let suffix = format!("-{}", &digest[..HASH_LEN]);

    let limit = base_name.len().min(MAX_APP_NAME_LEN - suffix.len());
    format!("{}{}", truncate(&base_name, limit), suffix)
}

/// Cut to at most `max` bytes without splitting a character
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
