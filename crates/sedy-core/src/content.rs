// content.rs - ContentSource trait: read a file as of a commit or branch.

/// Errors from ContentSource reads.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read '{path}' at {git_ref}: {reason}")]
    Read {
        path: String,
        git_ref: String,
        reason: String,
    },
}

/// Read access to file content at a given ref.
///
/// `git_ref` is either a commit sha or a branch name. A file that does not
/// exist at that ref is `Ok(None)`, not an error.
pub trait ContentSource {
    fn fetch_file(&self, path: &str, git_ref: &str) -> Result<Option<String>, ContentError>;
}
