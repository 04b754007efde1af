//! ContentSource over the contents API

use sedy_core::{ContentError, ContentSource};

use crate::client::GithubClient;

impl ContentSource for GithubClient {
    fn fetch_file(&self, path: &str, git_ref: &str) -> Result<Option<String>, ContentError> {
        self.get_file(path, git_ref).map_err(|e| ContentError::Read {
            path: path.to_string(),
            git_ref: git_ref.to_string(),
            reason: e.to_string(),
        })
    }
}
