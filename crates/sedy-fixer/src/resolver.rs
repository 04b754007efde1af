// resolver.rs - Resolve a fix request against file content at a base ref.

use sedy_core::{ContentSource, FixRequest, ResolvedFix};

use crate::error::FixerError;
use crate::substitution;

/// Computes new file content for one fix request.
///
/// `base_ref` is the chain base: a commit sha, or the branch name for the
/// first fix of a batch.
pub trait Resolver {
    fn resolve(&self, request: &FixRequest, base_ref: &str)
        -> Result<Option<ResolvedFix>, FixerError>;
}

/// Resolver that applies the request's substitutions in order and keeps the
/// first one found in the file.
pub struct SubstitutionResolver<S> {
    source: S,
}

impl<S: ContentSource> SubstitutionResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: ContentSource> Resolver for SubstitutionResolver<S> {
    fn resolve(
        &self,
        request: &FixRequest,
        base_ref: &str,
    ) -> Result<Option<ResolvedFix>, FixerError> {
        let comment = &request.comment;
        if !comment.is_review_comment() || !request.has_matches() {
            tracing::debug!(comment_id = comment.id, "request is not resolvable");
            return Ok(None);
        }

        let Some(base_content) = self.source.fetch_file(&comment.file_path, base_ref)? else {
            tracing::debug!(path = %comment.file_path, base_ref, "file not found at base");
            return Ok(None);
        };

        for candidate in &request.matches {
            if let Some(new_content) = substitution::apply(&base_content, candidate) {
                tracing::debug!(path = %comment.file_path, base_ref, "applied {}", candidate);
                return Ok(Some(ResolvedFix {
                    file_path: comment.file_path.clone(),
                    base_content,
                    new_content,
                    applied_match: candidate.clone(),
                }));
            }
        }

        tracing::debug!(path = %comment.file_path, base_ref, "no substitution matched");
        Ok(None)
    }
}
