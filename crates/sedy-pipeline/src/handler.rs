// handler.rs - Invocation boundary: one event in, one JSON-able result out.
//
// Collaborator failures stop here. They are logged with the run id and the
// caller only sees the administrator message.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sedy_core::{messages, FixBatch};

use crate::orchestrator::{BatchResult, Pipeline};

/// What the invocation reports back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvocationResult {
    Batch(BatchResult),
    Error { success: bool, error: String },
}

impl InvocationResult {
    pub fn success(&self) -> bool {
        match self {
            InvocationResult::Batch(result) => result.success,
            InvocationResult::Error { .. } => false,
        }
    }
}

/// Run `batch` through `pipeline`, folding any error into the generic reply.
pub fn handle(pipeline: &mut Pipeline<'_>, batch: &FixBatch) -> InvocationResult {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "batch",
        %run_id,
        repository = %batch.repository,
        pull_request = batch.pull_request.number,
        sender = %batch.sender,
    );
    let _entered = span.enter();

    tracing::info!(requests = batch.fixes.len(), "handling fix batch");
    match pipeline.run(batch) {
        Ok(result) => {
            match result.reason {
                Some(reason) => tracing::info!(%reason, "batch finished without push"),
                None => tracing::info!(commits = result.commits.len(), "batch pushed"),
            }
            InvocationResult::Batch(result)
        }
        Err(e) => {
            tracing::error!(error = %e, "batch aborted");
            InvocationResult::Error {
                success: false,
                error: messages::ADMINISTRATOR_MESSAGE.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{comment, pull_request, FixedSafeguard, RecordingGit, ScriptedResolver};
    use sedy_core::{FixRequest, LogAnswerer, Match, RepositoryRef, ResolvedFix};

    fn batch() -> FixBatch {
        FixBatch {
            repository: RepositoryRef::new("marmelab", "sedy"),
            pull_request: pull_request(),
            sender: "username".into(),
            fixes: vec![FixRequest {
                comment: comment(Some(2)),
                matches: vec![Match::literal("old", "new")],
            }],
        }
    }

    fn fix() -> ResolvedFix {
        ResolvedFix {
            file_path: "folder/to/blob.txt".into(),
            base_content: "old".into(),
            new_content: "new".into(),
            applied_match: Match::literal("old", "new"),
        }
    }

    #[test]
    fn git_failure_becomes_the_administrator_message() {
        let mut git = RecordingGit::failing();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![Some(fix())]);
        let safeguard = FixedSafeguard(true);
        let mut pipeline = Pipeline::new(&safeguard, &resolver, &mut git, &answerer);

        let result = handle(&mut pipeline, &batch());

        assert!(!result.success());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": "An error occurred, please contact an administrator."
            })
        );
    }

    #[test]
    fn pushed_batch_serializes_flat() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![Some(fix())]);
        let safeguard = FixedSafeguard(true);
        let mut pipeline = Pipeline::new(&safeguard, &resolver, &mut git, &answerer);

        let result = handle(&mut pipeline, &batch());

        assert!(result.success());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("reason").is_none());
        assert_eq!(json["commits"][0]["sha"], "commit-sha-1");
    }

    #[test]
    fn denied_batch_reports_reason() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![]);
        let safeguard = FixedSafeguard(false);
        let mut pipeline = Pipeline::new(&safeguard, &resolver, &mut git, &answerer);

        let json = serde_json::to_value(handle(&mut pipeline, &batch())).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["reason"], "not permitted");
    }
}
