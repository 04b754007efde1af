// batch_flow.rs - Whole batches through the real resolver and commit session.
//
// The branch lives in memory and commits are simulated by the dry-run
// surface, whose content overlay lets later fixes read earlier commits:
//
//   1. Gate allows the sender
//   2. Fix #1 resolves against the tip read at checkout and is committed
//   3. Fix #2 resolves against fix #1's commit and is committed on top
//   4. The branch is pushed once, at fix #2's commit
//
// VERIFY:
//   - Both fixes are present in the final content of a shared file
//   - Every commit's parent is the previous commit
//   - Skipped requests are replied to and do not break the chain

use std::collections::HashMap;

use chrono::Utc;

use sedy_core::{
    ContentError, ContentSource, FixBatch, FixRequest, LogAnswerer, Match, PullRequestRef,
    RepositoryRef, ReviewComment, SkipReason,
};
use sedy_fixer::SubstitutionResolver;
use sedy_pipeline::{handle, BatchFailure, InvocationResult, Pipeline};
use sedy_policy::Safeguard;
use sedy_submit::{DryRunGitSurface, GitSurface};

const BRANCH: &str = "fix-readme";

/// Files at the tip of the pull request branch.
struct Branch(HashMap<String, String>);

impl Branch {
    fn with(files: &[(&str, &str)]) -> Self {
        Branch(
            files
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
        )
    }
}

impl ContentSource for Branch {
    fn fetch_file(&self, path: &str, git_ref: &str) -> Result<Option<String>, ContentError> {
        if git_ref != BRANCH {
            return Err(ContentError::Read {
                path: path.into(),
                git_ref: git_ref.into(),
                reason: "unknown ref".into(),
            });
        }
        Ok(self.0.get(path).cloned())
    }
}

struct AllowAll;

impl Safeguard for AllowAll {
    fn check_commenter_can_commit(&self, _login: &str) -> bool {
        true
    }
}

fn request(id: u64, path: &str, position: Option<u64>, matches: Vec<Match>) -> FixRequest {
    FixRequest {
        comment: ReviewComment {
            id,
            author: "reviewer".into(),
            created_at: Utc::now(),
            url: format!("https://github.com/marmelab/sedy/pull/7#discussion_r{id}"),
            file_path: path.into(),
            position,
        },
        matches,
    }
}

fn batch(fixes: Vec<FixRequest>) -> FixBatch {
    FixBatch {
        repository: RepositoryRef::new("marmelab", "sedy"),
        pull_request: PullRequestRef {
            number: 7,
            branch_ref: BRANCH.into(),
            url: "https://github.com/marmelab/sedy/pull/7".into(),
        },
        sender: "reviewer".into(),
        fixes,
    }
}

#[test]
fn two_fixes_on_the_same_file_both_land() {
    let mut git = DryRunGitSurface::new();
    let branch = Branch::with(&[("README.md", "Teh quick brwon fox")]);
    let resolver = SubstitutionResolver::new(git.content(branch));
    let answerer = LogAnswerer::new();

    let result = {
        let mut pipeline = Pipeline::new(&AllowAll, &resolver, &mut git, &answerer);
        pipeline
            .run(&batch(vec![
                request(1, "README.md", Some(1), vec![Match::literal("Teh", "The")]),
                request(2, "README.md", Some(1), vec![Match::literal("brwon", "brown")]),
            ]))
            .unwrap()
    };

    assert!(result.success);
    assert_eq!(result.commit_shas(), vec!["dry-run-1", "dry-run-2"]);
    assert!(answerer.replies().is_empty());

    let commits = git.commits();
    assert_eq!(commits[0].parent, BRANCH);
    assert_eq!(commits[1].parent, "dry-run-1");
    assert_eq!(
        commits[1].message,
        "Typo fix s/brwon/brown/\n\nAs requested by @reviewer at \
         https://github.com/marmelab/sedy/pull/7#discussion_r2"
    );

    let head = resolver_content(&git, "README.md", "dry-run-2");
    assert_eq!(head.as_deref(), Some("The quick brown fox"));

    // The batch already pushed dry-run-2; pushing it again changes nothing.
    let again = git.push(BRANCH, "dry-run-2").unwrap();
    assert!(!again.updated);
}

#[test]
fn skipped_requests_keep_the_chain_intact() {
    let mut git = DryRunGitSurface::new();
    let branch = Branch::with(&[
        ("README.md", "Teh quick brown fox"),
        ("docs/guide.md", "colour and colour"),
    ]);
    let resolver = SubstitutionResolver::new(git.content(branch));
    let answerer = LogAnswerer::new();

    let result = {
        let mut pipeline = Pipeline::new(&AllowAll, &resolver, &mut git, &answerer);
        pipeline
            .run(&batch(vec![
                request(1, "README.md", Some(1), vec![Match::literal("Teh", "The")]),
                request(2, "README.md", None, vec![Match::literal("quick", "slow")]),
                request(3, "README.md", Some(1), vec![Match::literal("zebra", "horse")]),
                request(4, "docs/guide.md", Some(3), vec![Match::pattern("colou?r", "color")]),
            ]))
            .unwrap()
    };

    assert!(result.success);
    assert_eq!(result.commit_shas(), vec!["dry-run-1", "dry-run-2"]);
    assert_eq!(
        result
            .skipped
            .iter()
            .map(|s| (s.comment_id, s.reason))
            .collect::<Vec<_>>(),
        vec![(2, SkipReason::NotAReviewComment), (3, SkipReason::NoMatch)]
    );

    let replies: Vec<u64> = answerer.replies().into_iter().map(|(id, _)| id).collect();
    assert_eq!(replies, vec![2, 3]);

    assert_eq!(
        resolver_content(&git, "docs/guide.md", "dry-run-2").as_deref(),
        Some("color and colour")
    );
    assert_eq!(
        resolver_content(&git, "README.md", "dry-run-2").as_deref(),
        Some("The quick brown fox")
    );
}

#[test]
fn nothing_matching_is_reported_without_commits() {
    let mut git = DryRunGitSurface::new();
    let resolver = SubstitutionResolver::new(git.content(Branch::with(&[("a.txt", "hello")])));
    let answerer = LogAnswerer::new();
    let mut pipeline = Pipeline::new(&AllowAll, &resolver, &mut git, &answerer);

    let result = handle(
        &mut pipeline,
        &batch(vec![request(1, "a.txt", Some(1), vec![Match::literal("bye", "hi")])]),
    );

    match result {
        InvocationResult::Batch(result) => {
            assert_eq!(result.reason, Some(BatchFailure::NoFixFound));
            assert!(result.commits.is_empty());
        }
        other => panic!("unexpected result: {other:?}"),
    }
    drop(pipeline);
    assert!(git.commits().is_empty());
}

/// Read `path` at a simulated sha through a fresh overlay.
fn resolver_content(git: &DryRunGitSurface, path: &str, sha: &str) -> Option<String> {
    git.content(Branch::with(&[]))
        .fetch_file(path, sha)
        .unwrap()
}
