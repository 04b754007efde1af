// client.rs - GitHub REST client scoped to one repository.
//
// Only the endpoints the bot uses are wrapped. Requests carry the bearer
// token, the v3 media type and a pinned API version. Responses are decoded
// into small private structs so GitHub's large payloads don't leak out.

use std::time::Duration;

use base64::Engine;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use sedy_core::{FileMode, GithubConfig, RepositoryRef};

use crate::error::{GithubError, Result};

const API_VERSION: &str = "2022-11-28";
const ERROR_BODY_LIMIT: usize = 800;

/// One entry of a tree being created on top of a base tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Repository-relative path, no leading slash.
    pub path: String,
    pub mode: FileMode,
    #[serde(rename = "type")]
    pub kind: String,
    /// Sha of a blob created beforehand.
    pub sha: String,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>, mode: FileMode, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode,
            kind: "blob".to_string(),
            sha: sha.into(),
        }
    }
}

/// Author or committer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

/// Payload of the create-commit endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct NewCommit {
    pub message: String,
    pub tree: String,
    pub parents: Vec<String>,
    pub author: Signature,
    pub committer: Signature,
}

/// The parts of a git commit object the bot cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommit {
    pub sha: String,
    pub tree_sha: String,
}

#[derive(Deserialize)]
struct ShaOnly {
    sha: String,
}

#[derive(Deserialize)]
struct RefObject {
    object: ShaOnly,
}

#[derive(Deserialize)]
struct CommitObject {
    sha: String,
    tree: ShaOnly,
}

#[derive(Deserialize)]
struct ContentsFile {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    content: Option<String>,
    sha: String,
}

#[derive(Deserialize)]
struct BlobObject {
    encoding: String,
    content: String,
}

/// A collaborator's access as reported by GitHub.
///
/// `permission` is always one of the legacy levels. `role_name` carries the
/// fine-grained role, which may be an organization's custom role name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollaboratorPermission {
    pub permission: String,
    #[serde(default)]
    pub role_name: Option<String>,
}

#[derive(Deserialize)]
struct CreatedComment {
    id: u64,
}

/// Blocking GitHub client bound to one repository.
///
/// `reqwest::blocking::Client` is reference-counted internally, so cloning
/// a `GithubClient` to hand it to several components is cheap.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base: Url,
    repo: RepositoryRef,
}

impl GithubClient {
    /// Build a client for `repo` authenticated with `token`.
    pub fn new(config: &GithubConfig, token: &str, repo: RepositoryRef) -> Result<Self> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|_| GithubError::InvalidBaseUrl(config.api_base.clone()))?;
        if api_base.cannot_be_a_base() {
            return Err(GithubError::InvalidBaseUrl(config.api_base.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| GithubError::InvalidToken(format!("user agent: {e}")))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| GithubError::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(GithubError::Client)?;

        Ok(Self {
            http,
            api_base,
            repo,
        })
    }

    /// Sha the branch currently points to.
    pub fn get_branch_sha(&self, branch: &str) -> Result<String> {
        let url = self.repo_endpoint(&["git", "ref", "heads"], branch);
        let reference: RefObject = self.send_json("get ref", self.http.get(url))?;
        Ok(reference.object.sha)
    }

    pub fn get_commit(&self, sha: &str) -> Result<GitCommit> {
        let url = self.repo_endpoint(&["git", "commits"], sha);
        let commit: CommitObject = self.send_json("get commit", self.http.get(url))?;
        Ok(GitCommit {
            sha: commit.sha,
            tree_sha: commit.tree.sha,
        })
    }

    /// Store `content` as a blob, returning its sha.
    pub fn create_blob(&self, content: &str) -> Result<String> {
        let url = self.repo_endpoint(&["git", "blobs"], "");
        let body = json!({ "content": content, "encoding": "utf-8" });
        let blob: ShaOnly = self.send_json("create blob", self.http.post(url).json(&body))?;
        Ok(blob.sha)
    }

    /// Create a tree equal to `base_tree` with `entries` added or replaced.
    pub fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        let url = self.repo_endpoint(&["git", "trees"], "");
        let body = json!({ "base_tree": base_tree, "tree": entries });
        let tree: ShaOnly = self.send_json("create tree", self.http.post(url).json(&body))?;
        Ok(tree.sha)
    }

    pub fn create_commit(&self, commit: &NewCommit) -> Result<String> {
        let url = self.repo_endpoint(&["git", "commits"], "");
        let created: ShaOnly = self.send_json("create commit", self.http.post(url).json(commit))?;
        Ok(created.sha)
    }

    /// Move `refs/heads/<branch>` to `sha`. Without `force` GitHub rejects
    /// anything that is not a fast-forward.
    pub fn update_branch(&self, branch: &str, sha: &str, force: bool) -> Result<String> {
        let url = self.repo_endpoint(&["git", "refs", "heads"], branch);
        let body = json!({ "sha": sha, "force": force });
        let reference: RefObject = self.send_json("update ref", self.http.patch(url).json(&body))?;
        Ok(reference.object.sha)
    }

    /// UTF-8 content of `path` at `git_ref` (a sha or a branch name).
    ///
    /// Returns `Ok(None)` when the file does not exist at that ref.
    pub fn get_file(&self, path: &str, git_ref: &str) -> Result<Option<String>> {
        let path = path.trim_start_matches('/');
        let url = self.repo_endpoint(&["contents"], path);
        let request = self.http.get(url).query(&[("ref", git_ref)]);
        let file: ContentsFile = match self.send_json("get contents", request) {
            Ok(file) => file,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        if file.kind != "file" {
            return Err(GithubError::Decode {
                operation: "get contents".to_string(),
                reason: format!("'{}' is a {}, not a file", path, file.kind),
            });
        }

        // Files over 1 MB come back with encoding "none" and no content.
        match (file.encoding.as_deref(), file.content) {
            (Some("base64"), Some(content)) => decode_base64("get contents", &content).map(Some),
            _ => self.get_blob(&file.sha).map(Some),
        }
    }

    pub fn get_blob(&self, sha: &str) -> Result<String> {
        let url = self.repo_endpoint(&["git", "blobs"], sha);
        let blob: BlobObject = self.send_json("get blob", self.http.get(url))?;
        match blob.encoding.as_str() {
            "base64" => decode_base64("get blob", &blob.content),
            "utf-8" => Ok(blob.content),
            other => Err(GithubError::Decode {
                operation: "get blob".to_string(),
                reason: format!("unsupported encoding '{other}'"),
            }),
        }
    }

    /// Permission of `login` on the repository, both the legacy level and
    /// the role name.
    pub fn collaborator_permission(&self, login: &str) -> Result<CollaboratorPermission> {
        let mut url = self.repo_endpoint(&["collaborators"], login);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push("permission");
        }
        self.send_json("get collaborator permission", self.http.get(url))
    }

    /// Reply in the thread of review comment `comment_id`, returning the new
    /// comment id.
    pub fn reply_to_review_comment(
        &self,
        pull_request: u64,
        comment_id: u64,
        body: &str,
    ) -> Result<u64> {
        let path = format!("{pull_request}/comments/{comment_id}/replies");
        let url = self.repo_endpoint(&["pulls"], &path);
        let created: CreatedComment = self.send_json(
            "reply to review comment",
            self.http.post(url).json(&json!({ "body": body })),
        )?;
        Ok(created.id)
    }

    /// `{api_base}/repos/{owner}/{name}/{prefix...}/{tail}`, where `tail` may
    /// contain slashes (file paths, branch names) and is split into segments.
    fn repo_endpoint(&self, prefix: &[&str], tail: &str) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", self.repo.owner.as_str(), self.repo.name.as_str()])
                .extend(prefix)
                .extend(tail.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    fn send_json<T: DeserializeOwned>(&self, operation: &str, request: RequestBuilder) -> Result<T> {
        tracing::debug!(operation, repo = %self.repo, "github request");
        let response = request.send().map_err(|source| GithubError::Transport {
            operation: operation.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GithubError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        response.json::<T>().map_err(|e| GithubError::Decode {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }
}

fn decode_base64(operation: &str, content: &str) -> Result<String> {
    // GitHub wraps base64 payloads at 60 columns.
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| GithubError::Decode {
            operation: operation.to_string(),
            reason: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|_| GithubError::Decode {
        operation: operation.to_string(),
        reason: "content is not valid UTF-8".to_string(),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
