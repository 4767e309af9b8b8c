// src/github.rs

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const API_ROOT: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("testforge/", env!("CARGO_PKG_VERSION"));

/* ============================================================
   Error taxonomy
   ============================================================ */

/// Any failure to reach or correctly parse the hosting provider.
///
/// Always recoverable: callers log it and wait for the user to retry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    Parse(String),
}

/* ============================================================
   Wire models
   ============================================================ */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    #[serde(rename = "dir")]
    Directory,
    Symlink,
    Submodule,
}

/// One entry in a repository listing.
///
/// `identity` is the provider's content hash; it is never recomputed
/// locally. `content` is populated only by an explicit content fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "sha")]
    pub identity: String,
    #[serde(skip)]
    pub content: Option<String>,
}

impl FileNode {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

#[derive(Debug, Clone)]
pub struct RepositoryInfo {
    pub name: String,
    pub owner: String,
    pub description: String,
    pub default_branch: String,
    pub language: String,
}

/// Connection parameters for one wizard session. The token lives only
/// here, in memory; it is never logged or written to disk.
#[derive(Debug, Clone)]
pub struct RepoConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct FileEdit {
    pub path: String,
    pub content: String,
}

/* ============================================================
   Client
   ============================================================ */

pub struct GitHubClient {
    token: String,
    http: reqwest::blocking::Client,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            token: token.to_string(),
            http,
        })
    }

    pub fn repository_info(&self, owner: &str, repo: &str) -> Result<RepositoryInfo, FetchError> {
        let url = format!("{API_ROOT}/repos/{owner}/{repo}");
        let json = self.get(&url)?;

        Ok(RepositoryInfo {
            name: str_at(&json, "/name")?,
            owner: str_at(&json, "/owner/login")?,
            description: str_at(&json, "/description").unwrap_or_default(),
            default_branch: str_at(&json, "/default_branch")?,
            language: str_at(&json, "/language").unwrap_or_else(|_| "Unknown".into()),
        })
    }

    /// Directory listing. Path `""` is the repository root. If the path
    /// names a file, the provider returns a single object; it is wrapped
    /// as a one-element listing.
    pub fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<FileNode>, FetchError> {
        let url = contents_url(owner, repo, path);
        let json = self.get(&url)?;

        match json {
            Value::Array(_) => serde_json::from_value(json)
                .map_err(|e| FetchError::Parse(format!("listing for {path:?}: {e}"))),
            Value::Object(_) => {
                let node: FileNode = serde_json::from_value(json)
                    .map_err(|e| FetchError::Parse(format!("entry for {path:?}: {e}")))?;
                Ok(vec![node])
            }
            other => Err(FetchError::Parse(format!(
                "listing for {path:?}: expected array or object, got {other}"
            ))),
        }
    }

    pub fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, FetchError> {
        let url = contents_url(owner, repo, path);
        let json = self.get(&url)?;

        let encoded = json
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::Parse(format!("no content field for {path:?}")))?;

        decode_content(encoded)
    }

    /// Create a branch from the tip of `config.branch`, commit each edit
    /// onto it, and open a pull request back to `config.branch`.
    /// Returns the pull request URL.
    pub fn open_change(
        &self,
        config: &RepoConfig,
        title: &str,
        description: &str,
        edits: &[FileEdit],
    ) -> Result<String, FetchError> {
        let RepoConfig { owner, repo, branch, .. } = config;
        let head = unique_branch_name();

        let tip = self.get(&format!("{API_ROOT}/repos/{owner}/{repo}/git/ref/heads/{branch}"))?;
        let base_sha = str_at(&tip, "/object/sha")?;

        self.post(
            &format!("{API_ROOT}/repos/{owner}/{repo}/git/refs"),
            &serde_json::json!({
                "ref": format!("refs/heads/{head}"),
                "sha": base_sha,
            }),
        )?;

        for edit in edits {
            self.put(
                &contents_url(owner, repo, &edit.path),
                &serde_json::json!({
                    "message": format!("Add test case: {title}"),
                    "content": B64.encode(edit.content.as_bytes()),
                    "branch": head,
                }),
            )?;
        }

        let pr = self.post(
            &format!("{API_ROOT}/repos/{owner}/{repo}/pulls"),
            &serde_json::json!({
                "title": title,
                "body": description,
                "head": head,
                "base": branch,
            }),
        )?;

        str_at(&pr, "/html_url")
    }

    /* ---------- transport ---------- */

    fn get(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self.request(self.http.get(url))?;
        check_status(resp)
    }

    fn post(&self, url: &str, body: &Value) -> Result<Value, FetchError> {
        let resp = self.request(self.http.post(url).json(body))?;
        check_status(resp)
    }

    fn put(&self, url: &str, body: &Value) -> Result<Value, FetchError> {
        let resp = self.request(self.http.put(url).json(body))?;
        check_status(resp)
    }

    fn request(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, FetchError> {
        let resp = req
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .send()?;
        Ok(resp)
    }
}

/* ============================================================
   Helpers
   ============================================================ */

fn contents_url(owner: &str, repo: &str, path: &str) -> String {
    if path.is_empty() {
        format!("{API_ROOT}/repos/{owner}/{repo}/contents")
    } else {
        format!("{API_ROOT}/repos/{owner}/{repo}/contents/{path}")
    }
}

fn check_status(resp: reqwest::blocking::Response) -> Result<Value, FetchError> {
    let status = resp.status();
    let json: Value = resp
        .json()
        .map_err(|e| FetchError::Parse(format!("non-JSON response: {e}")))?;

    if !status.is_success() {
        let message = json
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message")
            .to_string();
        return Err(FetchError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(json)
}

fn str_at(json: &Value, pointer: &str) -> Result<String, FetchError> {
    json.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| FetchError::Parse(format!("missing field {pointer}")))
}

/// The contents API wraps base64 payloads at 60 columns.
fn decode_content(encoded: &str) -> Result<String, FetchError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = B64
        .decode(compact)
        .map_err(|e| FetchError::Parse(format!("bad base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|e| FetchError::Parse(format!("non-UTF8 content: {e}")))
}

/// Unique per call so reruns never collide with a prior branch.
fn unique_branch_name() -> String {
    format!("test-case-{}", chrono::Utc::now().timestamp_millis())
}

/* ============================================================
   Tests
   ============================================================ */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_listing_url_has_no_trailing_slash() {
        assert_eq!(
            contents_url("octo", "demo", ""),
            "https://api.github.com/repos/octo/demo/contents"
        );
        assert_eq!(
            contents_url("octo", "demo", "src/lib.rs"),
            "https://api.github.com/repos/octo/demo/contents/src/lib.rs"
        );
    }

    #[test]
    fn decodes_wrapped_base64_content() {
        // "hello\nworld\n" encoded, wrapped mid-stream like the API does
        let wrapped = "aGVsbG8K\nd29ybGQK";
        assert_eq!(decode_content(wrapped).unwrap(), "hello\nworld\n");
    }

    #[test]
    fn listing_deserializes_github_type_names() {
        let raw = r#"[
            {"name": "src", "path": "src", "type": "dir", "sha": "a1"},
            {"name": "main.rs", "path": "src/main.rs", "type": "file", "size": 42, "sha": "b2"}
        ]"#;

        let nodes: Vec<FileNode> = serde_json::from_str(raw).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].is_dir());
        assert_eq!(nodes[1].kind, NodeKind::File);
        assert_eq!(nodes[1].size, 42);
        assert_eq!(nodes[1].identity, "b2");
        assert!(nodes[1].content.is_none());
    }

    #[test]
    fn branch_names_carry_the_fixed_prefix() {
        let name = unique_branch_name();
        assert!(name.starts_with("test-case-"));
        assert!(name["test-case-".len()..].chars().all(|c| c.is_ascii_digit()));
    }
}
