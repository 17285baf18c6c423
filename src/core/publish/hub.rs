//! Blocking client for the hub's repository API.
//!
//! Uploads follow the hub's commit protocol:
//!
//! 1. `preupload` classifies each file as `regular` or `lfs`
//! 2. LFS files go through the git-lfs batch API (sha256 oid, PUT, verify)
//! 3. one NDJSON commit lists regular files inline (base64) and LFS
//!    files by oid
//!
//! Every non-2xx response becomes `RemoteApi("<status>: <body>")`.

use crate::core::config::HubConfig;
use crate::core::dataset::hub::send_for_text;
use crate::core::error::{Result, SpaceriniError};
use crate::core::publish::folder::{join_relative, FolderWalker, LocalFile};
use crate::core::publish::identity::IdentityResolver;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Branch every operation targets
pub const DEFAULT_REVISION: &str = "main";

/// Bytes of each file sent to `preupload` for classification
const SAMPLE_BYTES: usize = 512;

/// Files per `preupload` request
const PREUPLOAD_CHUNK: usize = 256;

const LFS_CONTENT_TYPE: &str = "application/vnd.git-lfs+json";

/// Kind of hub repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoType {
    Model,
    Dataset,
    Space,
}

impl RepoType {
    /// Segment used by `/api/<segment>/<repo_id>` routes
    pub fn api_segment(&self) -> &'static str {
        match self {
            RepoType::Model => "models",
            RepoType::Dataset => "datasets",
            RepoType::Space => "spaces",
        }
    }

    /// Prefix of web and git URLs
    pub fn url_prefix(&self) -> &'static str {
        match self {
            RepoType::Model => "",
            RepoType::Dataset => "datasets/",
            RepoType::Space => "spaces/",
        }
    }

    fn create_type(&self) -> Option<&'static str> {
        match self {
            RepoType::Model => None,
            RepoType::Dataset => Some("dataset"),
            RepoType::Space => Some("space"),
        }
    }
}

/// Repository creation request
#[derive(Debug, Clone)]
pub struct CreateRepo<'a> {
    pub repo_id: &'a str,
    pub repo_type: RepoType,
    pub private: bool,
    /// Required for spaces (`gradio`, `streamlit`, ...)
    pub space_sdk: Option<&'a str>,
    /// Treat "already exists" as success
    pub exist_ok: bool,
}

/// Upload mode decided by the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    Regular,
    Lfs,
}

#[derive(Debug, Deserialize)]
struct WhoAmI {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PreuploadResponse {
    files: Vec<PreuploadFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreuploadFile {
    path: String,
    upload_mode: UploadMode,
}

#[derive(Debug, Deserialize)]
struct LfsBatchResponse {
    objects: Vec<LfsObject>,
}

#[derive(Debug, Deserialize)]
struct LfsObject {
    oid: String,
    #[serde(default)]
    actions: Option<LfsActions>,
    #[serde(default)]
    error: Option<LfsError>,
}

#[derive(Debug, Deserialize)]
struct LfsActions {
    upload: Option<LfsAction>,
    verify: Option<LfsAction>,
}

#[derive(Debug, Deserialize)]
struct LfsAction {
    href: String,
    #[serde(default)]
    header: std::collections::HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LfsError {
    code: u16,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    #[serde(rename = "type")]
    kind: String,
    path: String,
}

/// Blocking hub client
pub struct HubClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl std::fmt::Debug for HubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubClient")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HubClient {
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &HubConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.token.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn require_token(&self) -> Result<()> {
        if self.token.is_none() {
            return Err(SpaceriniError::ConfigError(
                "A hub token is required (set HF_TOKEN or [hub].token)".to_string(),
            ));
        }
        Ok(())
    }

    /// Name of the authenticated user
    pub fn whoami(&self) -> Result<String> {
        self.require_token()?;
        let body = send_for_text(
            self.authed(self.client.get(format!("{}/api/whoami-v2", self.endpoint))),
        )?;
        let who: WhoAmI = serde_json::from_str(&body)?;
        Ok(who.name)
    }

    /// Web URL of a repository
    pub fn repo_url(&self, repo_id: &str, repo_type: RepoType) -> String {
        format!("{}/{}{}", self.endpoint, repo_type.url_prefix(), repo_id)
    }

    /// Create a repository and return its URL
    pub fn create_repo(&self, request: &CreateRepo<'_>) -> Result<String> {
        self.require_token()?;
        let (organization, name) = split_repo_id(request.repo_id)?;

        let mut payload = json!({
            "name": name,
            "organization": organization,
            "private": request.private,
        });
        if let Some(kind) = request.repo_type.create_type() {
            payload["type"] = json!(kind);
        }
        if request.repo_type == RepoType::Space {
            let sdk = request.space_sdk.ok_or_else(|| {
                SpaceriniError::ConfigError("Creating a space requires an SDK".to_string())
            })?;
            payload["sdk"] = json!(sdk);
        }

        let response = self
            .authed(self.client.post(format!("{}/api/repos/create", self.endpoint)))
            .json(&payload)
            .send()?;
        let status = response.status();
        let body = response.text()?;

        if status == StatusCode::CONFLICT && request.exist_ok {
            tracing::info!("Repository {} already exists", request.repo_id);
            return Ok(self.repo_url(request.repo_id, request.repo_type));
        }
        if !status.is_success() {
            return Err(SpaceriniError::RemoteApi(format!("{status}: {body}")));
        }

        let url = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("url").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| self.repo_url(request.repo_id, request.repo_type));
        tracing::info!("Created repository {}", url);
        Ok(url)
    }

    /// Upload every file under `folder` in one commit
    ///
    /// Returns the number of files committed.
    pub fn upload_folder(
        &self,
        folder: &Path,
        repo_id: &str,
        repo_type: RepoType,
        path_in_repo: Option<&str>,
        commit_message: &str,
    ) -> Result<usize> {
        self.require_token()?;
        let files = FolderWalker::with_defaults()?.collect(folder, path_in_repo)?;
        if files.is_empty() {
            return Err(SpaceriniError::ConfigError(format!(
                "Nothing to upload in {}",
                folder.display()
            )));
        }

        let modes = self.preupload(&files, repo_id, repo_type)?;
        let mut operations = Vec::with_capacity(files.len());
        let mut lfs = Vec::new();
        for (file, mode) in files.iter().zip(modes) {
            match mode {
                UploadMode::Regular => operations.push(CommitOperation::regular(file)?),
                UploadMode::Lfs => {
                    let oid = sha256_file(&file.local_path)?;
                    lfs.push((file, oid.clone()));
                    operations.push(CommitOperation::Lfs {
                        path: file.path_in_repo.clone(),
                        oid,
                        size: file.size,
                    });
                }
            }
        }

        if !lfs.is_empty() {
            self.upload_lfs(&lfs, repo_id, repo_type)?;
        }
        self.commit(repo_id, repo_type, commit_message, &operations)?;

        tracing::info!(
            "Uploaded {} files ({} via LFS) to {}",
            operations.len(),
            lfs.len(),
            repo_id
        );
        Ok(operations.len())
    }

    fn preupload(
        &self,
        files: &[LocalFile],
        repo_id: &str,
        repo_type: RepoType,
    ) -> Result<Vec<UploadMode>> {
        let url = format!(
            "{}/api/{}/{}/preupload/{}",
            self.endpoint,
            repo_type.api_segment(),
            repo_id,
            DEFAULT_REVISION
        );

        let mut modes = Vec::with_capacity(files.len());
        for chunk in files.chunks(PREUPLOAD_CHUNK) {
            let entries = chunk
                .iter()
                .map(|f| -> Result<Value> {
                    Ok(json!({
                        "path": f.path_in_repo,
                        "sample": BASE64.encode(read_sample(&f.local_path)?),
                        "size": f.size,
                    }))
                })
                .collect::<Result<Vec<_>>>()?;

            let body = send_for_text(
                self.authed(self.client.post(&url))
                    .json(&json!({ "files": entries })),
            )?;
            modes.extend(match_upload_modes(chunk, &body)?);
        }
        Ok(modes)
    }

    fn upload_lfs(
        &self,
        files: &[(&LocalFile, String)],
        repo_id: &str,
        repo_type: RepoType,
    ) -> Result<()> {
        let url = format!(
            "{}/{}{}.git/info/lfs/objects/batch",
            self.endpoint,
            repo_type.url_prefix(),
            repo_id
        );
        let objects: Vec<Value> = files
            .iter()
            .map(|(f, oid)| json!({ "oid": oid, "size": f.size }))
            .collect();

        let body = send_for_text(
            self.authed(self.client.post(&url))
                .header("Accept", LFS_CONTENT_TYPE)
                .header("Content-Type", LFS_CONTENT_TYPE)
                .body(
                    json!({
                        "operation": "upload",
                        "transfers": ["basic"],
                        "objects": objects,
                        "hash_algo": "sha256",
                    })
                    .to_string(),
                ),
        )?;
        let batch: LfsBatchResponse = serde_json::from_str(&body)?;

        for object in batch.objects {
            if let Some(error) = object.error {
                return Err(SpaceriniError::RemoteApi(format!(
                    "{}: LFS object {}: {}",
                    error.code, object.oid, error.message
                )));
            }
            let Some(actions) = object.actions else {
                tracing::debug!("LFS object {} already present", object.oid);
                continue;
            };
            let Some((file, _)) = files.iter().find(|(_, oid)| *oid == object.oid) else {
                continue;
            };

            if let Some(upload) = actions.upload {
                let mut request = self.client.put(&upload.href).body(fs::read(&file.local_path)?);
                for (name, value) in &upload.header {
                    request = request.header(name.as_str(), value.as_str());
                }
                send_for_text(request)?;
                tracing::debug!("Uploaded LFS object for {}", file.path_in_repo);
            }
            if let Some(verify) = actions.verify {
                let mut request = self
                    .authed(self.client.post(&verify.href))
                    .header("Content-Type", LFS_CONTENT_TYPE)
                    .body(json!({ "oid": object.oid, "size": file.size }).to_string());
                for (name, value) in &verify.header {
                    request = request.header(name.as_str(), value.as_str());
                }
                send_for_text(request)?;
            }
        }
        Ok(())
    }

    fn commit(
        &self,
        repo_id: &str,
        repo_type: RepoType,
        message: &str,
        operations: &[CommitOperation],
    ) -> Result<()> {
        let url = format!(
            "{}/api/{}/{}/commit/{}",
            self.endpoint,
            repo_type.api_segment(),
            repo_id,
            DEFAULT_REVISION
        );
        send_for_text(
            self.authed(self.client.post(&url))
                .header("Content-Type", "application/x-ndjson")
                .body(commit_payload(message, operations)?),
        )?;
        Ok(())
    }

    /// Download every file of a repository (or of `subfolder`) into `dest`
    ///
    /// Files keep their repository paths. Returns the files written.
    pub fn download_folder(
        &self,
        repo_id: &str,
        repo_type: RepoType,
        subfolder: Option<&str>,
        dest: &Path,
    ) -> Result<Vec<PathBuf>> {
        let files = self.list_files(repo_id, repo_type, subfolder)?;
        if files.is_empty() {
            return Err(SpaceriniError::RemoteApi(format!(
                "404: no files under '{}' in {}",
                subfolder.unwrap_or(""),
                repo_id
            )));
        }

        let mut written = Vec::with_capacity(files.len());
        for path in files {
            let target = join_relative(dest, &path).ok_or_else(|| {
                SpaceriniError::RemoteApi(format!(
                    "Refusing to write '{path}' outside {}",
                    dest.display()
                ))
            })?;
            let url = self.resolve_url(repo_id, repo_type, &path)?;
            let mut response = self.authed(self.client.get(url)).send()?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(SpaceriniError::RemoteApi(format!("{status}: {body}")));
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(&target)?;
            response.copy_to(&mut out)?;
            written.push(target);
        }

        tracing::info!("Downloaded {} files from {}", written.len(), repo_id);
        Ok(written)
    }

    fn list_files(
        &self,
        repo_id: &str,
        repo_type: RepoType,
        subfolder: Option<&str>,
    ) -> Result<Vec<String>> {
        let mut url = format!(
            "{}/api/{}/{}/tree/{}",
            self.endpoint,
            repo_type.api_segment(),
            repo_id,
            DEFAULT_REVISION
        );
        if let Some(sub) = subfolder.map(|s| s.trim_matches('/')).filter(|s| !s.is_empty()) {
            url.push('/');
            url.push_str(sub);
        }

        let body = send_for_text(
            self.authed(self.client.get(url))
                .query(&[("recursive", "true")]),
        )?;
        let entries: Vec<TreeEntry> = serde_json::from_str(&body)?;
        Ok(entries
            .into_iter()
            .filter(|e| e.kind == "file")
            .map(|e| e.path)
            .collect())
    }

    fn resolve_url(&self, repo_id: &str, repo_type: RepoType, path: &str) -> Result<Url> {
        let base = format!(
            "{}/{}{}/resolve/{}/",
            self.endpoint,
            repo_type.url_prefix(),
            repo_id,
            DEFAULT_REVISION
        );
        let mut url = Url::parse(&base)
            .map_err(|e| SpaceriniError::ConfigError(format!("Invalid hub URL {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SpaceriniError::ConfigError(format!("Invalid hub URL {base}")))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }
}

impl IdentityResolver for HubClient {
    fn namespace(&self) -> Result<String> {
        self.whoami()
    }
}

/// One entry of a commit
#[derive(Debug, Clone, PartialEq)]
enum CommitOperation {
    Regular { path: String, content: String },
    Lfs { path: String, oid: String, size: u64 },
}

impl CommitOperation {
    fn regular(file: &LocalFile) -> Result<Self> {
        Ok(CommitOperation::Regular {
            path: file.path_in_repo.clone(),
            content: BASE64.encode(fs::read(&file.local_path)?),
        })
    }
}

/// NDJSON commit body: a header line, then one line per file
fn commit_payload(message: &str, operations: &[CommitOperation]) -> Result<String> {
    let mut lines = vec![serde_json::to_string(&json!({
        "key": "header",
        "value": { "summary": message, "description": "" },
    }))?];

    for op in operations {
        let line = match op {
            CommitOperation::Regular { path, content } => json!({
                "key": "file",
                "value": { "content": content, "path": path, "encoding": "base64" },
            }),
            CommitOperation::Lfs { path, oid, size } => json!({
                "key": "lfsFile",
                "value": { "path": path, "algo": "sha256", "oid": oid, "size": size },
            }),
        };
        lines.push(serde_json::to_string(&line)?);
    }
    Ok(lines.join("\n"))
}

fn match_upload_modes(files: &[LocalFile], body: &str) -> Result<Vec<UploadMode>> {
    let response: PreuploadResponse = serde_json::from_str(body)?;
    files
        .iter()
        .map(|f| {
            response
                .files
                .iter()
                .find(|p| p.path == f.path_in_repo)
                .map(|p| p.upload_mode)
                .ok_or_else(|| {
                    SpaceriniError::RemoteApi(format!(
                        "preupload response has no entry for {}",
                        f.path_in_repo
                    ))
                })
        })
        .collect()
}

fn split_repo_id(repo_id: &str) -> Result<(&str, &str)> {
    match repo_id.split_once('/') {
        Some((org, name)) if !org.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((org, name))
        }
        _ => Err(SpaceriniError::ConfigError(format!(
            "Repository id '{repo_id}' must be <namespace>/<name>"
        ))),
    }
}

fn read_sample(path: &Path) -> Result<Vec<u8>> {
    let mut sample = Vec::with_capacity(SAMPLE_BYTES);
    fs::File::open(path)?
        .take(SAMPLE_BYTES as u64)
        .read_to_end(&mut sample)?;
    Ok(sample)
}

/// Hex sha256 of a file, streamed
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}
