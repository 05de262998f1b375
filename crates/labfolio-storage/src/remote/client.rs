//! HTTP client for the remote file-system API.
//!
//! Every request goes through [`RemoteApiClient::send`], which paces it,
//! attaches the bearer token and retries transport-level failures. Non-success
//! responses are mapped onto [`StorageError`] by [`map_status`].

use super::auth::TokenCache;
use super::pacer::Pacer;
use super::types::{FsEntry, TokenResponse, UploadResponse};
use crate::traits::{StorageError, StorageResult};
use labfolio_core::{RemoteAuth, RemoteStorageConfig};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

/// Which transport failures a request may be retried on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Retry {
    /// Reads: connect errors and timeouts
    Transport,
    /// Writes: connect errors only; a timed-out write may already have been applied
    ConnectOnly,
}

impl Retry {
    fn allows(self, is_connect: bool, is_timeout: bool) -> bool {
        match self {
            Retry::Transport => is_connect || is_timeout,
            Retry::ConnectOnly => is_connect,
        }
    }
}

/// Percent-encode every segment of an absolute API path, keeping the separators.
pub(crate) fn encode_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        encoded.push('/');
        encoded.push_str(&urlencoding::encode(segment));
    }
    if encoded.is_empty() {
        encoded.push('/');
    }
    encoded
}

/// Map a non-success response onto the storage error taxonomy.
///
/// The body is checked first: the API reports name collisions with a message
/// rather than a dedicated status.
pub(crate) fn map_status(status: StatusCode, body: &str, target: &str) -> StorageError {
    if body.to_lowercase().contains("already exists") {
        return StorageError::Duplicate(target.to_string());
    }
    match status {
        StatusCode::NOT_FOUND => StorageError::NotFound(target.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StorageError::Unauthorized(format!("{} ({})", target, status))
        }
        _ => StorageError::BackendError(format!(
            "API request failed with status {}: {}",
            status, body
        )),
    }
}

#[derive(Debug)]
pub struct RemoteApiClient {
    http: Client,
    api_url: String,
    auth: RemoteAuth,
    tokens: TokenCache,
    pacer: Pacer,
    max_retries: u32,
}

impl RemoteApiClient {
    pub fn new(config: &RemoteStorageConfig) -> StorageResult<Self> {
        if !config.queries_per_second.is_finite() || config.queries_per_second <= 0.0 {
            return Err(StorageError::ConfigError(
                "queries_per_second must be greater than zero".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            auth: config.auth.clone(),
            tokens: TokenCache::default(),
            pacer: Pacer::new(config.request_interval()),
            max_retries: config.max_retries,
        })
    }

    pub fn fs_url(&self, path: &str) -> String {
        format!("{}/fs{}", self.api_url, encode_path(path))
    }

    pub fn content_url(&self, path: &str) -> String {
        format!("{}/fs-content{}", self.api_url, encode_path(path))
    }

    async fn bearer_token(&self) -> StorageResult<String> {
        match &self.auth {
            RemoteAuth::Token(token) => Ok(token.clone()),
            RemoteAuth::Password { .. } => self.tokens.get_or_refresh(|| self.authenticate()).await,
        }
    }

    /// Password grant against the configured token endpoint.
    async fn authenticate(&self) -> StorageResult<String> {
        let RemoteAuth::Password {
            auth_url,
            client_id,
            username,
            password,
        } = &self.auth
        else {
            return Err(StorageError::ConfigError(
                "Password credentials are not configured".to_string(),
            ));
        };

        self.pacer.wait().await;
        let response = self
            .http
            .post(auth_url)
            .form(&[
                ("grant_type", "password"),
                ("client_id", client_id.as_str()),
                ("username", username.as_str()),
                ("password", password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StorageError::Network(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Remote storage authentication failed");
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    StorageError::Unauthorized(format!("Token request rejected: {}", body))
                }
                _ => map_status(status, &body, auth_url),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            StorageError::BackendError(format!("Failed to parse token response: {}", e))
        })?;

        tracing::info!(username = %username, "Remote storage token issued");
        Ok(token.access_token)
    }

    /// Send a request built by `build`, retrying transport failures allowed by `retry`.
    ///
    /// `build` runs once per attempt, so request bodies that cannot be cloned
    /// (multipart forms) are rebuilt each time.
    async fn send<F>(&self, target: &str, retry: Retry, build: F) -> StorageResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let token = self.bearer_token().await?;
            self.pacer.wait().await;

            let start = Instant::now();
            match build(&self.http).bearer_auth(&token).send().await {
                Ok(response) => {
                    let status = response.status();
                    tracing::debug!(
                        target_path = %target,
                        status = status.as_u16(),
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Remote storage request completed"
                    );
                    if status == StatusCode::UNAUTHORIZED {
                        self.tokens.invalidate().await;
                    }
                    return Ok(response);
                }
                Err(e) if retry.allows(e.is_connect(), e.is_timeout()) && attempt < self.max_retries => {
                    let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
                    tracing::warn!(
                        target_path = %target,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Remote storage request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(StorageError::Network(format!(
                        "Request for {} failed: {}",
                        target, e
                    )));
                }
            }
        }
    }

    async fn check(response: Response, target: &str) -> StorageResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(map_status(status, &body, target))
    }

    async fn json<T: DeserializeOwned>(response: Response, target: &str) -> StorageResult<T> {
        response.json().await.map_err(|e| {
            StorageError::BackendError(format!("Failed to parse response for {}: {}", target, e))
        })
    }

    /// Resolve a folder or file by path.
    pub async fn get_entry(&self, path: &str) -> StorageResult<FsEntry> {
        let url = self.fs_url(path);
        let response = self.send(path, Retry::Transport, |http| http.get(&url)).await?;
        let response = Self::check(response, path).await?;
        Self::json(response, path).await
    }

    pub async fn get_folder_by_id(&self, id: &str) -> StorageResult<FsEntry> {
        let url = format!("{}/fs/ids/folder/{}", self.api_url, urlencoding::encode(id));
        let response = self.send(id, Retry::Transport, |http| http.get(&url)).await?;
        let response = Self::check(response, id).await?;
        Self::json(response, id).await
    }

    pub async fn get_file_by_id(&self, id: &str) -> StorageResult<FsEntry> {
        let url = format!("{}/fs/ids/file/{}", self.api_url, urlencoding::encode(id));
        let response = self.send(id, Retry::Transport, |http| http.get(&url)).await?;
        let response = Self::check(response, id).await?;
        Self::json(response, id).await
    }

    pub async fn create_folder(&self, path: &str) -> StorageResult<()> {
        let url = self.fs_url(path);
        let body = serde_json::json!({ "action": "add_folder" });
        let response = self
            .send(path, Retry::ConnectOnly, |http| http.post(&url).json(&body))
            .await
            .map_err(StorageError::into_write_failure)?;
        Self::check(response, path)
            .await
            .map_err(StorageError::into_write_failure)?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> StorageResult<()> {
        let url = self.fs_url(path);
        let response = self
            .send(path, Retry::ConnectOnly, |http| http.delete(&url))
            .await
            .map_err(StorageError::into_write_failure)?;
        Self::check(response, path)
            .await
            .map_err(StorageError::into_write_failure)?;
        Ok(())
    }

    /// Upload `content` as `file_name` inside `folder_path`, replacing any same-named file.
    pub async fn upload(
        &self,
        folder_path: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> StorageResult<UploadResponse> {
        let path = format!("{}/{}", folder_path.trim_end_matches('/'), file_name);
        let url = self.content_url(&path);

        let response = self
            .send(&path, Retry::ConnectOnly, |http| {
                let form = reqwest::multipart::Form::new().part(
                    "file",
                    reqwest::multipart::Part::bytes(content.clone()).file_name(file_name.to_string()),
                );
                http.post(&url).multipart(form)
            })
            .await
            .map_err(StorageError::into_write_failure)?;
        let response = Self::check(response, &path)
            .await
            .map_err(StorageError::into_write_failure)?;

        let body = response
            .text()
            .await
            .map_err(|e| StorageError::WriteFailure(format!("Failed to read upload response: {}", e)))?;
        if body.trim().is_empty() {
            return Ok(UploadResponse::default());
        }
        serde_json::from_str(&body).map_err(|e| {
            StorageError::BackendError(format!("Failed to parse upload response: {}", e))
        })
    }
}
