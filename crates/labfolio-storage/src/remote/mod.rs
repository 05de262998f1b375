//! Remote document-management API study storage
//!
//! Folders live under a configured root path of a remote file-system API.
//! Folder names pass through [`sanitize_remote_name`] because the API does not
//! accept arbitrary strings as folder names. Listing contents costs one extra
//! request per expanded sub-folder.

mod auth;
mod client;
mod pacer;
mod types;

pub use auth::{TokenCache, TOKEN_STALENESS};
pub use client::RemoteApiClient;
pub use pacer::Pacer;
pub use types::{FsEntry, UploadResponse};

use crate::models::{StorageFile, StorageFolder};
use crate::naming::{sanitize_remote_name, NamingService};
use crate::traits::{StorageError, StorageResult, StudyStorage};
use crate::{ConflictPolicy, StorageBackend};
use async_trait::async_trait;
use client::encode_path;
use futures::future::{BoxFuture, FutureExt};
use labfolio_core::{Assay, EntityRef, NamingOptions, Program, RemoteStorageConfig, Study};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

const DEFAULT_MAX_DEPTH: usize = 1;

#[derive(Debug)]
pub struct RemoteStorage {
    client: RemoteApiClient,
    root_path: String,
    web_url: String,
    policy: ConflictPolicy,
    max_depth: usize,
    naming: NamingService,
}

impl RemoteStorage {
    pub fn new(config: &RemoteStorageConfig) -> StorageResult<Self> {
        let root_path = format!("/{}", config.root_path.trim_matches('/'));

        tracing::info!(
            api_url = %config.api_url,
            root_path = %root_path,
            qps = config.queries_per_second,
            "Remote storage backend initialized"
        );

        Ok(Self {
            client: RemoteApiClient::new(config)?,
            root_path,
            web_url: config.web_url.trim_end_matches('/').to_string(),
            policy: ConflictPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            naming: NamingService::with_sanitizer(NamingOptions::default(), sanitize_remote_name),
        })
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_naming(mut self, options: NamingOptions) -> Self {
        self.naming = NamingService::with_sanitizer(options, sanitize_remote_name);
        self
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn naming(&self) -> &NamingService {
        &self.naming
    }

    /// Public URL of an API path. Without a web URL the path itself is the locator.
    pub fn url_for_path(&self, path: &str) -> String {
        if self.web_url.is_empty() {
            path.to_string()
        } else {
            format!("{}{}", self.web_url, encode_path(path))
        }
    }

    /// Join a single path segment onto `parent`; an empty segment would address the parent itself.
    fn child_path(parent: &str, name: &str) -> StorageResult<String> {
        if name.trim().is_empty() || name == "." || name == ".." || name.contains('/') {
            return Err(StorageError::InvalidPath(format!(
                "'{}' is not a valid folder name",
                name
            )));
        }
        Ok(format!("{}/{}", parent.trim_end_matches('/'), name))
    }

    fn program_path(&self, program: &Program) -> StorageResult<String> {
        Self::child_path(&self.root_path, &self.naming.program_folder_name(program))
    }

    fn study_path(&self, study: &Study) -> StorageResult<String> {
        Self::child_path(
            &self.program_path(&study.program)?,
            &self.naming.study_folder_name(study),
        )
    }

    fn assay_path(&self, assay: &Assay) -> StorageResult<String> {
        Self::child_path(&self.study_path(&assay.study)?, &self.naming.assay_folder_name(assay))
    }

    fn owner_path(&self, owner: EntityRef<'_>) -> StorageResult<String> {
        match owner {
            EntityRef::Program(program) => self.program_path(program),
            EntityRef::Study(study) => self.study_path(study),
            EntityRef::Assay(assay) => self.assay_path(assay),
        }
    }

    fn folder_stub(&self, entry: &FsEntry) -> StorageFolder {
        StorageFolder::stub(entry.name.clone(), entry.path.clone(), self.url_for_path(&entry.path))
    }

    fn file_entry(&self, entry: &FsEntry) -> StorageFile {
        let file = StorageFile::new(entry.name.clone(), entry.path.clone(), self.url_for_path(&entry.path))
            .with_last_modified(entry.last_modified_at());
        match entry.size {
            Some(size) => file.with_size(size),
            None => file,
        }
    }

    /// Build a folder from a fetched entry; child folders are fetched while `depth < max_depth`.
    fn expand(&self, entry: FsEntry, depth: usize) -> BoxFuture<'_, StorageResult<StorageFolder>> {
        async move {
            let mut folder = self.folder_stub(&entry);
            folder.files = entry.files.iter().map(|f| self.file_entry(f)).collect();

            for child in &entry.folders {
                if depth < self.max_depth {
                    let listed = self.client.get_entry(&child.path).await?;
                    folder.sub_folders.push(self.expand(listed, depth + 1).await?);
                } else {
                    folder.sub_folders.push(self.folder_stub(child));
                }
            }

            folder.files.sort_by(|a, b| a.name.cmp(&b.name));
            folder.sub_folders.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(folder)
        }
        .boxed()
    }

    async fn folder_from_entry(
        &self,
        entry: FsEntry,
        include_contents: bool,
    ) -> StorageResult<StorageFolder> {
        if !entry.is_folder {
            return Err(StorageError::NotFound(format!("{} is not a folder", entry.path)));
        }
        if include_contents {
            self.expand(entry, 0).await
        } else {
            Ok(self.folder_stub(&entry))
        }
    }

    async fn folder(&self, path: &str, include_contents: bool) -> StorageResult<StorageFolder> {
        let entry = self.client.get_entry(path).await?;
        self.folder_from_entry(entry, include_contents).await
    }

    /// Make sure a parent folder exists, creating it if needed.
    async fn ensure_folder(&self, path: &str) -> StorageResult<()> {
        match self.client.get_entry(path).await {
            Ok(_) => return Ok(()),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        match self.client.create_folder(path).await {
            Ok(()) => {
                tracing::info!(path = %path, "Remote storage parent folder created");
                Ok(())
            }
            // Created concurrently by another caller.
            Err(e) if e.is_duplicate() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Create the folder at `path`, applying the configured conflict policy.
    async fn create_folder(&self, path: &str) -> StorageResult<StorageFolder> {
        let start = Instant::now();

        match self.client.get_entry(path).await {
            Ok(existing) => match self.policy {
                ConflictPolicy::Fail => return Err(StorageError::Duplicate(path.to_string())),
                ConflictPolicy::UseExisting => {
                    tracing::debug!(path = %path, "Using existing remote storage folder");
                    return self.folder_from_entry(existing, true).await;
                }
                ConflictPolicy::Overwrite => {
                    self.client.delete(path).await?;
                    tracing::info!(path = %path, "Remote storage folder removed for overwrite");
                }
            },
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        self.client.create_folder(path).await?;

        tracing::info!(
            path = %path,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Remote storage folder created"
        );

        let name = path.rsplit('/').next().unwrap_or_default();
        Ok(StorageFolder::stub(name, path, self.url_for_path(path)))
    }

    pub async fn folder_by_id(&self, id: &str, include_contents: bool) -> StorageResult<StorageFolder> {
        let entry = self.client.get_folder_by_id(id).await?;
        self.folder_from_entry(entry, include_contents).await
    }

    pub async fn file_by_id(&self, id: &str) -> StorageResult<StorageFile> {
        let entry = self.client.get_file_by_id(id).await?;
        Ok(self.file_entry(&entry))
    }
}

#[async_trait]
impl StudyStorage for RemoteStorage {
    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Remote
    }

    async fn get_program_folder(
        &self,
        program: &Program,
        include_contents: bool,
    ) -> StorageResult<StorageFolder> {
        self.folder(&self.program_path(program)?, include_contents).await
    }

    async fn get_study_folder(
        &self,
        study: &Study,
        include_contents: bool,
    ) -> StorageResult<StorageFolder> {
        self.folder(&self.study_path(study)?, include_contents).await
    }

    async fn get_assay_folder(
        &self,
        assay: &Assay,
        include_contents: bool,
    ) -> StorageResult<StorageFolder> {
        self.folder(&self.assay_path(assay)?, include_contents).await
    }

    async fn create_program_folder(&self, program: &Program) -> StorageResult<StorageFolder> {
        self.create_folder(&self.program_path(program)?).await
    }

    async fn create_study_folder(&self, study: &Study) -> StorageResult<StorageFolder> {
        self.ensure_folder(&self.program_path(&study.program)?).await?;
        self.create_folder(&self.study_path(study)?).await
    }

    async fn create_assay_folder(&self, assay: &Assay) -> StorageResult<StorageFolder> {
        self.ensure_folder(&self.program_path(&assay.study.program)?).await?;
        self.ensure_folder(&self.study_path(&assay.study)?).await?;
        self.create_folder(&self.assay_path(assay)?).await
    }

    async fn save_file(&self, source: &Path, owner: EntityRef<'_>) -> StorageResult<StorageFile> {
        let folder = self.folder(&self.owner_path(owner)?, false).await?;
        let start = Instant::now();

        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                StorageError::InvalidPath(format!("{} has no file name", source.display()))
            })?;

        let content = tokio::fs::read(source).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(format!("Source file {} does not exist", source.display()))
            } else {
                StorageError::IoError(e)
            }
        })?;
        let size = content.len() as u64;

        let uploaded = self.client.upload(&folder.path, file_name, content).await?;
        let path = Self::child_path(&folder.path, file_name)?;

        tracing::info!(
            path = %path,
            owner = %owner,
            entry_id = uploaded.entry_id.as_deref().unwrap_or("-"),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Remote storage file saved"
        );

        let url = self.url_for_path(&path);
        Ok(StorageFile::new(file_name, path, url).with_size(size))
    }

    async fn folder_at(&self, path: &str, include_contents: bool) -> StorageResult<StorageFolder> {
        self.folder(path, include_contents).await
    }

    async fn file_at(&self, path: &str) -> StorageResult<StorageFile> {
        let entry = self.client.get_entry(path).await?;
        if entry.is_folder {
            return Err(StorageError::NotFound(format!("{} is not a file", path)));
        }
        Ok(self.file_entry(&entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labfolio_core::RemoteAuth;
    use mockito::{Mock, ServerGuard};
    use tempfile::tempdir;

    const ROOT: &str = "/Shared/Labfolio";
    const PROGRAM: &str = "/Shared/Labfolio/Clinical Program A";
    const STUDY: &str = "/Shared/Labfolio/Clinical Program A/Study X (CPA-12345)";
    const ASSAY: &str =
        "/Shared/Labfolio/Clinical Program A/Study X (CPA-12345)/Binding Assay (CPA-12345-001)";

    fn config(server: &ServerGuard) -> RemoteStorageConfig {
        RemoteStorageConfig {
            api_url: server.url(),
            root_path: ROOT.to_string(),
            web_url: String::new(),
            auth: RemoteAuth::Token("test-token".to_string()),
            queries_per_second: 1000.0,
            timeout_secs: 5,
            max_retries: 0,
        }
    }

    fn storage(server: &ServerGuard) -> RemoteStorage {
        RemoteStorage::new(&config(server)).unwrap()
    }

    fn program() -> Program {
        Program::new("Clinical Program A", "CPA")
    }

    fn study() -> Study {
        Study::new("Study X", "CPA-12345", program())
    }

    fn assay() -> Assay {
        Assay::new("Binding Assay", "CPA-12345-001", study())
    }

    fn fs(path: &str) -> String {
        format!("/fs{}", encode_path(path))
    }

    fn folder_body(path: &str, folders: &[&str], files: &[&str]) -> String {
        let name = path.rsplit('/').next().unwrap();
        let folders: Vec<_> = folders
            .iter()
            .map(|f| {
                serde_json::json!({"name": f, "path": format!("{}/{}", path, f), "is_folder": true})
            })
            .collect();
        let files: Vec<_> = files
            .iter()
            .map(|f| {
                serde_json::json!({"name": f, "path": format!("{}/{}", path, f), "is_folder": false, "size": 12})
            })
            .collect();
        serde_json::json!({
            "name": name,
            "path": path,
            "is_folder": true,
            "folders": folders,
            "files": files,
        })
        .to_string()
    }

    async fn folder_mock(server: &mut ServerGuard, path: &str, folders: &[&str], files: &[&str]) -> Mock {
        server
            .mock("GET", fs(path).as_str())
            .with_status(200)
            .with_body(folder_body(path, folders, files))
            .create_async()
            .await
    }

    async fn missing_mock(server: &mut ServerGuard, path: &str) -> Mock {
        server
            .mock("GET", fs(path).as_str())
            .with_status(404)
            .with_body(r#"{"errorMessage": "Folder not found"}"#)
            .create_async()
            .await
    }

    async fn add_folder_mock(server: &mut ServerGuard, path: &str) -> Mock {
        server
            .mock("POST", fs(path).as_str())
            .match_header("authorization", "Bearer test-token")
            .match_body(mockito::Matcher::Json(serde_json::json!({"action": "add_folder"})))
            .with_status(201)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_create_study_creates_missing_program() {
        let mut server = mockito::Server::new_async().await;
        missing_mock(&mut server, PROGRAM).await;
        let add_program = add_folder_mock(&mut server, PROGRAM).await;
        missing_mock(&mut server, STUDY).await;
        let add_study = add_folder_mock(&mut server, STUDY).await;

        let folder = storage(&server).create_study_folder(&study()).await.unwrap();
        assert_eq!(folder.name, "Study X (CPA-12345)");
        assert_eq!(folder.path, STUDY);
        assert_eq!(folder.url, STUDY);
        assert!(folder.is_empty());

        add_program.assert_async().await;
        add_study.assert_async().await;
    }

    #[tokio::test]
    async fn test_duplicate_under_fail_policy() {
        let mut server = mockito::Server::new_async().await;
        folder_mock(&mut server, PROGRAM, &["Study X (CPA-12345)"], &[]).await;
        folder_mock(&mut server, STUDY, &[], &[]).await;
        let add = server
            .mock("POST", fs(STUDY).as_str())
            .expect(0)
            .create_async()
            .await;

        let result = storage(&server).create_study_folder(&study()).await;
        assert!(matches!(result, Err(StorageError::Duplicate(_))));
        add.assert_async().await;
    }

    #[tokio::test]
    async fn test_already_exists_body_is_duplicate() {
        let mut server = mockito::Server::new_async().await;
        missing_mock(&mut server, PROGRAM).await;
        server
            .mock("POST", fs(PROGRAM).as_str())
            .with_status(400)
            .with_body(r#"{"errorMessage": "A folder with this name already exists"}"#)
            .create_async()
            .await;

        let result = storage(&server).create_program_folder(&program()).await;
        assert!(matches!(result, Err(StorageError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_use_existing_returns_listing() {
        let mut server = mockito::Server::new_async().await;
        folder_mock(&mut server, PROGRAM, &["Study X (CPA-12345)"], &[]).await;
        folder_mock(&mut server, STUDY, &[], &["protocol.pdf"]).await;

        let storage = storage(&server).with_conflict_policy(ConflictPolicy::UseExisting);
        let folder = storage.create_study_folder(&study()).await.unwrap();
        assert_eq!(folder.path, STUDY);
        assert_eq!(folder.file("protocol.pdf").unwrap().size, Some(12));
    }

    #[tokio::test]
    async fn test_overwrite_deletes_then_recreates() {
        let mut server = mockito::Server::new_async().await;
        folder_mock(&mut server, PROGRAM, &["Study X (CPA-12345)"], &[]).await;
        folder_mock(&mut server, STUDY, &[], &["old.csv"]).await;
        let delete = server
            .mock("DELETE", fs(STUDY).as_str())
            .with_status(200)
            .create_async()
            .await;
        let add = add_folder_mock(&mut server, STUDY).await;

        let storage = storage(&server).with_conflict_policy(ConflictPolicy::Overwrite);
        let folder = storage.create_study_folder(&study()).await.unwrap();
        assert!(folder.is_empty());

        delete.assert_async().await;
        add.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_during_create_is_write_failure() {
        let mut server = mockito::Server::new_async().await;
        missing_mock(&mut server, PROGRAM).await;
        server
            .mock("POST", fs(PROGRAM).as_str())
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let result = storage(&server).create_program_folder(&program()).await;
        assert!(matches!(result, Err(StorageError::WriteFailure(_))));
    }

    #[tokio::test]
    async fn test_get_maps_status_codes() {
        let mut server = mockito::Server::new_async().await;
        missing_mock(&mut server, PROGRAM).await;
        server
            .mock("GET", fs(STUDY).as_str())
            .with_status(403)
            .create_async()
            .await;

        let storage = storage(&server);
        assert!(matches!(
            storage.get_program_folder(&program(), false).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.get_study_folder(&study(), false).await,
            Err(StorageError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_depth_zero_does_not_fetch_children() {
        let mut server = mockito::Server::new_async().await;
        folder_mock(&mut server, PROGRAM, &["Study X (CPA-12345)"], &["charter.pdf"]).await;
        let study_fetch = server
            .mock("GET", fs(STUDY).as_str())
            .expect(0)
            .create_async()
            .await;

        let storage = storage(&server).with_max_depth(0);
        let folder = storage.get_program_folder(&program(), true).await.unwrap();
        assert_eq!(folder.files.len(), 1);
        assert!(folder.sub_folder("Study X (CPA-12345)").unwrap().is_empty());
        assert_eq!(folder.listed_depth(), 1);

        study_fetch.assert_async().await;
    }

    #[tokio::test]
    async fn test_depth_one_fetches_each_child_once() {
        let mut server = mockito::Server::new_async().await;
        folder_mock(&mut server, PROGRAM, &["Study X (CPA-12345)"], &[]).await;
        let study_fetch = server
            .mock("GET", fs(STUDY).as_str())
            .with_status(200)
            .with_body(folder_body(STUDY, &["Binding Assay (CPA-12345-001)"], &["protocol.pdf"]))
            .expect(1)
            .create_async()
            .await;
        let assay_fetch = server
            .mock("GET", fs(ASSAY).as_str())
            .expect(0)
            .create_async()
            .await;

        let storage = storage(&server).with_max_depth(1);
        let folder = storage.get_program_folder(&program(), true).await.unwrap();
        let study = folder.sub_folder("Study X (CPA-12345)").unwrap();
        assert!(study.file("protocol.pdf").is_some());
        assert!(study.sub_folder("Binding Assay (CPA-12345-001)").unwrap().is_empty());
        assert_eq!(folder.listed_depth(), 2);

        study_fetch.assert_async().await;
        assay_fetch.assert_async().await;
    }

    #[tokio::test]
    async fn test_save_file_uploads_into_owner_folder() {
        let mut server = mockito::Server::new_async().await;
        folder_mock(&mut server, ASSAY, &[], &[]).await;
        let upload = server
            .mock(
                "POST",
                format!("/fs-content{}", encode_path(&format!("{}/results.csv", ASSAY))).as_str(),
            )
            .match_header("authorization", "Bearer test-token")
            .match_body(mockito::Matcher::Regex("well,value".to_string()))
            .with_status(200)
            .with_body(r#"{"checksum": "abc", "entry_id": "e-42"}"#)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let source = dir.path().join("results.csv");
        std::fs::write(&source, b"well,value\nA1,0.5\n").unwrap();

        let file = storage(&server)
            .save_file(&source, EntityRef::Assay(&assay()))
            .await
            .unwrap();
        assert_eq!(file.name, "results.csv");
        assert_eq!(file.path, format!("{}/results.csv", ASSAY));
        assert_eq!(file.size, Some(18));

        upload.assert_async().await;
    }

    #[tokio::test]
    async fn test_save_into_missing_folder_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        missing_mock(&mut server, ASSAY).await;
        let upload = server
            .mock("POST", mockito::Matcher::Regex("^/fs-content/".to_string()))
            .expect(0)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let source = dir.path().join("results.csv");
        std::fs::write(&source, b"data").unwrap();

        let result = storage(&server)
            .save_file(&source, EntityRef::Assay(&assay()))
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
        upload.assert_async().await;
    }

    #[tokio::test]
    async fn test_names_are_sanitized() {
        let mut server = mockito::Server::new_async().await;
        let path = "/Shared/Labfolio/R D Oncology";
        missing_mock(&mut server, path).await;
        add_folder_mock(&mut server, path).await;

        let folder = storage(&server)
            .create_program_folder(&Program::new("R&D / Oncology", "RDO"))
            .await
            .unwrap();
        assert_eq!(folder.name, "R D Oncology");
        assert_eq!(folder.path, path);
    }

    #[tokio::test]
    async fn test_name_sanitized_to_nothing_is_rejected_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mut untouched = Vec::new();
        for method in ["GET", "POST", "DELETE"] {
            untouched.push(
                server
                    .mock(method, mockito::Matcher::Any)
                    .expect(0)
                    .create_async()
                    .await,
            );
        }

        let storage = storage(&server).with_conflict_policy(ConflictPolicy::Overwrite);
        for name in ["???", "...", "  "] {
            let result = storage.create_program_folder(&Program::new(name, "X")).await;
            assert!(matches!(result, Err(StorageError::InvalidPath(_))), "{:?}", name);
        }

        let study = Study::new("Study X", "QQQ-10001", Program::new("???", "QQQ"));
        assert!(matches!(
            storage.create_study_folder(&study).await,
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.get_program_folder(&Program::new("!!", "X"), true).await,
            Err(StorageError::InvalidPath(_))
        ));

        for mock in untouched {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_web_url_prefixes_encoded_path() {
        let mut server = mockito::Server::new_async().await;
        folder_mock(&mut server, PROGRAM, &[], &[]).await;

        let mut config = config(&server);
        config.web_url = "https://acme.example.com/navigate/path/".to_string();
        let storage = RemoteStorage::new(&config).unwrap();

        let folder = storage.get_program_folder(&program(), false).await.unwrap();
        assert_eq!(folder.path, PROGRAM);
        assert_eq!(
            folder.url,
            "https://acme.example.com/navigate/path/Shared/Labfolio/Clinical%20Program%20A"
        );
    }

    #[tokio::test]
    async fn test_resolve_by_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/fs/ids/folder/f-123")
            .with_status(200)
            .with_body(folder_body(STUDY, &[], &["protocol.pdf"]))
            .create_async()
            .await;
        server
            .mock("GET", "/fs/ids/file/e-42")
            .with_status(200)
            .with_body(
                r#"{"name": "protocol.pdf", "path": "/Shared/Labfolio/protocol.pdf", "is_folder": false, "size": 7, "last_modified": "Sun, 26 Aug 2012 03:55:29 GMT"}"#,
            )
            .create_async()
            .await;

        let storage = storage(&server);
        let folder = storage.folder_by_id("f-123", true).await.unwrap();
        assert_eq!(folder.path, STUDY);
        assert!(folder.file("protocol.pdf").is_some());

        let file = storage.file_by_id("e-42").await.unwrap();
        assert_eq!(file.size, Some(7));
        assert!(file.last_modified.is_some());
    }

    #[tokio::test]
    async fn test_file_at_rejects_folders() {
        let mut server = mockito::Server::new_async().await;
        folder_mock(&mut server, STUDY, &[], &[]).await;

        let result = storage(&server).file_at(STUDY).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
