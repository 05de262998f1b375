use crate::models::{StorageFile, StorageFolder};
use crate::naming::NamingService;
use crate::traits::{StorageError, StorageResult, StudyStorage};
use crate::{ConflictPolicy, StorageBackend};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use labfolio_core::{Assay, EntityRef, NamingOptions, Program, Study};
use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use uuid::Uuid;

const DEFAULT_MAX_DEPTH: usize = 1;
const TEMP_SUFFIX: &str = ".upload";

/// Local filesystem study storage
///
/// One directory per entity under `root`; the public URL of an object is its
/// path relative to `root`, percent-encoded per segment, under `url_prefix`.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: PathBuf,
    url_prefix: String,
    policy: ConflictPolicy,
    max_depth: usize,
    naming: NamingService,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `root` - Directory holding the program folders (e.g., "/var/lib/labfolio/studies")
    /// * `url_prefix` - Public URL prefix the root is served under (e.g., "/static")
    pub async fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let root = fs::canonicalize(&root).await.map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize storage root: {}", e))
        })?;

        Ok(LocalStorage {
            root,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            policy: ConflictPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            naming: NamingService::new(NamingOptions::default()),
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
        self.naming = NamingService::new(options);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn naming(&self) -> &NamingService {
        &self.naming
    }

    /// Public URL of a path under the storage root
    pub fn url_for_path(&self, path: &Path) -> StorageResult<String> {
        let relative = path.strip_prefix(&self.root).map_err(|_| {
            StorageError::InvalidPath(format!(
                "{} is outside the storage root",
                path.display()
            ))
        })?;

        let mut url = self.url_prefix.clone();
        for component in relative.components() {
            let segment = match component {
                Component::Normal(segment) => segment.to_str().ok_or_else(|| {
                    StorageError::InvalidPath(format!("{} is not valid UTF-8", path.display()))
                })?,
                _ => {
                    return Err(StorageError::InvalidPath(format!(
                        "{} is not a normalized path",
                        path.display()
                    )))
                }
            };
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }

        if url.is_empty() {
            url.push('/');
        }
        Ok(url)
    }

    /// Inverse of [`url_for_path`](Self::url_for_path)
    pub fn path_for_url(&self, url: &str) -> StorageResult<PathBuf> {
        let rest = url
            .strip_prefix(self.url_prefix.as_str())
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .ok_or_else(|| {
                StorageError::InvalidPath(format!("{} is not a storage URL", url))
            })?;

        let mut path = self.root.clone();
        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            let decoded = urlencoding::decode(segment)
                .map_err(|_| StorageError::InvalidPath(format!("{} is not valid UTF-8", url)))?;
            path.push(checked_folder_name(&decoded)?);
        }
        Ok(path)
    }

    /// Validate a backend path handed back by a caller
    ///
    /// Relative paths are taken relative to the root; `..` components and
    /// paths outside the root are rejected.
    fn resolve_under_root(&self, path: &str) -> StorageResult<PathBuf> {
        let candidate = Path::new(path);
        if candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StorageError::InvalidPath(
                "Storage path contains invalid components".to_string(),
            ));
        }

        let resolved = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        };

        if !resolved.starts_with(&self.root) {
            return Err(StorageError::InvalidPath(
                "Storage path resolves outside storage directory".to_string(),
            ));
        }
        Ok(resolved)
    }

    fn folder_stub(&self, path: &Path) -> StorageResult<StorageFolder> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(StorageFolder::stub(
            name,
            path.to_string_lossy().into_owned(),
            self.url_for_path(path)?,
        ))
    }

    fn file_entry(&self, path: &Path, metadata: &Metadata) -> StorageResult<StorageFile> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let last_modified = metadata.modified().ok().map(DateTime::<Utc>::from);
        Ok(StorageFile::new(
            name,
            path.to_string_lossy().into_owned(),
            self.url_for_path(path)?,
        )
        .with_size(metadata.len())
        .with_last_modified(last_modified))
    }

    async fn is_dir(path: &Path) -> StorageResult<bool> {
        match fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn existing_dir(path: PathBuf) -> StorageResult<PathBuf> {
        if Self::is_dir(&path).await? {
            Ok(path)
        } else {
            Err(StorageError::NotFound(format!(
                "Folder {} does not exist",
                path.display()
            )))
        }
    }

    async fn program_dir(&self, program: &Program) -> StorageResult<PathBuf> {
        let name = self.naming.program_folder_name(program);
        Self::existing_dir(self.root.join(checked_folder_name(&name)?)).await
    }

    async fn study_dir(&self, study: &Study) -> StorageResult<PathBuf> {
        let parent = self.program_dir(&study.program).await?;
        let name = self.naming.study_folder_name(study);
        Self::existing_dir(parent.join(checked_folder_name(&name)?)).await
    }

    async fn assay_dir(&self, assay: &Assay) -> StorageResult<PathBuf> {
        let parent = self.study_dir(&assay.study).await?;
        let name = self.naming.assay_folder_name(assay);
        Self::existing_dir(parent.join(checked_folder_name(&name)?)).await
    }

    async fn folder(&self, path: &Path, include_contents: bool) -> StorageResult<StorageFolder> {
        let mut folder = self.folder_stub(path)?;
        if include_contents {
            let (files, sub_folders) = self.list_contents(path.to_path_buf(), 0).await?;
            folder.files = files;
            folder.sub_folders = sub_folders;
        }
        Ok(folder)
    }

    /// List a directory; child folders are expanded while `depth < max_depth`.
    fn list_contents(
        &self,
        path: PathBuf,
        depth: usize,
    ) -> BoxFuture<'_, StorageResult<(Vec<StorageFile>, Vec<StorageFolder>)>> {
        async move {
            let mut files = Vec::new();
            let mut sub_folders = Vec::new();
            let mut entries = fs::read_dir(&path).await?;

            while let Some(entry) = entries.next_entry().await? {
                let entry_path = entry.path();
                if is_temp_file(&entry_path) {
                    continue;
                }
                if entry_path.file_name().and_then(|n| n.to_str()).is_none() {
                    tracing::warn!(
                        path = %entry_path.display(),
                        "Skipping storage entry with a non UTF-8 name"
                    );
                    continue;
                }
                // Dangling symlinks and entries removed since read_dir are skipped.
                let metadata = match fs::metadata(&entry_path).await {
                    Ok(metadata) => metadata,
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        tracing::debug!(path = %entry_path.display(), "Skipping vanished storage entry");
                        continue;
                    }
                    Err(e) => return Err(StorageError::IoError(e)),
                };

                if metadata.is_dir() {
                    let mut folder = self.folder_stub(&entry_path)?;
                    if depth < self.max_depth {
                        let (child_files, child_folders) =
                            self.list_contents(entry_path, depth + 1).await?;
                        folder.files = child_files;
                        folder.sub_folders = child_folders;
                    }
                    sub_folders.push(folder);
                } else if metadata.is_file() {
                    files.push(self.file_entry(&entry_path, &metadata)?);
                }
            }

            files.sort_by(|a, b| a.name.cmp(&b.name));
            sub_folders.sort_by(|a, b| a.name.cmp(&b.name));
            Ok((files, sub_folders))
        }
        .boxed()
    }

    /// Make sure a parent folder exists, creating it if needed.
    async fn ensure_dir(&self, parent: &Path, name: &str) -> StorageResult<PathBuf> {
        let path = parent.join(checked_folder_name(name)?);
        if Self::is_dir(&path).await? {
            return Ok(path);
        }

        match fs::create_dir(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Local storage parent folder created");
                Ok(path)
            }
            // Lost a creation race; the parent is usable as long as it is a directory.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if Self::is_dir(&path).await? {
                    Ok(path)
                } else {
                    Err(StorageError::WriteFailure(format!(
                        "Failed to create folder {}: a file with that name exists",
                        path.display()
                    )))
                }
            }
            Err(e) => Err(StorageError::WriteFailure(format!(
                "Failed to create folder {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Create `name` under `parent`, applying the configured conflict policy.
    async fn create_folder(&self, parent: &Path, name: &str) -> StorageResult<StorageFolder> {
        let path = parent.join(checked_folder_name(name)?);
        let start = Instant::now();

        if Self::is_dir(&path).await? {
            match self.policy {
                ConflictPolicy::Fail => {
                    return Err(StorageError::Duplicate(path.display().to_string()));
                }
                ConflictPolicy::UseExisting => {
                    tracing::debug!(path = %path.display(), "Using existing local storage folder");
                    return self.folder(&path, true).await;
                }
                ConflictPolicy::Overwrite => {
                    // Non-recursive: a folder with content is never silently discarded.
                    fs::remove_dir(&path).await.map_err(|e| {
                        StorageError::WriteFailure(format!(
                            "Failed to remove existing folder {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                    tracing::info!(path = %path.display(), "Local storage folder removed for overwrite");
                }
            }
        }

        match fs::create_dir(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::Duplicate(path.display().to_string()));
            }
            Err(e) => {
                return Err(StorageError::WriteFailure(format!(
                    "Failed to create folder {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        tracing::info!(
            path = %path.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage folder created"
        );

        self.folder(&path, true).await
    }

    async fn owner_dir(&self, owner: EntityRef<'_>) -> StorageResult<PathBuf> {
        match owner {
            EntityRef::Program(program) => self.program_dir(program).await,
            EntityRef::Study(study) => self.study_dir(study).await,
            EntityRef::Assay(assay) => self.assay_dir(assay).await,
        }
    }

    /// Copy `source` to `dest` through a temporary sibling so readers never see a partial file.
    async fn write_atomically(source: &Path, dest: &Path, folder: &Path) -> StorageResult<()> {
        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp = folder.join(format!(".{}.{}{}", file_name, Uuid::new_v4(), TEMP_SUFFIX));

        let result = async {
            fs::copy(source, &temp).await?;
            fs::File::open(&temp).await?.sync_all().await?;
            fs::rename(&temp, dest).await
        }
        .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::WriteFailure(format!(
                "Failed to write file {}: {}",
                dest.display(),
                e
            )));
        }
        Ok(())
    }
}

/// Reject names that would not map to exactly one directory level.
fn checked_folder_name(name: &str) -> StorageResult<&str> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(StorageError::InvalidPath(format!(
            "'{}' is not a valid folder name",
            name
        )));
    }
    Ok(name)
}

fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') && n.ends_with(TEMP_SUFFIX))
        .unwrap_or(false)
}

#[async_trait]
impl StudyStorage for LocalStorage {
    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }

    async fn get_program_folder(
        &self,
        program: &Program,
        include_contents: bool,
    ) -> StorageResult<StorageFolder> {
        let path = self.program_dir(program).await?;
        self.folder(&path, include_contents).await
    }

    async fn get_study_folder(
        &self,
        study: &Study,
        include_contents: bool,
    ) -> StorageResult<StorageFolder> {
        let path = self.study_dir(study).await?;
        self.folder(&path, include_contents).await
    }

    async fn get_assay_folder(
        &self,
        assay: &Assay,
        include_contents: bool,
    ) -> StorageResult<StorageFolder> {
        let path = self.assay_dir(assay).await?;
        self.folder(&path, include_contents).await
    }

    async fn create_program_folder(&self, program: &Program) -> StorageResult<StorageFolder> {
        let name = self.naming.program_folder_name(program);
        self.create_folder(&self.root, &name).await
    }

    async fn create_study_folder(&self, study: &Study) -> StorageResult<StorageFolder> {
        let program_name = self.naming.program_folder_name(&study.program);
        let parent = self.ensure_dir(&self.root, &program_name).await?;
        let name = self.naming.study_folder_name(study);
        self.create_folder(&parent, &name).await
    }

    async fn create_assay_folder(&self, assay: &Assay) -> StorageResult<StorageFolder> {
        let study = &assay.study;
        let program_name = self.naming.program_folder_name(&study.program);
        let program_dir = self.ensure_dir(&self.root, &program_name).await?;
        let study_name = self.naming.study_folder_name(study);
        let parent = self.ensure_dir(&program_dir, &study_name).await?;
        let name = self.naming.assay_folder_name(assay);
        self.create_folder(&parent, &name).await
    }

    async fn save_file(&self, source: &Path, owner: EntityRef<'_>) -> StorageResult<StorageFile> {
        let folder = self.owner_dir(owner).await?;
        let start = Instant::now();

        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                StorageError::InvalidPath(format!("{} has no file name", source.display()))
            })?;

        match fs::metadata(source).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => {
                return Err(StorageError::InvalidPath(format!(
                    "{} is not a regular file",
                    source.display()
                )))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(format!(
                    "Source file {} does not exist",
                    source.display()
                )))
            }
            Err(e) => return Err(StorageError::IoError(e)),
        }

        let dest = folder.join(file_name);
        Self::write_atomically(source, &dest, &folder).await?;

        let metadata = fs::metadata(&dest).await?;
        let file = self.file_entry(&dest, &metadata)?;

        tracing::info!(
            path = %dest.display(),
            owner = %owner,
            size_bytes = metadata.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage file saved"
        );

        Ok(file)
    }

    async fn folder_at(&self, path: &str, include_contents: bool) -> StorageResult<StorageFolder> {
        let path = Self::existing_dir(self.resolve_under_root(path)?).await?;
        self.folder(&path, include_contents).await
    }

    async fn file_at(&self, path: &str) -> StorageResult<StorageFile> {
        let path = self.resolve_under_root(path)?;
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => self.file_entry(&path, &metadata),
            Ok(_) => Err(StorageError::NotFound(format!(
                "{} is not a file",
                path.display()
            ))),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(format!(
                "File {} does not exist",
                path.display()
            ))),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }
}
