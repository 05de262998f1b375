//! Study storage abstraction trait
//!
//! This module defines the StudyStorage trait that all storage backends must implement,
//! together with the error taxonomy they share.

use crate::models::{StorageFile, StorageFolder};
use crate::StorageBackend;
use async_trait::async_trait;
use labfolio_core::{Assay, EntityRef, ErrorMetadata, LogLevel, Program, Study};
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Write failed: {0}")]
    WriteFailure(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Re-classify a failure that happened while mutating the backend.
    ///
    /// Typed signals (not found, duplicate, unauthorized, invalid path) pass
    /// through; anything unclassified becomes a write failure.
    pub fn into_write_failure(self) -> Self {
        match self {
            StorageError::BackendError(msg) | StorageError::Network(msg) => {
                StorageError::WriteFailure(msg)
            }
            StorageError::IoError(e) => StorageError::WriteFailure(e.to_string()),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StorageError::Duplicate(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl ErrorMetadata for StorageError {
    fn http_status_code(&self) -> u16 {
        match self {
            StorageError::NotFound(_) => 404,
            StorageError::Duplicate(_) => 409,
            StorageError::Unauthorized(_) => 403,
            StorageError::InvalidPath(_) => 400,
            StorageError::Network(_) => 503,
            StorageError::WriteFailure(_)
            | StorageError::BackendError(_)
            | StorageError::IoError(_)
            | StorageError::ConfigError(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StorageError::NotFound(_) => "STORAGE_NOT_FOUND",
            StorageError::Duplicate(_) => "STORAGE_DUPLICATE",
            StorageError::WriteFailure(_) => "STORAGE_WRITE_FAILURE",
            StorageError::Unauthorized(_) => "STORAGE_UNAUTHORIZED",
            StorageError::BackendError(_) => "STORAGE_ERROR",
            StorageError::Network(_) => "STORAGE_UNAVAILABLE",
            StorageError::InvalidPath(_) => "STORAGE_INVALID_PATH",
            StorageError::IoError(_) => "STORAGE_IO_ERROR",
            StorageError::ConfigError(_) => "STORAGE_CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, StorageError::Network(_))
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            StorageError::NotFound(_) => Some("Create the parent folder before using it"),
            StorageError::Duplicate(_) => Some("Reuse the existing folder or change the conflict policy"),
            StorageError::Unauthorized(_) => Some("Check storage credentials and permissions"),
            StorageError::Network(_) => Some("Retry after a short delay"),
            StorageError::InvalidPath(_) => Some("Check the entity name and code"),
            StorageError::ConfigError(_) => Some("Check storage configuration"),
            StorageError::WriteFailure(_)
            | StorageError::BackendError(_)
            | StorageError::IoError(_) => None,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StorageError::NotFound(_) | StorageError::InvalidPath(_) => LogLevel::Debug,
            StorageError::Duplicate(_)
            | StorageError::Unauthorized(_)
            | StorageError::Network(_) => LogLevel::Warn,
            StorageError::WriteFailure(_)
            | StorageError::BackendError(_)
            | StorageError::IoError(_)
            | StorageError::ConfigError(_) => LogLevel::Error,
        }
    }
}

/// Study storage abstraction trait
///
/// All storage backends (local filesystem, remote API) must implement this trait.
/// Callers ask for "the folder of study X" without knowing where or how the
/// tree is stored.
///
/// Getters fail with [`StorageError::NotFound`] when the folder (or any
/// parent) does not exist. Creators resolve or create the parent chain first,
/// then apply the backend's [`ConflictPolicy`](crate::ConflictPolicy) to the
/// target folder.
///
/// With `include_contents`, the returned folder lists its files and
/// sub-folders down to the backend's configured maximum depth; deeper content
/// is omitted without error.
#[async_trait]
pub trait StudyStorage: Send + Sync {
    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    async fn get_program_folder(
        &self,
        program: &Program,
        include_contents: bool,
    ) -> StorageResult<StorageFolder>;

    async fn get_study_folder(
        &self,
        study: &Study,
        include_contents: bool,
    ) -> StorageResult<StorageFolder>;

    async fn get_assay_folder(
        &self,
        assay: &Assay,
        include_contents: bool,
    ) -> StorageResult<StorageFolder>;

    async fn create_program_folder(&self, program: &Program) -> StorageResult<StorageFolder>;

    async fn create_study_folder(&self, study: &Study) -> StorageResult<StorageFolder>;

    async fn create_assay_folder(&self, assay: &Assay) -> StorageResult<StorageFolder>;

    /// Save a local file into the folder of its owning entity.
    ///
    /// The owner's folder must already exist; a same-named file is replaced.
    async fn save_file(&self, source: &Path, owner: EntityRef<'_>) -> StorageResult<StorageFile>;

    /// Resolve a folder by the backend path previously returned in [`StorageFolder::path`].
    async fn folder_at(&self, path: &str, include_contents: bool) -> StorageResult<StorageFolder>;

    /// Resolve a file by the backend path previously returned in [`StorageFile::path`].
    async fn file_at(&self, path: &str) -> StorageResult<StorageFile>;

    /// Get the folder of any entity
    async fn get_folder(
        &self,
        owner: EntityRef<'_>,
        include_contents: bool,
    ) -> StorageResult<StorageFolder> {
        match owner {
            EntityRef::Program(program) => self.get_program_folder(program, include_contents).await,
            EntityRef::Study(study) => self.get_study_folder(study, include_contents).await,
            EntityRef::Assay(assay) => self.get_assay_folder(assay, include_contents).await,
        }
    }
}
