//! Labfolio Core Library
//!
//! This crate provides the entity identity models, naming options, storage
//! configuration and error metadata shared by all Labfolio components.

pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod storage_types;

// Re-export commonly used types
pub use config::{LocalStorageConfig, RemoteAuth, RemoteStorageConfig, StorageConfig};
pub use error::{ErrorMetadata, LogLevel};
pub use models::{Assay, EntityRef, Program, Study};
pub use naming::NamingOptions;
pub use storage_types::{ConflictPolicy, StorageBackend};
// Note: StudyStorage, StorageError and the folder tree types live in labfolio-storage
