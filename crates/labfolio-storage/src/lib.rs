//! Labfolio Storage Library
//!
//! This crate provides the study storage abstraction and its implementations.
//! It includes the `StudyStorage` trait, the folder tree read models, the
//! naming service and backends for the local filesystem and a remote
//! document-management REST API.
//!
//! # Folder layout
//!
//! Every backend lays the tree out the same way, one folder per entity:
//!
//! - `{root}/{program}`
//! - `{root}/{program}/{study name} ({study code})`
//! - `{root}/{program}/{study name} ({study code})/{assay name} ({assay code})`
//!
//! Files are saved directly inside the owning entity's folder.

pub mod factory;
pub mod models;
pub mod naming;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-remote")]
pub mod remote;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use labfolio_core::{ConflictPolicy, StorageBackend};
pub use models::{StorageFile, StorageFolder};
pub use naming::{sanitize_remote_name, NamingService};
#[cfg(feature = "storage-remote")]
pub use remote::RemoteStorage;
pub use traits::{StorageError, StorageResult, StudyStorage};
