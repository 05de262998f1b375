#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-remote")]
use crate::RemoteStorage;
use crate::{StorageBackend, StorageError, StorageResult, StudyStorage};
use labfolio_core::StorageConfig;
use std::sync::Arc;

/// Create a study storage backend based on configuration
///
/// The conflict policy, traversal depth and naming options of `config` are
/// applied to whichever backend is selected.
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn StudyStorage>> {
    match config.backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let local = config.local.as_ref().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_ROOT not configured".to_string())
            })?;

            let storage = LocalStorage::new(local.root.clone(), local.url_prefix.clone())
                .await?
                .with_conflict_policy(config.conflict_policy)
                .with_max_depth(config.max_depth)
                .with_naming(config.naming.clone());
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-remote")]
        StorageBackend::Remote => {
            let remote = config.remote.as_ref().ok_or_else(|| {
                StorageError::ConfigError("REMOTE_API_URL not configured".to_string())
            })?;

            let storage = RemoteStorage::new(remote)?
                .with_conflict_policy(config.conflict_policy)
                .with_max_depth(config.max_depth)
                .with_naming(config.naming.clone());
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-remote"))]
        StorageBackend::Remote => Err(StorageError::ConfigError(
            "Remote storage backend not available (storage-remote feature not enabled)".to_string(),
        )),
    }
}
