#![allow(dead_code)]

pub mod fixtures;

use labfolio_core::{ConflictPolicy, LocalStorageConfig, NamingOptions, StorageBackend, StorageConfig};
use labfolio_storage::{create_storage, StudyStorage};
use std::sync::Arc;
use tempfile::TempDir;

/// Local study storage rooted in a temporary directory
pub struct TestStorage {
    pub storage: Arc<dyn StudyStorage>,
    pub dir: TempDir,
}

impl TestStorage {
    pub fn storage(&self) -> &dyn StudyStorage {
        self.storage.as_ref()
    }
}

pub async fn setup_local_storage(policy: ConflictPolicy, max_depth: usize) -> TestStorage {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = StorageConfig {
        backend: StorageBackend::Local,
        conflict_policy: policy,
        max_depth,
        local: Some(LocalStorageConfig {
            root: dir.path().join("studies"),
            url_prefix: "/static".to_string(),
        }),
        remote: None,
        naming: NamingOptions::default(),
    };

    let storage = create_storage(&config)
        .await
        .expect("Failed to create local storage");
    TestStorage { storage, dir }
}

/// Write a source file for upload tests and return its path.
pub fn write_source(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write source file");
    path
}
