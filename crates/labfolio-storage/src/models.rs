//! Folder tree read models
//!
//! Built fresh on every query and never persisted. Owning entities may keep
//! `path`/`url` as plain attributes once their folder exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file inside a storage folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageFile {
    pub name: String,
    /// Backend path; resolves back to exactly this file
    pub path: String,
    /// Client-resolvable locator derived from `path`
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl StorageFile {
    pub fn new(name: impl Into<String>, path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            url: url.into(),
            size: None,
            last_modified: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_last_modified(mut self, last_modified: Option<DateTime<Utc>>) -> Self {
        self.last_modified = last_modified;
        self
    }
}

/// A folder and, when requested, its contents
///
/// `files` and `sub_folders` are only populated when contents were requested,
/// and only down to the backend's maximum traversal depth. Folders past the
/// bound are stubs: name, path and url with no children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageFolder {
    pub name: String,
    /// Backend path; resolves back to exactly this folder
    pub path: String,
    /// Client-resolvable locator derived from `path`
    pub url: String,
    #[serde(default)]
    pub files: Vec<StorageFile>,
    #[serde(default)]
    pub sub_folders: Vec<StorageFolder>,
}

impl StorageFolder {
    /// A folder without listed contents.
    pub fn stub(name: impl Into<String>, path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            url: url.into(),
            files: Vec::new(),
            sub_folders: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.sub_folders.is_empty()
    }

    pub fn sub_folder(&self, name: &str) -> Option<&StorageFolder> {
        self.sub_folders.iter().find(|f| f.name == name)
    }

    pub fn file(&self, name: &str) -> Option<&StorageFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Number of populated levels below this folder (0 when nothing is listed).
    pub fn listed_depth(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        1 + self
            .sub_folders
            .iter()
            .map(StorageFolder::listed_depth)
            .max()
            .unwrap_or(0)
    }
}
