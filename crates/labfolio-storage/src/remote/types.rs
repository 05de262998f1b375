//! Wire types of the remote file-system API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A folder or file as returned by `GET /fs/{path}` and `GET /fs/ids/...`.
///
/// Folders carry their immediate children in `folders` and `files`; the
/// children themselves come back without listings.
#[derive(Debug, Clone, Deserialize)]
pub struct FsEntry {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub entry_id: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    /// RFC 2822 timestamp, e.g. "Sun, 26 Aug 2012 03:55:29 GMT"
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub folders: Vec<FsEntry>,
    #[serde(default)]
    pub files: Vec<FsEntry>,
}

impl FsEntry {
    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc2822(s).ok())
            .map(|d| d.with_timezone(&Utc))
    }
}

/// Body of a successful `POST /fs-content/...`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub entry_id: Option<String>,
}

/// Body of a successful password-grant token request.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
