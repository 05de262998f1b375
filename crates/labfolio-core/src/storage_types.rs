use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// This enum defines the available study storage backends.
/// It's defined in core because it's used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    Remote,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "remote" => Ok(StorageBackend::Remote),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::Remote => write!(f, "remote"),
        }
    }
}

/// What a backend does when the folder it is asked to create already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Raise a duplicate error.
    #[default]
    Fail,
    /// Return the existing folder unchanged.
    UseExisting,
    /// Remove the existing folder and create it again, empty.
    Overwrite,
}

impl FromStr for ConflictPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fail" => Ok(ConflictPolicy::Fail),
            "use_existing" => Ok(ConflictPolicy::UseExisting),
            "overwrite" => Ok(ConflictPolicy::Overwrite),
            _ => Err(anyhow::anyhow!("Invalid conflict policy: {}", s)),
        }
    }
}

impl Display for ConflictPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ConflictPolicy::Fail => write!(f, "fail"),
            ConflictPolicy::UseExisting => write!(f, "use_existing"),
            ConflictPolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}
