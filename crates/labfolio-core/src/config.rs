//! Configuration module
//!
//! This module provides the storage configuration: which backend to use,
//! the folder conflict policy, traversal depth, backend-specific settings
//! and the naming options. Values come from the environment (with `.env`
//! support) and are validated once at startup.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::time::Duration;

use crate::naming::NamingOptions;
use crate::storage_types::{ConflictPolicy, StorageBackend};

// Common constants
const MAX_DEPTH: usize = 1;
const LOCAL_URL_PREFIX: &str = "/static";
const REMOTE_ROOT_PATH: &str = "/Shared";
const REMOTE_QPS: f64 = 2.0;
const REMOTE_TIMEOUT_SECS: u64 = 30;
const REMOTE_MAX_RETRIES: u32 = 2;
/// Longest pause between remote requests; lower QPS budgets are rejected
const MAX_REQUEST_INTERVAL: Duration = Duration::from_secs(3600);

/// Local filesystem backend settings
#[derive(Clone, Debug)]
pub struct LocalStorageConfig {
    /// Directory holding the program folders
    pub root: PathBuf,
    /// Public URL prefix the root is served under (e.g. "/static")
    pub url_prefix: String,
}

/// How the remote backend obtains its bearer token
#[derive(Clone)]
pub enum RemoteAuth {
    /// Pre-issued token, used as-is and never refreshed
    Token(String),
    /// OAuth password grant against `auth_url`
    Password {
        auth_url: String,
        client_id: String,
        username: String,
        password: String,
    },
}

impl Debug for RemoteAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RemoteAuth::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
            RemoteAuth::Password {
                auth_url,
                client_id,
                username,
                ..
            } => f
                .debug_struct("Password")
                .field("auth_url", auth_url)
                .field("client_id", client_id)
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Remote document-management API backend settings
#[derive(Clone, Debug)]
pub struct RemoteStorageConfig {
    /// API base URL (e.g. "https://acme.example.com/pubapi/v1")
    pub api_url: String,
    /// Folder that holds the program folders (e.g. "/Shared/Labfolio")
    pub root_path: String,
    /// Prefix prepended to object paths to build public URLs; empty keeps the raw path
    pub web_url: String,
    pub auth: RemoteAuth,
    /// Request budget; every request is preceded by a `1 / qps` pause
    pub queries_per_second: f64,
    pub timeout_secs: u64,
    /// Retries for transport-level failures (connect errors, timeouts)
    pub max_retries: u32,
}

impl RemoteStorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fixed pause inserted before each request, capped at one hour
    pub fn request_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.queries_per_second)
            .unwrap_or(MAX_REQUEST_INTERVAL)
            .min(MAX_REQUEST_INTERVAL)
    }
}

/// Study storage configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub conflict_policy: ConflictPolicy,
    pub max_depth: usize,
    pub local: Option<LocalStorageConfig>,
    pub remote: Option<RemoteStorageConfig>,
    pub naming: NamingOptions,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::Local,
        };

        let conflict_policy = match var("STORAGE_CONFLICT_POLICY") {
            Some(s) => s.parse()?,
            None => ConflictPolicy::default(),
        };

        // Set but unparseable numbers are errors, not defaults
        let number = |key: &str, what: &str| -> Result<Option<u64>, anyhow::Error> {
            var(key)
                .map(|s| {
                    s.parse::<u64>()
                        .map_err(|_| anyhow::anyhow!("{} must be {}, got '{}'", key, what, s))
                })
                .transpose()
        };

        let max_depth = number("STORAGE_MAX_DEPTH", "a non-negative number")?
            .map(|n| n as usize)
            .unwrap_or(MAX_DEPTH);

        let local = var("LOCAL_STORAGE_ROOT").map(|root| LocalStorageConfig {
            root: PathBuf::from(root),
            url_prefix: var("LOCAL_STORAGE_URL_PREFIX")
                .unwrap_or_else(|| LOCAL_URL_PREFIX.to_string()),
        });

        let remote = match var("REMOTE_API_URL") {
            Some(api_url) => {
                let auth = match var("REMOTE_API_TOKEN") {
                    Some(token) => RemoteAuth::Token(token),
                    None => RemoteAuth::Password {
                        auth_url: var("REMOTE_AUTH_URL").ok_or_else(|| {
                            anyhow::anyhow!(
                                "REMOTE_API_TOKEN or REMOTE_AUTH_URL must be set for the remote storage backend"
                            )
                        })?,
                        client_id: var("REMOTE_CLIENT_ID").ok_or_else(|| {
                            anyhow::anyhow!("REMOTE_CLIENT_ID must be set when using REMOTE_AUTH_URL")
                        })?,
                        username: var("REMOTE_USERNAME").ok_or_else(|| {
                            anyhow::anyhow!("REMOTE_USERNAME must be set when using REMOTE_AUTH_URL")
                        })?,
                        password: var("REMOTE_PASSWORD").ok_or_else(|| {
                            anyhow::anyhow!("REMOTE_PASSWORD must be set when using REMOTE_AUTH_URL")
                        })?,
                    },
                };

                Some(RemoteStorageConfig {
                    api_url: api_url.trim_end_matches('/').to_string(),
                    root_path: var("REMOTE_ROOT_PATH")
                        .unwrap_or_else(|| REMOTE_ROOT_PATH.to_string()),
                    web_url: var("REMOTE_WEB_URL")
                        .map(|u| u.trim_end_matches('/').to_string())
                        .unwrap_or_default(),
                    auth,
                    queries_per_second: match var("REMOTE_QPS") {
                        Some(s) => s.parse().map_err(|_| {
                            anyhow::anyhow!("REMOTE_QPS must be a number, got '{}'", s)
                        })?,
                        None => REMOTE_QPS,
                    },
                    timeout_secs: number("REMOTE_TIMEOUT_SECS", "a number of seconds")?
                        .unwrap_or(REMOTE_TIMEOUT_SECS),
                    max_retries: number("REMOTE_MAX_RETRIES", "a non-negative number")?
                        .map(u32::try_from)
                        .transpose()
                        .map_err(|_| anyhow::anyhow!("REMOTE_MAX_RETRIES is too large"))?
                        .unwrap_or(REMOTE_MAX_RETRIES),
                })
            }
            None => None,
        };

        let defaults = NamingOptions::default();
        let naming = NamingOptions {
            study_code_counter_start: number("STUDY_CODE_COUNTER_START", "a non-negative number")?
                .unwrap_or(defaults.study_code_counter_start),
            study_code_min_digits: number("STUDY_CODE_MIN_DIGITS", "a non-negative number")?
                .map(|n| n as usize)
                .unwrap_or(defaults.study_code_min_digits),
            assay_code_counter_start: number("ASSAY_CODE_COUNTER_START", "a non-negative number")?
                .unwrap_or(defaults.assay_code_counter_start),
            assay_code_min_digits: number("ASSAY_CODE_MIN_DIGITS", "a non-negative number")?
                .map(|n| n as usize)
                .unwrap_or(defaults.assay_code_min_digits),
            external_study_code_prefix: var("EXTERNAL_STUDY_CODE_PREFIX")
                .unwrap_or(defaults.external_study_code_prefix),
            external_study_code_counter_start: defaults.external_study_code_counter_start,
            external_study_code_min_digits: defaults.external_study_code_min_digits,
        };

        let config = StorageConfig {
            backend,
            conflict_policy,
            max_depth,
            local,
            remote,
            naming,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.naming.validate()?;

        match self.backend {
            StorageBackend::Local => {
                if self.local.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_ROOT must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Remote => {
                let remote = self.remote.as_ref().ok_or_else(|| {
                    anyhow::anyhow!("REMOTE_API_URL must be set when using remote storage backend")
                })?;
                if !remote.api_url.starts_with("http://") && !remote.api_url.starts_with("https://")
                {
                    return Err(anyhow::anyhow!("REMOTE_API_URL must be an http(s) URL"));
                }
                if !remote.queries_per_second.is_finite() || remote.queries_per_second <= 0.0 {
                    return Err(anyhow::anyhow!("REMOTE_QPS must be greater than zero"));
                }
                if remote.queries_per_second < 1.0 / MAX_REQUEST_INTERVAL.as_secs_f64() {
                    return Err(anyhow::anyhow!(
                        "REMOTE_QPS must allow at least one request per hour"
                    ));
                }
                if !remote.root_path.starts_with('/') {
                    return Err(anyhow::anyhow!("REMOTE_ROOT_PATH must start with '/'"));
                }
                if remote.timeout_secs == 0 {
                    return Err(anyhow::anyhow!("REMOTE_TIMEOUT_SECS must be greater than zero"));
                }
            }
        }

        Ok(())
    }
}
