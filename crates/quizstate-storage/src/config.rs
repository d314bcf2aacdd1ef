//! Storage configuration and backend factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use quizstate_core::memory::MemoryBackend;
use quizstate_core::traits::StorageBackend;

use crate::file::{FileBackend, DEFAULT_QUOTA_BYTES};

/// Which storage substrate to use and how to set it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    File {
        #[serde(default = "default_data_dir")]
        data_dir: PathBuf,
        #[serde(default = "default_origin")]
        origin: String,
        /// Byte quota per origin; 0 disables the limit.
        #[serde(default = "default_quota")]
        quota_bytes: usize,
        #[serde(default)]
        read_only: bool,
    },
    Memory {
        /// Byte quota; 0 disables the limit.
        #[serde(default)]
        quota_bytes: usize,
    },
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./quizstate-data")
}
fn default_origin() -> String {
    "default".to_string()
}
fn default_quota() -> usize {
    DEFAULT_QUOTA_BYTES
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::File {
            data_dir: default_data_dir(),
            origin: default_origin(),
            quota_bytes: default_quota(),
            read_only: false,
        }
    }
}

/// Top-level quizstate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStateConfig {
    #[serde(default)]
    pub backend: BackendConfig,
}

impl QuizStateConfig {
    /// Override the file backend's location. Ignored, with a warning, for
    /// the memory backend.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, origin: Option<String>) -> Self {
        if data_dir.is_none() && origin.is_none() {
            return self;
        }
        match &mut self.backend {
            BackendConfig::File {
                data_dir: dir,
                origin: org,
                ..
            } => {
                if let Some(d) = data_dir {
                    *dir = d;
                }
                if let Some(o) = origin {
                    *org = o;
                }
            }
            BackendConfig::Memory { .. } => {
                warn!("data dir / origin overrides have no effect on the memory backend");
            }
        }
        self
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    // Substituted values are copied verbatim and never rescanned.
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_backend_config(config: &BackendConfig) -> BackendConfig {
    match config {
        BackendConfig::File {
            data_dir,
            origin,
            quota_bytes,
            read_only,
        } => BackendConfig::File {
            data_dir: PathBuf::from(resolve_env_vars(&data_dir.to_string_lossy())),
            origin: resolve_env_vars(origin),
            quota_bytes: *quota_bytes,
            read_only: *read_only,
        },
        BackendConfig::Memory { quota_bytes } => BackendConfig::Memory {
            quota_bytes: *quota_bytes,
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizstate.toml` in the current directory
/// 2. `~/.config/quizstate/config.toml`
///
/// Environment variable overrides: `QUIZSTATE_DATA_DIR`, `QUIZSTATE_ORIGIN`.
pub fn load_config() -> Result<QuizStateConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizStateConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizstate.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => parse_config_file(&path)?,
        None => QuizStateConfig::default(),
    };

    let config = config.with_overrides(
        std::env::var_os("QUIZSTATE_DATA_DIR").map(PathBuf::from),
        std::env::var("QUIZSTATE_ORIGIN").ok(),
    );

    Ok(QuizStateConfig {
        backend: resolve_backend_config(&config.backend),
    })
}

fn parse_config_file(path: &Path) -> Result<QuizStateConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<QuizStateConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizstate"))
}

/// Create a storage backend from its configuration.
pub fn create_backend(config: &BackendConfig) -> Result<Box<dyn StorageBackend>> {
    match config {
        BackendConfig::File {
            data_dir,
            origin,
            quota_bytes,
            read_only,
        } => {
            let backend = FileBackend::new(data_dir, origin)
                .with_context(|| format!("invalid file backend config for origin '{origin}'"))?
                .with_quota((*quota_bytes > 0).then_some(*quota_bytes))
                .read_only(*read_only);
            Ok(Box::new(backend))
        }
        BackendConfig::Memory { quota_bytes } => {
            let backend = MemoryBackend::new();
            Ok(Box::new(if *quota_bytes > 0 {
                backend.with_quota(*quota_bytes)
            } else {
                backend
            }))
        }
    }
}
