use std::path::{Path, PathBuf};

use post_api::ApiConfig;
use post_composition::CompositionConfig;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Environment variable pointing at the settings file
pub const CONFIG_ENV: &str = "POST_EDITOR_CONFIG";

/// Settings file used when neither flag nor environment name one
pub const DEFAULT_CONFIG_FILE: &str = "post-editor.toml";

/// Settings of the post editor, read from a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub api: ApiConfig,
    pub composition: CompositionConfig,
}

impl AppSettings {
    /// Resolves the settings path: explicit flag, then environment, then default
    pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Loads settings; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!(
                    "Settings file {} not found, using defaults",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::Filesystem(e)),
        };
        Self::parse(&raw).map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        toml::from_str(raw).map_err(|e| AppError::Config(e.to_string()))
    }
}
