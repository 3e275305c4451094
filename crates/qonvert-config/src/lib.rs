//! File-based configuration for the Qonvert plugin.
//!
//! A config file is TOML with an optional top-level `activation` key and a
//! `[markers]` table. Every key is optional; anything left out stays
//! disabled.
//!
//! ```toml
//! activation = "setting_only"
//!
//! [markers]
//! gte = ">="
//! gt = ">"
//! not_like = "!~"
//! ```

use qonvert_core::{gate::Activation, rule::MarkerConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid qonvert config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// QonvertConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct QonvertConfig {
    pub activation: Activation,
    pub markers: MarkerConfig,
}

impl QonvertConfig {
    /// Parse a config from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source)
    }
}

///
/// TESTS
///
