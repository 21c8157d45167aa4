//! Declarative registry configuration.
//!
//! Only hashers can be named in a config file: they do not depend on the
//! registry's value type.  Codecs are always supplied in code through
//! [`RegistryOptions`](crate::registry::RegistryOptions).
//!
//! ```json
//! { "hashers": ["sha2-512", "blake3"] }
//! ```
//!
//! SHA2-256 is always present and need not be listed.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hasher::{hasher_by_name, Hasher};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown hasher name in config: {0}")]
    UnknownHasher(String),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Multihash table names of extra hashers to register.
    #[serde(default)]
    pub hashers: Vec<String>,
}

impl RegistryConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Resolve every listed name; the first unknown name fails the whole set.
    pub fn resolve_hashers(&self) -> Result<Vec<Arc<dyn Hasher>>, ConfigError> {
        self.hashers
            .iter()
            .map(|name| {
                hasher_by_name(name)
                    .map(Arc::<dyn Hasher>::from)
                    .ok_or_else(|| ConfigError::UnknownHasher(name.clone()))
            })
            .collect()
    }
}
