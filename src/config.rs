//! Compression settings for an embedding cache.
//!
//! ```json
//! { "algorithm": "lz4", "zstd_level": 3, "brotli_quality": 5 }
//! ```
//!
//! Every field is optional.  Changing `algorithm` only affects new writes;
//! blocks already stored keep decoding with the algorithm they were tagged
//! with, provided the registry still carries it.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::AlgorithmId;
use crate::codec::{DEFAULT_BROTLI_QUALITY, DEFAULT_ZSTD_LEVEL};
use crate::error::{Error, Result};
use crate::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Algorithm name used for new blocks.
    pub algorithm:      String,
    pub zstd_level:     i32,
    pub brotli_quality: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm:      default_algorithm_name().to_string(),
            zstd_level:     DEFAULT_ZSTD_LEVEL,
            brotli_quality: DEFAULT_BROTLI_QUALITY,
        }
    }
}

fn default_algorithm_name() -> &'static str {
    if cfg!(feature = "snappy") { "snappy" } else { "none" }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.default_algorithm()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let cfg = Self::from_json(&fs::read_to_string(path)?)?;
        debug!("loaded compression config from {}: {:?}", path.display(), cfg);
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The id of the configured algorithm.
    ///
    /// Only checks that the name is known; whether this build carries the
    /// codec is decided by [`Registry::resolve`].
    pub fn default_algorithm(&self) -> Result<AlgorithmId> {
        AlgorithmId::from_name(&self.algorithm)
            .ok_or_else(|| Error::UnknownAlgorithmName(self.algorithm.clone()))
    }

    /// Builtin registry tuned with this config's levels.
    pub fn registry(&self) -> Registry {
        Registry::builtin_tuned(self.zstd_level, self.brotli_quality)
    }
}
