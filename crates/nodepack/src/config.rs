//! TOML configuration for the codec limits and resolver.
//!
//! ```toml
//! [limits]
//! max_depth = 500
//! max_alloc_bytes = 67108864
//!
//! [resolver]
//! guid = true
//! ```
//!
//! Every field is optional. `max_depth` is clamped to
//! [`DecodeLimits::MAX_DEPTH_CEILING`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nodepack_codec::msgpack::{CompositeResolver, StandardResolver};
use nodepack_codec::{CodecOptions, DecodeLimits};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub limits: LimitsConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub max_depth: usize,
    pub max_alloc_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_depth: DecodeLimits::DEFAULT_MAX_DEPTH,
            max_alloc_bytes: DecodeLimits::DEFAULT_MAX_ALLOC_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Map extension type 1 to UUID strings.
    pub guid: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { guid: true }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn codec_options(&self) -> CodecOptions {
        let mut max_depth = self.limits.max_depth;
        if max_depth > DecodeLimits::MAX_DEPTH_CEILING {
            warn!(
                requested = max_depth,
                ceiling = DecodeLimits::MAX_DEPTH_CEILING,
                "max_depth clamped"
            );
            max_depth = DecodeLimits::MAX_DEPTH_CEILING;
        }
        let limits = DecodeLimits::new(max_depth, self.limits.max_alloc_bytes);
        let options = CodecOptions::default().with_limits(limits);
        if self.resolver.guid {
            options.with_resolver(Arc::new(CompositeResolver::guid()))
        } else {
            options.with_resolver(Arc::new(StandardResolver))
        }
    }
}
