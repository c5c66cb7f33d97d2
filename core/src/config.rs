//! Host configuration.
//!
//! A host process reads a small YAML file before any rendering pass runs:
//!
//! ```yaml
//! log_level: info
//! seed:
//!   site.title: My blog
//!   site.posts.per_page: 10
//! ```
//!
//! Seed entries are dotted paths assigned into the shared cache in file
//! order.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::HierarchicalNode;
use crate::error::ConfigError;


/// Log filter used when neither the config nor the environment sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";


#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// `tracing` filter directive, e.g. `info` or `site_cache_core=trace`.
    pub log_level: Option<String>,
    /// Dotted path -> initial value.
    pub seed: IndexMap<String, Value>,
}

impl HostConfig {
    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<HostConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), seeds = config.seed.len(), "loaded host config");
        Ok(config)
    }

    /// Parse a config from YAML text. Blank input yields the defaults.
    pub fn parse(content: &str) -> Result<HostConfig, ConfigError> {
        if content.trim().is_empty() {
            return Ok(HostConfig::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Assign every seed entry into `node`. Returns the number applied.
    pub fn apply_seed(&self, node: &HierarchicalNode) -> Result<usize, ConfigError> {
        for (path, value) in &self.seed {
            node.set_item(path.as_str(), value.clone())?;
        }
        Ok(self.seed.len())
    }
}


/// Parse a `PATH=VALUE` assignment.
///
/// VALUE is read as JSON when it parses, otherwise kept as a plain string,
/// so `count=3` stores a number and `title=Home` stores `"Home"`.
pub fn parse_assignment(spec: &str) -> Result<(String, Value), ConfigError> {
    let (path, raw) = spec
        .split_once('=')
        .ok_or_else(|| ConfigError::Assignment(spec.to_string()))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(ConfigError::Assignment(spec.to_string()));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((path.to_string(), value))
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
