//! Dispatch configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! lifting = "pareto"               # or "lexicographic"
//! allow_duplicate_signatures = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::signature::LiftingRule;

/// Configuration for a [`MethodTable`](crate::MethodTable).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// How argument dominance lifts to signature dominance.
    pub lifting: LiftingRule,

    /// Accept a second implementation whose signature equals an existing
    /// one. Such pairs can never be told apart and always resolve as
    /// ambiguous.
    pub allow_duplicate_signatures: bool,
}

impl DispatchConfig {
    /// Parse a configuration from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn with_lifting(mut self, lifting: LiftingRule) -> Self {
        self.lifting = lifting;
        self
    }
}
