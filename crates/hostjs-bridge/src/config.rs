//! Adapter configuration.
//!
//! Options can be set in code or loaded from TOML, either at the top level
//! or under a `[bridge]` table.
//!
//! # Example Configuration
//!
//! ```toml
//! [bridge]
//! reject_unknown_properties = true
//! ```

use std::ops::BitOr;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors loading adapter configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Behaviour flags applied when script code sets values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetParameterOptions {
    /// Writing a name with no matching member raises instead of doing nothing.
    /// Default: false
    #[serde(default)]
    pub reject_unknown_properties: bool,
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    bridge: Option<SetParameterOptions>,
    #[serde(flatten)]
    top_level: SetParameterOptions,
}

impl SetParameterOptions {
    pub const NONE: Self = Self {
        reject_unknown_properties: false,
    };

    pub const REJECT_UNKNOWN_PROPERTIES: Self = Self {
        reject_unknown_properties: true,
    };

    /// Whether every flag set in `other` is also set here
    pub fn contains(self, other: Self) -> bool {
        !other.reject_unknown_properties || self.reject_unknown_properties
    }

    /// Parse options from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.bridge.unwrap_or(file.top_level))
    }

    /// Load options from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl BitOr for SetParameterOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            reject_unknown_properties: self.reject_unknown_properties
                || rhs.reject_unknown_properties,
        }
    }
}
