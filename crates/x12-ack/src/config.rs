//! Acknowledgment generation configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use x12_adapter::Terminators;

use crate::{Error, Result};

/// Configuration for 999 generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AckConfig {
    /// Terminators for the generated interchange
    pub terminators: Terminators,
}

impl AckConfig {
    /// Parse a configuration from YAML
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the document does not parse or the
    /// terminators are unusable.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("invalid YAML configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from JSON
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the document does not parse or the
    /// terminators are unusable.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid JSON configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file; `.json` files are read as JSON, anything
    /// else as YAML
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    /// Check the configuration for unusable values
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the terminators collide or are not
    /// valid delimiters.
    pub fn validate(&self) -> Result<()> {
        self.terminators
            .validate()
            .map_err(|e| Error::Config(e.to_string()))
    }
}
