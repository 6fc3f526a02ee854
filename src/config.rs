//! Command metadata: description, epilog and per-parameter help.
//!
//! Metadata can be built in code or loaded from TOML:
//!
//! ```toml
//! description = "Computes a+(v|w)/b"
//! epilog = "<Epilog text>"
//!
//! [help]
//! name = "Give this name to the result"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading command metadata.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("Failed to read metadata file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse metadata from {origin}: {source}")]
    ParseError {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Text shown around the generated arguments in `--help`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandMeta {
    /// Shown after the usage line.
    #[serde(default)]
    pub description: Option<String>,
    /// Shown after the argument sections.
    #[serde(default)]
    pub epilog: Option<String>,
    /// Parameter name → user help text.
    #[serde(default)]
    pub help: BTreeMap<String, String>,
}

impl CommandMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = Some(epilog.into());
        self
    }

    pub fn with_help(mut self, parameter: impl Into<String>, text: impl Into<String>) -> Self {
        self.help.insert(parameter.into(), text.into());
        self
    }

    pub fn help_for(&self, parameter: &str) -> Option<&str> {
        self.help.get(parameter).map(String::as_str)
    }

    /// Parses metadata from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, MetaError> {
        Self::parse(content, "inline TOML")
    }

    /// Loads metadata from a TOML file.
    pub fn load(path: &Path) -> Result<Self, MetaError> {
        let content = fs::read_to_string(path).map_err(|e| MetaError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, &format!("'{}'", path.display()))
    }

    fn parse(content: &str, origin: &str) -> Result<Self, MetaError> {
        let meta: Self = toml::from_str(content).map_err(|e| MetaError::ParseError {
            origin: origin.to_string(),
            source: e,
        })?;
        tracing::debug!(
            origin,
            help_entries = meta.help.len(),
            "loaded command metadata"
        );
        Ok(meta)
    }
}
