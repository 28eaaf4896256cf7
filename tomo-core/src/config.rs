//! Assembler configuration

use crate::error::ConfigError;
use crate::types::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings shared by every build of one assembler
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Directory finished archives are written to
    pub output_dir: PathBuf,

    /// Parent of the per-build scratch directories; the system temp dir when unset
    pub scratch_dir: Option<PathBuf>,

    /// Language code written into every document
    pub language: String,

    /// Whether the table of contents is part of the reading order
    pub include_toc: bool,

    /// Cover download connect timeout, in seconds
    pub cover_connect_timeout_secs: u64,

    /// Cover download total timeout, in seconds
    pub cover_timeout_secs: u64,
}

impl AssemblerConfig {
    /// Load a JSON configuration file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the scratch root
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Set the language code
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Put the table of contents in the reading order, or leave it manifest-only
    pub fn with_toc(mut self, include_toc: bool) -> Self {
        self.include_toc = include_toc;
        self
    }

    /// Where scratch directories are created
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn cover_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.cover_connect_timeout_secs)
    }

    pub fn cover_timeout(&self) -> Duration {
        Duration::from_secs(self.cover_timeout_secs)
    }
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            scratch_dir: None,
            language: DEFAULT_LANGUAGE.to_string(),
            include_toc: true,
            cover_connect_timeout_secs: 15,
            cover_timeout_secs: 60,
        }
    }
}
