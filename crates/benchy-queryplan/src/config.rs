//! Translation settings

use crate::encoder::EncodingFormat;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Options that control how a vendor plan is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Attach each node's vendor-native fragment as provenance
    pub include_system_representation: bool,
    /// Give every reference to a shared pipeline its own copy of the subtree
    ///
    /// Only Umbra and Hyper report shared pipelines by id.
    pub duplicate_shared_pipelines: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_system_representation: true,
            duplicate_shared_pipelines: false,
        }
    }
}

/// End-to-end settings for [`crate::translate`]
///
/// ```toml
/// clean = true
/// format = "xml"
///
/// [parse]
/// include_system_representation = false
/// duplicate_shared_pipelines = true
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub parse: ParseOptions,
    /// Run the dialect's cleanup rules before encoding
    pub clean: bool,
    pub format: EncodingFormat,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            clean: true,
            format: EncodingFormat::Json,
        }
    }
}

impl TranslateConfig {
    /// Parse settings from TOML; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_format(mut self, format: EncodingFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }
}
