//! Error types for plan translation

use crate::dialect::Dialect;
use thiserror::Error;

/// Errors that can occur while translating a vendor plan
///
/// Every variant is fatal for the query being translated: no partial tree is
/// ever returned alongside an error.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("'{name}' is not a recognized {dialect} operator")]
    UnrecognizedOperator { dialect: Dialect, name: String },

    #[error("'{value}' is not a recognized {dialect} join type")]
    UnrecognizedJoinType { dialect: Dialect, value: String },

    #[error("Malformed {dialect} plan: {message}")]
    MalformedInput { dialect: Dialect, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

impl PlanError {
    pub(crate) fn malformed(dialect: Dialect, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            dialect,
            message: message.into(),
        }
    }

    pub(crate) fn missing_field(dialect: Dialect, field: &str) -> Self {
        Self::malformed(dialect, format!("missing field `{field}`"))
    }

    /// Returns true for errors caused by a native name with no dispatch entry
    pub fn is_unrecognized_operator(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedOperator { .. } | Self::UnrecognizedJoinType { .. }
        )
    }

    /// Returns true when an expected field was absent or had the wrong shape
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}

/// Result type for plan translation
pub type Result<T> = std::result::Result<T, PlanError>;
