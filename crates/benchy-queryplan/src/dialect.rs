//! Supported EXPLAIN dialects

use serde::{Deserialize, Serialize};

/// Database systems whose structured EXPLAIN ANALYZE output can be translated
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Dialect {
    Umbra,
    Postgres,
    Hyper,
    DuckDb,
}

impl Dialect {
    /// Returns the dialect name as used in configuration and on the command line
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Returns true if this system reports shared pipelines by operator id
    ///
    /// Only these dialects honor `duplicate_shared_pipelines`.
    pub fn has_shared_pipelines(&self) -> bool {
        matches!(self, Self::Umbra | Self::Hyper)
    }
}
