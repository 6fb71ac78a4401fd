//! Vendor Plan Parsers
//!
//! One parser per dialect turns that system's structured EXPLAIN ANALYZE
//! output into a canonical [`QueryPlan`]. A parse either succeeds completely
//! or fails; no partial tree is ever returned.

mod context;
mod duckdb;
mod hyper;
mod postgres;
mod umbra;

pub use duckdb::DuckDbParser;
pub use hyper::HyperParser;
pub use postgres::PostgresParser;
pub use umbra::UmbraParser;

use crate::config::ParseOptions;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::plan::QueryPlan;
use serde_json::Value;
use std::borrow::Cow;

/// Translates one dialect's plan document
pub trait PlanParser: Send + Sync {
    /// The dialect this parser reads
    fn dialect(&self) -> Dialect;

    /// Parses a raw plan document for `query`
    fn parse_plan(&self, query: &str, raw: &Value) -> Result<QueryPlan>;
}

/// Returns the parser for a dialect
pub fn parser_for(dialect: Dialect, options: ParseOptions) -> Box<dyn PlanParser> {
    if options.duplicate_shared_pipelines && !dialect.has_shared_pipelines() {
        tracing::debug!(%dialect, "dialect has no shared pipelines to duplicate");
    }
    match dialect {
        Dialect::Umbra => Box::new(UmbraParser::new(options)),
        Dialect::Postgres => Box::new(PostgresParser::new(options)),
        Dialect::Hyper => Box::new(HyperParser::new(options)),
        Dialect::DuckDb => Box::new(DuckDbParser::new(options)),
    }
}

/// Parses a raw plan document with the dialect's parser
pub fn parse_query_plan(
    dialect: Dialect,
    query: &str,
    raw: &Value,
    options: ParseOptions,
) -> Result<QueryPlan> {
    let plan = parser_for(dialect, options).parse_plan(query, raw)?;
    tracing::debug!(
        %dialect,
        nodes = plan.node_count(),
        depth = plan.root.depth(),
        "parsed query plan"
    );
    Ok(plan)
}

/// Parses a plan document given as JSON text
pub fn parse_query_plan_str(
    dialect: Dialect,
    query: &str,
    raw_json: &str,
    options: ParseOptions,
) -> Result<QueryPlan> {
    let raw = read_plan_json(raw_json)?;
    parse_query_plan(dialect, query, &raw, options)
}

/// Reads plan JSON text, taking bare `NaN` and `Infinity` tokens as null
///
/// Umbra prints unknown estimates as non-finite numbers.
pub fn read_plan_json(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(&replace_non_finite(text))?)
}

const NON_FINITE_TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

fn replace_non_finite(text: &str) -> Cow<'_, str> {
    if !NON_FINITE_TOKENS.iter().any(|token| text.contains(token)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE_TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests;
