//! Canonical Operator Model
//!
//! Every vendor names its physical operators differently. This module defines
//! the closed set of canonical operators plans are translated into, the
//! per-dialect tables mapping native operator names onto them, and the rules
//! that derive typed operator fields from a vendor's plan object.

use crate::dialect::Dialect;
use crate::error::{PlanError, Result};
use crate::fragment::Fragment;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type of a canonical plan operator
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
    strum::IntoStaticStr,
)]
pub enum OperatorType {
    // Top level operator, added by the parser
    Result,

    // Scans
    TableScan,
    InlineTable,
    Temp,
    PipelineBreakerScan,

    // Basic operators
    Select,
    Map,
    Sort,
    GroupBy,
    Join,

    // Advanced operators
    GroupJoin,
    EarlyProbe,
    SetOperation,
    Window,

    // Recursion
    Iteration,
    IterationScan,

    // Table functions
    ArrayUnnest,
    RegexSplit,

    // Correlation
    Subquery,

    CustomOperator,
}

impl OperatorType {
    /// Returns the label used when encoding this operator
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Logical join kind after canonicalization
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
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JoinKind {
    Inner,
    FullOuter,
    LeftOuter,
    RightOuter,
    LeftSemi,
    RightSemi,
    LeftAnti,
    RightAnti,
    LeftMark,
    RightMark,
    /// DuckDB's scalar-subquery join, which has no sided counterpart
    Single,
}

const UMBRA_JOIN_KINDS: &[(&str, JoinKind)] = &[
    ("inner", JoinKind::Inner),
    ("fullouter", JoinKind::FullOuter),
    ("leftouter", JoinKind::LeftOuter),
    ("rightouter", JoinKind::RightOuter),
    ("leftsemi", JoinKind::LeftSemi),
    ("rightsemi", JoinKind::RightSemi),
    ("leftanti", JoinKind::LeftAnti),
    ("rightanti", JoinKind::RightAnti),
    ("leftmark", JoinKind::LeftMark),
    ("rightmark", JoinKind::RightMark),
];

const HYPER_JOIN_KINDS: &[(&str, JoinKind)] = &[
    ("join", JoinKind::Inner),
    ("fullouterjoin", JoinKind::FullOuter),
    ("leftouterjoin", JoinKind::LeftOuter),
    ("rightouterjoin", JoinKind::RightOuter),
    ("leftsemijoin", JoinKind::LeftSemi),
    ("rightsemijoin", JoinKind::RightSemi),
    ("leftantijoin", JoinKind::LeftAnti),
    ("rightantijoin", JoinKind::RightAnti),
    ("leftmarkjoin", JoinKind::LeftMark),
    ("rightmarkjoin", JoinKind::RightMark),
];

const POSTGRES_JOIN_KINDS: &[(&str, JoinKind)] = &[
    ("Inner", JoinKind::Inner),
    ("Left", JoinKind::LeftOuter),
    ("Right", JoinKind::RightOuter),
    ("Full", JoinKind::FullOuter),
    ("Semi", JoinKind::LeftSemi),
    ("Anti", JoinKind::LeftAnti),
    ("Right Semi", JoinKind::RightSemi),
    ("Right Anti", JoinKind::RightAnti),
];

// DuckDB swaps join inputs, so every sided kind flips. Unsided mark, semi and
// anti joins refer to DuckDB's left input, which becomes the right one.
const DUCKDB_JOIN_KINDS: &[(&str, JoinKind)] = &[
    ("inner", JoinKind::Inner),
    ("single", JoinKind::Single),
    ("right", JoinKind::LeftOuter),
    ("left", JoinKind::RightOuter),
    ("full", JoinKind::FullOuter),
    ("outer", JoinKind::FullOuter),
    ("right_semi", JoinKind::LeftSemi),
    ("left_semi", JoinKind::RightSemi),
    ("right_anti", JoinKind::LeftAnti),
    ("left_anti", JoinKind::RightAnti),
    ("mark", JoinKind::RightMark),
    ("semi", JoinKind::RightSemi),
    ("anti", JoinKind::RightAnti),
];

impl JoinKind {
    /// Canonicalizes a native join kind
    ///
    /// DuckDB spellings are matched case-insensitively; every other dialect
    /// must use its exact spelling.
    pub fn from_native(dialect: Dialect, native: &str) -> Result<Self> {
        let (table, key) = match dialect {
            Dialect::Umbra => (UMBRA_JOIN_KINDS, native.to_string()),
            Dialect::Hyper => (HYPER_JOIN_KINDS, native.to_string()),
            Dialect::Postgres => (POSTGRES_JOIN_KINDS, native.to_string()),
            Dialect::DuckDb => (DUCKDB_JOIN_KINDS, native.to_lowercase()),
        };
        table
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| PlanError::UnrecognizedJoinType {
                dialect,
                value: native.to_string(),
            })
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Whether a join's children already follow the canonical left/right order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChildOrder {
    #[default]
    Canonical,
    /// Build and probe sides are stored in reverse
    Reversed,
}

/// Type-specific operator payload
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorKind {
    Result,
    TableScan {
        table_name: Option<String>,
        table_size: Option<u64>,
        scan_type: Option<String>,
    },
    InlineTable,
    Temp,
    PipelineBreakerScan {
        scanned_id: Option<i64>,
    },
    Select,
    Map,
    Sort {
        limit: Option<u64>,
    },
    GroupBy {
        method: Option<String>,
    },
    Join {
        join_type: Option<JoinKind>,
        method: Option<String>,
        child_order: ChildOrder,
    },
    GroupJoin {
        behavior: Option<String>,
        method: Option<String>,
    },
    EarlyProbe {
        source: Option<String>,
    },
    SetOperation {
        operation: Option<String>,
    },
    Window,
    Iteration,
    IterationScan,
    ArrayUnnest,
    RegexSplit,
    Subquery,
    Custom {
        name: String,
    },
}

impl OperatorKind {
    /// Creates an unfilled payload for a canonical operator type
    ///
    /// Custom operators carry a name and are built with
    /// [`OperatorKind::custom`] instead.
    pub fn empty(operator_type: OperatorType) -> Self {
        match operator_type {
            OperatorType::Result => Self::Result,
            OperatorType::TableScan => Self::TableScan {
                table_name: None,
                table_size: None,
                scan_type: None,
            },
            OperatorType::InlineTable => Self::InlineTable,
            OperatorType::Temp => Self::Temp,
            OperatorType::PipelineBreakerScan => Self::PipelineBreakerScan { scanned_id: None },
            OperatorType::Select => Self::Select,
            OperatorType::Map => Self::Map,
            OperatorType::Sort => Self::Sort { limit: None },
            OperatorType::GroupBy => Self::GroupBy { method: None },
            OperatorType::Join => Self::Join {
                join_type: None,
                method: None,
                child_order: ChildOrder::Canonical,
            },
            OperatorType::GroupJoin => Self::GroupJoin {
                behavior: None,
                method: None,
            },
            OperatorType::EarlyProbe => Self::EarlyProbe { source: None },
            OperatorType::SetOperation => Self::SetOperation { operation: None },
            OperatorType::Window => Self::Window,
            OperatorType::Iteration => Self::Iteration,
            OperatorType::IterationScan => Self::IterationScan,
            OperatorType::ArrayUnnest => Self::ArrayUnnest,
            OperatorType::RegexSplit => Self::RegexSplit,
            OperatorType::Subquery => Self::Subquery,
            OperatorType::CustomOperator => Self::custom("Custom"),
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom { name: name.into() }
    }

    pub fn operator_type(&self) -> OperatorType {
        match self {
            Self::Result => OperatorType::Result,
            Self::TableScan { .. } => OperatorType::TableScan,
            Self::InlineTable => OperatorType::InlineTable,
            Self::Temp => OperatorType::Temp,
            Self::PipelineBreakerScan { .. } => OperatorType::PipelineBreakerScan,
            Self::Select => OperatorType::Select,
            Self::Map => OperatorType::Map,
            Self::Sort { .. } => OperatorType::Sort,
            Self::GroupBy { .. } => OperatorType::GroupBy,
            Self::Join { .. } => OperatorType::Join,
            Self::GroupJoin { .. } => OperatorType::GroupJoin,
            Self::EarlyProbe { .. } => OperatorType::EarlyProbe,
            Self::SetOperation { .. } => OperatorType::SetOperation,
            Self::Window => OperatorType::Window,
            Self::Iteration => OperatorType::Iteration,
            Self::IterationScan => OperatorType::IterationScan,
            Self::ArrayUnnest => OperatorType::ArrayUnnest,
            Self::RegexSplit => OperatorType::RegexSplit,
            Self::Subquery => OperatorType::Subquery,
            Self::Custom { .. } => OperatorType::CustomOperator,
        }
    }
}

/// One relational step of a canonical plan
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Vendor-assigned or synthesized operator id
    pub id: i64,
    pub kind: OperatorKind,
}

/// Operator id of the synthetic root every canonical plan starts with
pub const RESULT_OPERATOR_ID: i64 = -1;

impl Operator {
    pub fn new(id: i64, kind: OperatorKind) -> Self {
        Self { id, kind }
    }

    /// Creates the synthetic root operator
    pub fn result() -> Self {
        Self::new(RESULT_OPERATOR_ID, OperatorKind::Result)
    }

    pub fn custom(id: i64, name: impl Into<String>) -> Self {
        Self::new(id, OperatorKind::custom(name))
    }

    pub fn operator_type(&self) -> OperatorType {
        self.kind.operator_type()
    }

    /// Returns the name of a custom operator
    pub fn custom_name(&self) -> Option<&str> {
        match &self.kind {
            OperatorKind::Custom { name } => Some(name),
            _ => None,
        }
    }

    /// Returns the id of the shared subtree a pipeline breaker scan reads
    pub fn scanned_id(&self) -> Option<i64> {
        match self.kind {
            OperatorKind::PipelineBreakerScan { scanned_id } => scanned_id,
            _ => None,
        }
    }

    /// Returns the physical join method, if this is a join
    pub fn join_method(&self) -> Option<&str> {
        match &self.kind {
            OperatorKind::Join { method, .. } => method.as_deref(),
            _ => None,
        }
    }

    /// Returns the operator-specific attributes in encoding order
    ///
    /// Absent fields are skipped.
    pub fn attributes(&self) -> Vec<(&'static str, Value)> {
        let mut attrs = Vec::new();
        let mut push = |key: &'static str, value: Option<Value>| {
            if let Some(value) = value {
                attrs.push((key, value));
            }
        };
        let text = |s: &Option<String>| s.as_ref().map(|s| Value::from(s.as_str()));

        match &self.kind {
            OperatorKind::TableScan {
                table_name,
                table_size,
                scan_type,
            } => {
                push("table_name", text(table_name));
                push("table_size", table_size.map(Value::from));
                push("type", text(scan_type));
            }
            OperatorKind::PipelineBreakerScan { scanned_id } => {
                push("scanned_id", scanned_id.map(Value::from));
            }
            OperatorKind::Sort { limit } => push("limit", limit.map(Value::from)),
            OperatorKind::GroupBy { method } => push("method", text(method)),
            OperatorKind::Join {
                join_type, method, ..
            } => {
                push("type", join_type.map(|kind| Value::from(kind.as_str())));
                push("method", text(method));
            }
            OperatorKind::GroupJoin { behavior, method } => {
                push("type", text(behavior));
                push("method", text(method));
            }
            OperatorKind::EarlyProbe { source } => push("source", text(source)),
            OperatorKind::SetOperation { operation } => push("type", text(operation)),
            OperatorKind::Custom { name } => push("name", Some(Value::from(name.as_str()))),
            OperatorKind::Result
            | OperatorKind::InlineTable
            | OperatorKind::Temp
            | OperatorKind::Select
            | OperatorKind::Map
            | OperatorKind::Window
            | OperatorKind::Iteration
            | OperatorKind::IterationScan
            | OperatorKind::ArrayUnnest
            | OperatorKind::RegexSplit
            | OperatorKind::Subquery => {}
        }
        attrs
    }

    /// Populates vendor-specific fields from the operator's plan object
    ///
    /// Fields a dialect does not report are left untouched.
    pub fn fill(&mut self, node: &Fragment<'_>) -> Result<()> {
        let dialect = node.dialect();
        match &mut self.kind {
            OperatorKind::TableScan {
                table_name,
                table_size,
                scan_type,
            } => match dialect {
                Dialect::Umbra => {
                    *table_name = Some(node.str("tablename")?.to_string());
                    *table_size = Some(node.cardinality("tableSize")?);
                }
                Dialect::Hyper => {
                    *table_name = Some(node.object("debugName")?.str("value")?.to_string());
                }
                Dialect::Postgres => {
                    let kind = match node.str("Node Type")? {
                        "Seq Scan" => Some("sequential"),
                        "Index Scan" | "Index Only Scan" => Some("index"),
                        "Bitmap Heap Scan" => Some("bitmap"),
                        other => {
                            tracing::warn!(node_type = other, "table scan without a relation");
                            None
                        }
                    };
                    if let Some(kind) = kind {
                        *table_name = Some(node.str("Relation Name")?.to_string());
                        *scan_type = Some(kind.to_string());
                    }
                }
                Dialect::DuckDb => {
                    if let Some(extra) = node.structured("extra_info") {
                        *table_name = match extra.opt_str("Table")? {
                            Some(table) => Some(table.to_string()),
                            None => extra.opt_str("Text")?.map(str::to_string),
                        };
                    }
                }
            },
            OperatorKind::PipelineBreakerScan { scanned_id } => match dialect {
                Dialect::Umbra => *scanned_id = Some(node.i64("scannedOperator")?),
                Dialect::Hyper => {
                    let input = node.required("input")?;
                    *scanned_id = Some(match input.as_i64() {
                        Some(id) => id,
                        None => node.object("input")?.i64("operatorId")?,
                    });
                }
                // PostgreSQL scans are resolved by CTE name while parsing
                Dialect::Postgres | Dialect::DuckDb => {}
            },
            OperatorKind::Sort { limit } => {
                if matches!(dialect, Dialect::Umbra | Dialect::Hyper) {
                    *limit = node.opt_cardinality("limit")?;
                }
            }
            OperatorKind::GroupBy { method } => match dialect {
                Dialect::Umbra | Dialect::Hyper => *method = Some("hash".to_string()),
                Dialect::DuckDb => {
                    if matches!(
                        node.str("operator_type")?,
                        "HASH_GROUP_BY" | "PERFECT_HASH_GROUP_BY"
                    ) {
                        *method = Some("hash".to_string());
                    }
                }
                Dialect::Postgres => {
                    *method = Some(match node.str("Node Type")? {
                        name @ ("Unique" | "Group") => name.to_string(),
                        _ => node.str("Strategy")?.to_string(),
                    });
                }
            },
            OperatorKind::Join {
                join_type,
                method,
                child_order,
            } => match dialect {
                Dialect::Umbra => {
                    *join_type = Some(JoinKind::from_native(dialect, node.str("type")?)?);
                    *method = Some(umbra_join_method(node.str("physicalOperator")?));
                }
                Dialect::Hyper => {
                    *join_type = Some(JoinKind::from_native(dialect, node.str("operator")?)?);
                    *method = Some(node.str("method")?.to_string());
                }
                Dialect::Postgres => {
                    *join_type = Some(JoinKind::from_native(dialect, node.str("Join Type")?)?);
                    *method = match node.str("Node Type")? {
                        "Merge Join" => Some("merge".to_string()),
                        "Hash Join" => Some("hash".to_string()),
                        "Nested Loop" => Some("nl".to_string()),
                        _ => None,
                    };
                }
                Dialect::DuckDb => {
                    let native = node.object("extra_info")?.str("Join Type")?;
                    *join_type = Some(JoinKind::from_native(dialect, native)?);
                    *method = Some(duckdb_join_method(node.str("operator_type")?));
                    *child_order = ChildOrder::Reversed;
                }
            },
            OperatorKind::GroupJoin { behavior, method } => match dialect {
                Dialect::Umbra => {
                    *behavior = node.tag("behavior")?;
                    *method = Some(node.str("physicalOperator")?.replace("groupjoin", ""));
                }
                Dialect::Hyper => *behavior = node.tag("semantic")?,
                Dialect::Postgres | Dialect::DuckDb => {}
            },
            OperatorKind::EarlyProbe { source } => match dialect {
                Dialect::Umbra => *source = node.tag("source")?,
                Dialect::Hyper => *source = node.tag("builder")?,
                Dialect::Postgres | Dialect::DuckDb => {}
            },
            OperatorKind::SetOperation { operation } => match dialect {
                Dialect::Umbra => *operation = Some(node.str("operation")?.to_string()),
                Dialect::Hyper => *operation = Some(node.str("operator")?.to_string()),
                Dialect::DuckDb => {
                    if node.str("operator_type")? == "UNION" {
                        *operation = Some("unionall".to_string());
                    }
                }
                Dialect::Postgres => {}
            },
            OperatorKind::Result
            | OperatorKind::InlineTable
            | OperatorKind::Temp
            | OperatorKind::Select
            | OperatorKind::Map
            | OperatorKind::Window
            | OperatorKind::Iteration
            | OperatorKind::IterationScan
            | OperatorKind::ArrayUnnest
            | OperatorKind::RegexSplit
            | OperatorKind::Subquery
            | OperatorKind::Custom { .. } => {}
        }
        Ok(())
    }
}

fn umbra_join_method(physical_operator: &str) -> String {
    match physical_operator {
        "hashjoin" => "hash".to_string(),
        "indexnljoin" => "index".to_string(),
        "bnljoin" => "nl".to_string(),
        other => other.replace("join", ""),
    }
}

fn duckdb_join_method(operator_type: &str) -> String {
    let name = operator_type
        .strip_suffix("_JOIN")
        .unwrap_or(operator_type)
        .to_lowercase();
    match name.as_str() {
        "piecewise_merge" => "merge".to_string(),
        "nested_loop" | "blockwise_nl" => "nl".to_string(),
        _ => name,
    }
}

/// Blueprint a native operator name maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorTemplate {
    Canonical(OperatorType),
    Custom(&'static str),
}

impl OperatorTemplate {
    /// Creates an unfilled operator from this template
    pub fn instantiate(&self, id: i64) -> Operator {
        match self {
            Self::Canonical(operator_type) => Operator::new(id, OperatorKind::empty(*operator_type)),
            Self::Custom(name) => Operator::custom(id, *name),
        }
    }

    /// Returns true if `operator` was created from this template
    pub fn matches(&self, operator: &Operator) -> bool {
        match self {
            Self::Canonical(operator_type) => operator.operator_type() == *operator_type,
            Self::Custom(name) => operator.custom_name() == Some(*name),
        }
    }

    pub fn operator_type(&self) -> OperatorType {
        match self {
            Self::Canonical(operator_type) => *operator_type,
            Self::Custom(_) => OperatorType::CustomOperator,
        }
    }
}

use OperatorTemplate::{Canonical as C, Custom as X};

const UMBRA_OPERATORS: &[(&str, OperatorTemplate)] = &[
    ("tablescan", C(OperatorType::TableScan)),
    ("inlinetable", C(OperatorType::InlineTable)),
    ("sort", C(OperatorType::Sort)),
    ("join", C(OperatorType::Join)),
    ("groupjoin", C(OperatorType::GroupJoin)),
    ("groupby", C(OperatorType::GroupBy)),
    ("map", C(OperatorType::Map)),
    ("select", C(OperatorType::Select)),
    ("pipelinebreakerscan", C(OperatorType::PipelineBreakerScan)),
    ("tempscan", C(OperatorType::PipelineBreakerScan)),
    ("temp", C(OperatorType::Temp)),
    ("earlyprobe", C(OperatorType::EarlyProbe)),
    ("setoperation", C(OperatorType::SetOperation)),
    ("assertsingle", X("AssertSingle")),
    ("window", C(OperatorType::Window)),
    ("multiwayjoin", X("MultiwayJoin")),
    ("earlyexecution", X("EarlyExecution")),
    ("iteration", C(OperatorType::Iteration)),
    ("iterationincrementscan", C(OperatorType::IterationScan)),
    ("arrayunnest", C(OperatorType::ArrayUnnest)),
    ("regexsplit", C(OperatorType::RegexSplit)),
];

const HYPER_OPERATORS: &[(&str, OperatorTemplate)] = &[
    ("tablescan", C(OperatorType::TableScan)),
    ("sort", C(OperatorType::Sort)),
    ("join", C(OperatorType::Join)),
    ("fullouterjoin", C(OperatorType::Join)),
    ("leftsemijoin", C(OperatorType::Join)),
    ("leftouterjoin", C(OperatorType::Join)),
    ("leftantijoin", C(OperatorType::Join)),
    ("leftmarkjoin", C(OperatorType::Join)),
    ("rightsemijoin", C(OperatorType::Join)),
    ("rightouterjoin", C(OperatorType::Join)),
    ("rightantijoin", C(OperatorType::Join)),
    ("rightmarkjoin", C(OperatorType::Join)),
    ("groupjoin", C(OperatorType::GroupJoin)),
    ("groupby", C(OperatorType::GroupBy)),
    ("map", C(OperatorType::Map)),
    ("earlyprobe", C(OperatorType::EarlyProbe)),
    ("union", C(OperatorType::SetOperation)),
    ("intersect", C(OperatorType::SetOperation)),
    ("except", C(OperatorType::SetOperation)),
    ("unionall", C(OperatorType::SetOperation)),
    ("intersectall", C(OperatorType::SetOperation)),
    ("exceptall", C(OperatorType::SetOperation)),
    ("window", C(OperatorType::Window)),
    ("explicitscan", C(OperatorType::PipelineBreakerScan)),
    ("select", C(OperatorType::Select)),
    ("assertsingle", X("AssertSingle")),
    ("temp", C(OperatorType::Temp)),
];

const POSTGRES_OPERATORS: &[(&str, OperatorTemplate)] = &[
    ("Aggregate", C(OperatorType::GroupBy)),
    ("Unique", C(OperatorType::GroupBy)),
    ("Group", C(OperatorType::GroupBy)),
    ("Gather", X("Gather")),
    ("Gather Merge", X("Gather")),
    ("Append", X("Append")),
    ("Merge Append", X("Append")),
    ("Sort", C(OperatorType::Sort)),
    ("Incremental Sort", C(OperatorType::Sort)),
    ("Seq Scan", C(OperatorType::TableScan)),
    ("Index Scan", C(OperatorType::TableScan)),
    ("Index Only Scan", C(OperatorType::TableScan)),
    ("Bitmap Heap Scan", C(OperatorType::TableScan)),
    ("Bitmap Index Scan", C(OperatorType::TableScan)),
    ("Limit", X("Limit")),
    ("Hash Join", C(OperatorType::Join)),
    ("Merge Join", C(OperatorType::Join)),
    ("Nested Loop", C(OperatorType::Join)),
    ("Hash", X("Hash")),
    ("Materialize", X("Materialize")),
    ("WindowAgg", C(OperatorType::Window)),
    ("Result", C(OperatorType::Map)),
    ("Recursive Union", C(OperatorType::Iteration)),
    ("WorkTable Scan", C(OperatorType::IterationScan)),
    ("Subquery Scan", C(OperatorType::Subquery)),
    ("CTE Scan", C(OperatorType::PipelineBreakerScan)),
    ("Memoize", X("Memoize")),
    ("SetOp", C(OperatorType::SetOperation)),
    ("ProjectSet", X("ProjectSet")),
    ("Function Scan", X("Function Scan")),
    ("Values Scan", X("Values Scan")),
    ("BitmapOr", X("BitmapOr")),
    ("BitmapAnd", X("BitmapAnd")),
];

const DUCKDB_OPERATORS: &[(&str, OperatorTemplate)] = &[
    ("ORDER_BY", C(OperatorType::Sort)),
    ("HASH_GROUP_BY", C(OperatorType::GroupBy)),
    ("PERFECT_HASH_GROUP_BY", C(OperatorType::GroupBy)),
    ("SIMPLE_AGGREGATE", C(OperatorType::GroupBy)),
    ("UNGROUPED_AGGREGATE", C(OperatorType::GroupBy)),
    ("PROJECTION", X("Projection")),
    ("COLUMN_DATA_SCAN", C(OperatorType::InlineTable)),
    ("DUMMY_SCAN", C(OperatorType::InlineTable)),
    ("TABLE_SCAN", C(OperatorType::TableScan)),
    ("DELIM_SCAN", C(OperatorType::TableScan)),
    ("HASH_JOIN", C(OperatorType::Join)),
    ("PIECEWISE_MERGE_JOIN", C(OperatorType::Join)),
    ("NESTED_LOOP_JOIN", C(OperatorType::Join)),
    ("BLOCKWISE_NL_JOIN", C(OperatorType::Join)),
    ("INDEX_JOIN", C(OperatorType::Join)),
    ("DELIM_JOIN", C(OperatorType::Join)),
    ("LEFT_DELIM_JOIN", C(OperatorType::Join)),
    ("RIGHT_DELIM_JOIN", C(OperatorType::Join)),
    ("ASOF_JOIN", C(OperatorType::Join)),
    ("IE_JOIN", C(OperatorType::Join)),
    ("POSITIONAL_JOIN", C(OperatorType::Join)),
    ("TOP_N", X("TopN")),
    ("FILTER", C(OperatorType::Select)),
    ("LIMIT", X("Limit")),
    ("STREAMING_LIMIT", X("Limit")),
    ("EMPTY_RESULT", X("EmptyResult")),
    ("UNION", C(OperatorType::SetOperation)),
    ("CROSS_PRODUCT", X("CrossProduct")),
    ("WINDOW", C(OperatorType::Window)),
    ("STREAMING_WINDOW", C(OperatorType::Window)),
    ("CTE", C(OperatorType::Temp)),
    ("CTE_SCAN", C(OperatorType::PipelineBreakerScan)),
    ("RECURSIVE_CTE", C(OperatorType::Iteration)),
    ("RECURSIVE_CTE_SCAN", C(OperatorType::IterationScan)),
    ("UNNEST", C(OperatorType::ArrayUnnest)),
    ("INOUT_FUNCTION", X("INOUT_FUNCTION")),
];

/// Returns the native operator names a dialect can translate
pub fn vocabulary(dialect: Dialect) -> &'static [(&'static str, OperatorTemplate)] {
    match dialect {
        Dialect::Umbra => UMBRA_OPERATORS,
        Dialect::Hyper => HYPER_OPERATORS,
        Dialect::Postgres => POSTGRES_OPERATORS,
        Dialect::DuckDb => DUCKDB_OPERATORS,
    }
}

/// Creates an unfilled operator for a native operator name
///
/// Names missing from the dialect's vocabulary are rejected rather than
/// guessed at.
pub fn create_operator(dialect: Dialect, native_name: &str, id: i64) -> Result<Operator> {
    vocabulary(dialect)
        .iter()
        .find(|(name, _)| *name == native_name)
        .map(|(_, template)| template.instantiate(id))
        .ok_or_else(|| PlanError::UnrecognizedOperator {
            dialect,
            name: native_name.to_string(),
        })
}
