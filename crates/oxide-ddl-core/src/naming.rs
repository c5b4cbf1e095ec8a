//! Identifier rules shared by every statement builder.
//!
//! Table, column, index and constraint names must be valid on all supported
//! engines at once, so the rules are the intersection of what each of them
//! accepts unquoted:
//! - lower case ASCII letters, digits and `_` only
//! - must not start with a digit or `_`
//! - bounded length, per identifier kind (see [`NamingLimits`])
//!
//! Invalid names are rejected, never truncated.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Result};

static IDENTIFIER_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9_]+$").expect("identifier pattern is valid"));

/// Prefix of generated primary key constraint names (`pk_<table>`).
pub const PK_PREFIX: &str = "pk_";

/// Words no column may be named after, because at least one engine reserves them.
const RESERVED_KEYWORDS: &[&str] = &[
    "all", "alter", "and", "any", "as", "asc", "between", "by", "case", "check", "column",
    "constraint", "create", "cross", "current_date", "current_time", "current_timestamp",
    "date", "default", "delete", "desc", "distinct", "drop", "else", "end", "exists", "false",
    "fetch", "for", "foreign", "from", "full", "grant", "group", "having", "in", "index", "inner",
    "insert", "intersect", "into", "is", "join", "key", "left", "level", "like", "limit", "not",
    "null", "number", "of", "offset", "on", "or", "order", "outer", "primary", "references",
    "right", "rownum", "select", "session", "set", "size", "table", "then", "to", "true",
    "union", "unique", "update", "user", "values", "when", "where", "with",
];

/// Maximum identifier lengths, per identifier kind.
///
/// Deserializable so deployments can tighten or relax them from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingLimits {
    /// Maximum table name length.
    pub table: usize,
    /// Maximum constraint name length.
    pub constraint: usize,
    /// Maximum index name length.
    pub index: usize,
    /// Maximum column name length, unbounded when `None`.
    pub column: Option<usize>,
}

impl Default for NamingLimits {
    fn default() -> Self {
        Self {
            table: 25,
            constraint: 30,
            index: 30,
            column: None,
        }
    }
}

/// Validates a table name, returning it as an owned string.
///
/// # Errors
///
/// Fails when `name` is empty, breaks the character rules, or is longer
/// than `limits.table`.
pub fn validate_table_name(name: &str, limits: &NamingLimits) -> Result<String> {
    check_length(name, "Table name", limits.table)?;
    check_identifier_chars(name, "Table name")?;
    Ok(name.to_string())
}

/// Validates a constraint name, returning it as an owned string.
///
/// # Errors
///
/// Fails when `name` is empty, breaks the character rules, or is longer
/// than `limits.constraint`.
pub fn validate_constraint_name(name: &str, limits: &NamingLimits) -> Result<String> {
    check_length(name, "Constraint name", limits.constraint)?;
    check_identifier_chars(name, "Constraint name")?;
    Ok(name.to_string())
}

/// Validates an index name, returning it as an owned string.
///
/// # Errors
///
/// Fails when `name` is empty, breaks the character rules, or is longer
/// than `limits.index`.
pub fn validate_index_name(name: &str, limits: &NamingLimits) -> Result<String> {
    check_length(name, "Index name", limits.index)?;
    check_identifier_chars(name, "Index name")?;
    Ok(name.to_string())
}

/// Validates a column name, returning it as an owned string.
///
/// # Errors
///
/// Fails when `name` is empty, breaks the character rules, is a reserved
/// keyword, or is longer than `limits.column` when that limit is set.
pub fn validate_column_name(name: &str, limits: &NamingLimits) -> Result<String> {
    check_identifier_chars(name, "Column name")?;
    if RESERVED_KEYWORDS.contains(&name) {
        return Err(DdlError::invalid_argument(format!(
            "Column name must not be an SQL reserved keyword, got '{name}'"
        )));
    }
    if let Some(max) = limits.column {
        check_length(name, "Column name", max)?;
    }
    Ok(name.to_string())
}

fn check_length(name: &str, kind: &str, max: usize) -> Result<()> {
    if name.len() > max {
        return Err(DdlError::invalid_argument(format!(
            "{kind} length can't be more than {max}"
        )));
    }
    Ok(())
}

fn check_identifier_chars(name: &str, kind: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DdlError::invalid_argument(format!("{kind} can't be empty")));
    }
    if !IDENTIFIER_CHARS.is_match(name) {
        return Err(DdlError::invalid_argument(format!(
            "{kind} must be lower case and contain only alphanumeric chars or '_', got '{name}'"
        )));
    }
    if starts_with_digit_or_underscore(name) {
        return Err(DdlError::invalid_argument(format!(
            "{kind} must not start by a number or '_', got '{name}'"
        )));
    }
    Ok(())
}

fn starts_with_digit_or_underscore(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '_')
}
