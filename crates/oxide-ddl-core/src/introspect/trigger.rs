//! Oracle insert trigger lookup.

use super::{CatalogConnection, first_value, query};
use crate::dialect::{Dialect, DialectKind};
use crate::error::{DdlError, Result};
use crate::naming::validate_table_name;

/// Returns the catalog query listing the insert triggers of `table`.
///
/// # Errors
///
/// Fails on any dialect other than Oracle, or when `table` is invalid.
pub fn trigger_query(dialect: &Dialect, table: &str) -> Result<String> {
    if dialect.kind() != DialectKind::Oracle {
        return Err(DdlError::invalid_state(format!(
            "Triggers are only looked up on oracle, not on {}",
            dialect.kind()
        )));
    }
    let table = validate_table_name(table, dialect.naming_limits())?;
    Ok(format!(
        "SELECT trigger_name FROM user_triggers WHERE table_name = UPPER('{table}') AND triggering_event = 'INSERT'"
    ))
}

/// Finds the insert trigger of `table`. Absence is not an error: the caller
/// decides whether it matters.
///
/// # Errors
///
/// As [`trigger_query`], or when the catalog query fails.
pub async fn find_trigger_name<C: CatalogConnection>(
    dialect: &Dialect,
    conn: &C,
    table: &str,
) -> Result<Option<String>> {
    let sql = trigger_query(dialect, table)?;
    Ok(first_value(query(conn, &sql).await?))
}
