//! Primary key constraint name lookup.

use super::{CatalogConnection, first_value, query};
use crate::dialect::{Dialect, DialectKind};
use crate::error::{DdlError, Result};
use crate::naming::validate_table_name;

/// Returns the catalog query listing the primary key constraint of `table`.
///
/// # Errors
///
/// Fails when `table` is not a valid table name.
pub fn constraint_query(dialect: &Dialect, table: &str) -> Result<String> {
    let table = validate_table_name(table, dialect.naming_limits())?;
    Ok(match dialect.kind() {
        DialectKind::PostgreSql => format!(
            "SELECT conname FROM pg_constraint c JOIN pg_namespace n ON c.connamespace = n.oid JOIN pg_class cls ON c.conrelid = cls.oid WHERE cls.relname = '{table}' AND n.nspname = current_schema() AND c.contype = 'p'"
        ),
        DialectKind::MsSql => format!(
            "SELECT name FROM sys.key_constraints WHERE type = 'PK' AND OBJECT_NAME(parent_object_id) = '{table}'"
        ),
        DialectKind::Oracle => format!(
            "SELECT constraint_name FROM user_constraints WHERE table_name = UPPER('{table}') AND constraint_type = 'P'"
        ),
        DialectKind::H2 => format!(
            "SELECT constraint_name FROM information_schema.table_constraints WHERE table_name = '{}' AND constraint_type = 'PRIMARY KEY'",
            table.to_uppercase()
        ),
        DialectKind::MySql => format!(
            "SELECT constraint_name FROM information_schema.table_constraints WHERE table_name = '{table}' AND constraint_type = 'PRIMARY KEY' AND table_schema = DATABASE()"
        ),
    })
}

/// Looks up the name of the primary key constraint of `table`.
///
/// # Errors
///
/// Fails when `table` is invalid or the catalog query fails.
pub async fn find_constraint_name<C: CatalogConnection>(
    dialect: &Dialect,
    conn: &C,
    table: &str,
) -> Result<Option<String>> {
    let sql = constraint_query(dialect, table)?;
    Ok(first_value(query(conn, &sql).await?))
}

/// Like [`find_constraint_name`], but a table without primary key is an
/// error.
///
/// # Errors
///
/// Fails with [`DdlError::NotFound`] when the table has no primary key, and
/// as [`find_constraint_name`] otherwise.
pub async fn constraint_name<C: CatalogConnection>(
    dialect: &Dialect,
    conn: &C,
    table: &str,
) -> Result<String> {
    find_constraint_name(dialect, conn, table)
        .await?
        .ok_or_else(|| DdlError::NotFound(format!("Cannot find constraint for table '{table}'")))
}
