//! SQL Server default constraint lookup.
//!
//! SQL Server attaches column defaults as constraints with generated names,
//! and refuses to drop or alter such a column until they are dropped.

use super::{CatalogConnection, query};
use crate::dialect::{Dialect, DialectKind};
use crate::error::{DdlError, Result};
use crate::naming::{validate_column_name, validate_table_name};

/// A default constraint found on a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultConstraint {
    /// Column the default applies to.
    pub column: String,
    /// Name of the constraint.
    pub name: String,
}

/// Returns the catalog query listing the default constraints of `columns`.
///
/// # Errors
///
/// Fails on any dialect other than SQL Server, when `columns` is empty, or
/// when a name is invalid.
pub fn default_constraints_query(dialect: &Dialect, table: &str, columns: &[&str]) -> Result<String> {
    if dialect.kind() != DialectKind::MsSql {
        return Err(DdlError::invalid_state(format!(
            "Default constraints are only looked up on mssql, not on {}",
            dialect.kind()
        )));
    }
    let limits = dialect.naming_limits();
    let table = validate_table_name(table, limits)?;
    if columns.is_empty() {
        return Err(DdlError::invalid_state("at least one column must be specified"));
    }
    let columns = columns
        .iter()
        .map(|c| validate_column_name(c, limits).map(|c| format!("'{c}'")))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(
        "SELECT d.name, c.name FROM sys.tables t JOIN sys.default_constraints d ON d.parent_object_id = t.object_id JOIN sys.columns c ON c.object_id = t.object_id AND c.column_id = d.parent_column_id JOIN sys.schemas s ON s.schema_id = t.schema_id WHERE t.name = '{table}' AND c.name IN ({}) AND s.name = SCHEMA_NAME()",
        columns.join(",")
    ))
}

/// Finds the default constraints of `columns` in `table`, in the order the
/// columns were given. Columns without a default are left out.
///
/// # Errors
///
/// As [`default_constraints_query`], or when the catalog query fails.
pub async fn find_default_constraints<C: CatalogConnection>(
    dialect: &Dialect,
    conn: &C,
    table: &str,
    columns: &[&str],
) -> Result<Vec<DefaultConstraint>> {
    let sql = default_constraints_query(dialect, table, columns)?;
    let mut found: Vec<DefaultConstraint> = query(conn, &sql)
        .await?
        .into_iter()
        .filter_map(|row| {
            let mut cells = row.into_iter();
            let name = cells.next().flatten()?;
            let column = cells.next().flatten()?;
            Some(DefaultConstraint { column, name })
        })
        .collect();
    found.sort_by_key(|c| {
        columns
            .iter()
            .position(|requested| requested.eq_ignore_ascii_case(&c.column))
            .unwrap_or(usize::MAX)
    });
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::testing::FakeCatalog;

    #[test]
    fn test_query() {
        let sql = default_constraints_query(&Dialect::mssql(), "issues", &["kee", "status"]).unwrap();
        assert!(sql.contains("WHERE t.name = 'issues' AND c.name IN ('kee','status')"));
    }

    #[test]
    fn test_only_on_mssql() {
        let err = default_constraints_query(&Dialect::h2(), "issues", &["kee"]).unwrap_err();
        assert!(matches!(err, DdlError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_results_follow_column_order() {
        let dialect = Dialect::mssql();
        let columns = ["status", "kee"];
        let conn = FakeCatalog::default().with_answer(
            default_constraints_query(&dialect, "issues", &columns).unwrap(),
            vec![
                FakeCatalog::row(&["DF__issues__kee__1A2B", "kee"]),
                FakeCatalog::row(&["DF__issues__status__3C4D", "status"]),
            ],
        );
        let found = find_default_constraints(&dialect, &conn, "issues", &columns)
            .await
            .unwrap();
        assert_eq!(
            found,
            vec![
                DefaultConstraint {
                    column: "status".to_string(),
                    name: "DF__issues__status__3C4D".to_string()
                },
                DefaultConstraint {
                    column: "kee".to_string(),
                    name: "DF__issues__kee__1A2B".to_string()
                },
            ]
        );
    }
}
