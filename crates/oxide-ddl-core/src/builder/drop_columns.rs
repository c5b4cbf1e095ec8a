//! ALTER TABLE dropping columns.

use tracing::debug;

use super::require_columns;
use crate::dialect::{Dialect, DialectKind};
use crate::error::Result;
use crate::naming::{validate_column_name, validate_table_name};

/// Drops columns from a table.
///
/// On Oracle columns are only marked unused; the storage is reclaimed later
/// by the database.
#[derive(Debug, Clone)]
pub struct DropColumnsBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<String>,
}

impl DropColumnsBuilder {
    /// Starts dropping columns of `table`.
    ///
    /// # Errors
    ///
    /// Fails when `table` is not a valid table name.
    pub fn new(dialect: &Dialect, table: &str) -> Result<Self> {
        Ok(Self {
            dialect: *dialect,
            table: validate_table_name(table, dialect.naming_limits())?,
            columns: Vec::new(),
        })
    }

    /// Adds a column to drop.
    #[must_use]
    pub fn drop_column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Builds the statements. H2 cannot batch drops and gets one statement
    /// per column.
    ///
    /// # Errors
    ///
    /// Fails when no column was given or a column name is invalid.
    pub fn build(&self) -> Result<Vec<String>> {
        require_columns(&self.columns)?;
        let columns = self
            .columns
            .iter()
            .map(|c| validate_column_name(c, self.dialect.naming_limits()))
            .collect::<Result<Vec<_>>>()?;

        let statements = match self.dialect.kind() {
            DialectKind::PostgreSql | DialectKind::MySql => vec![format!(
                "ALTER TABLE {} DROP COLUMN {}",
                self.table,
                columns.join(", DROP COLUMN ")
            )],
            DialectKind::MsSql => vec![format!(
                "ALTER TABLE {} DROP COLUMN {}",
                self.table,
                columns.join(", ")
            )],
            DialectKind::Oracle => vec![format!(
                "ALTER TABLE {} SET UNUSED ({})",
                self.table,
                columns.join(", ")
            )],
            DialectKind::H2 => columns
                .iter()
                .map(|c| format!("ALTER TABLE {} DROP COLUMN {c}", self.table))
                .collect(),
        };

        debug!(table = %self.table, statements = statements.len(), "Built DROP COLUMNS");
        Ok(statements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DbVersion;
    use crate::error::DdlError;

    fn build(dialect: &Dialect) -> Vec<String> {
        DropColumnsBuilder::new(dialect, "issues")
            .unwrap()
            .drop_column("date_in_ms")
            .drop_column("name")
            .build()
            .unwrap()
    }

    #[test]
    fn test_drop_columns_per_dialect() {
        assert_eq!(
            build(&Dialect::postgresql(DbVersion::new(15, 0))),
            vec!["ALTER TABLE issues DROP COLUMN date_in_ms, DROP COLUMN name"]
        );
        assert_eq!(
            build(&Dialect::mysql()),
            vec!["ALTER TABLE issues DROP COLUMN date_in_ms, DROP COLUMN name"]
        );
        assert_eq!(
            build(&Dialect::mssql()),
            vec!["ALTER TABLE issues DROP COLUMN date_in_ms, name"]
        );
        assert_eq!(
            build(&Dialect::oracle()),
            vec!["ALTER TABLE issues SET UNUSED (date_in_ms, name)"]
        );
        assert_eq!(
            build(&Dialect::h2()),
            vec![
                "ALTER TABLE issues DROP COLUMN date_in_ms",
                "ALTER TABLE issues DROP COLUMN name",
            ]
        );
    }

    #[test]
    fn test_invalid_column_name() {
        let err = DropColumnsBuilder::new(&Dialect::h2(), "issues")
            .unwrap()
            .drop_column("Name")
            .build()
            .unwrap_err();
        assert!(matches!(err, DdlError::InvalidArgument(_)));
    }

    #[test]
    fn test_no_columns() {
        let err = DropColumnsBuilder::new(&Dialect::mssql(), "issues")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, DdlError::InvalidState(_)));
    }
}
