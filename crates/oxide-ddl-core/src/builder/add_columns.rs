//! ALTER TABLE ... ADD for several columns at once.

use tracing::debug;

use super::{require_columns, validate_defs};
use crate::column::ColumnDef;
use crate::dialect::{Dialect, DialectKind};
use crate::error::Result;
use crate::naming::validate_table_name;

/// Adds columns to an existing table in a single statement.
///
/// Default values are allowed: new columns are part of the schema creation
/// path.
#[derive(Debug, Clone)]
pub struct AddColumnsBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<ColumnDef>,
}

impl AddColumnsBuilder {
    /// Starts adding columns to `table`.
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

    /// Adds a column.
    #[must_use]
    pub fn add_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Builds the statement.
    ///
    /// # Errors
    ///
    /// Fails when no column was added or when a column name exceeds the
    /// dialect's limits.
    pub fn build(&self) -> Result<Vec<String>> {
        require_columns(&self.columns)?;
        validate_defs(&self.dialect, &self.columns)?;
        let clauses: Vec<String> = self
            .columns
            .iter()
            .map(|c| self.dialect.column_clause(c))
            .collect();

        let sql = match self.dialect.kind() {
            DialectKind::PostgreSql => format!(
                "ALTER TABLE {} ADD COLUMN {}",
                self.table,
                clauses.join(", ADD COLUMN ")
            ),
            DialectKind::MsSql => format!("ALTER TABLE {} ADD {}", self.table, clauses.join(", ")),
            DialectKind::H2 | DialectKind::Oracle | DialectKind::MySql => {
                format!("ALTER TABLE {} ADD ({})", self.table, clauses.join(", "))
            }
        };

        debug!(table = %self.table, columns = self.columns.len(), "Built ADD COLUMNS");
        Ok(vec![sql])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{big_integer, boolean, varchar};
    use crate::dialect::DbVersion;
    use crate::error::DdlError;

    fn builder(dialect: &Dialect) -> AddColumnsBuilder {
        AddColumnsBuilder::new(dialect, "issues")
            .unwrap()
            .add_column(big_integer("date_in_ms").build().unwrap())
            .add_column(varchar("name").limit(10).not_null().default_value("N").build().unwrap())
    }

    #[test]
    fn test_add_columns_postgresql() {
        let statements = builder(&Dialect::postgresql(DbVersion::new(14, 0))).build().unwrap();
        assert_eq!(
            statements,
            vec!["ALTER TABLE issues ADD COLUMN date_in_ms BIGINT NULL, ADD COLUMN name VARCHAR (10) DEFAULT 'N' NOT NULL"]
        );
    }

    #[test]
    fn test_add_columns_mssql() {
        let statements = builder(&Dialect::mssql()).build().unwrap();
        assert_eq!(
            statements,
            vec!["ALTER TABLE issues ADD date_in_ms BIGINT NULL, name NVARCHAR (10) DEFAULT 'N' NOT NULL"]
        );
    }

    #[test]
    fn test_add_columns_parenthesized() {
        assert_eq!(
            builder(&Dialect::oracle()).build().unwrap(),
            vec!["ALTER TABLE issues ADD (date_in_ms NUMBER (38) NULL, name VARCHAR2 (10 CHAR) DEFAULT 'N' NOT NULL)"]
        );
        assert_eq!(
            builder(&Dialect::h2()).build().unwrap(),
            vec!["ALTER TABLE issues ADD (date_in_ms BIGINT NULL, name VARCHAR (10) DEFAULT 'N' NOT NULL)"]
        );
    }

    #[test]
    fn test_single_boolean_column_mysql() {
        let statements = AddColumnsBuilder::new(&Dialect::mysql(), "rules")
            .unwrap()
            .add_column(boolean("enabled").not_null().default_value(true).build().unwrap())
            .build()
            .unwrap();
        assert_eq!(
            statements,
            vec!["ALTER TABLE rules ADD (enabled TINYINT(1) DEFAULT 1 NOT NULL)"]
        );
    }

    #[test]
    fn test_no_columns() {
        let err = AddColumnsBuilder::new(&Dialect::h2(), "issues")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, DdlError::InvalidState(_)));
    }
}
