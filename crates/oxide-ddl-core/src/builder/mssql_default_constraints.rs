//! Dropping SQL Server default constraints.

use tracing::debug;

use super::require_columns;
use crate::dialect::{Dialect, DialectKind};
use crate::error::{DdlError, Result};
use crate::introspect::CatalogConnection;
use crate::introspect::default_constraint::find_default_constraints;
use crate::naming::{validate_column_name, validate_table_name};

/// Drops the default constraints SQL Server attached to columns.
///
/// The constraint names are generated by the server, so they are looked up
/// first: this is the only builder that talks to the database.
#[derive(Debug, Clone)]
pub struct DropMsSqlDefaultConstraintsBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<String>,
}

impl DropMsSqlDefaultConstraintsBuilder {
    /// Starts dropping default constraints of `table`.
    ///
    /// # Errors
    ///
    /// Fails when the dialect is not SQL Server or `table` is invalid.
    pub fn new(dialect: &Dialect, table: &str) -> Result<Self> {
        if dialect.kind() != DialectKind::MsSql {
            return Err(DdlError::invalid_state(format!(
                "Default constraints are only dropped on mssql, not on {}",
                dialect.kind()
            )));
        }
        Ok(Self {
            dialect: *dialect,
            table: validate_table_name(table, dialect.naming_limits())?,
            columns: Vec::new(),
        })
    }

    /// Adds a column whose default constraint must go.
    #[must_use]
    pub fn add_column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Looks the constraints up and builds one drop per constraint found, in
    /// column order. Columns without a default produce nothing.
    ///
    /// # Errors
    ///
    /// Fails when no column was given, a column name is invalid, or the
    /// catalog query fails.
    pub async fn build<C: CatalogConnection>(&self, conn: &C) -> Result<Vec<String>> {
        require_columns(&self.columns)?;
        let limits = self.dialect.naming_limits();
        let columns = self
            .columns
            .iter()
            .map(|c| validate_column_name(c, limits))
            .collect::<Result<Vec<_>>>()?;
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();

        let statements: Vec<String> =
            find_default_constraints(&self.dialect, conn, &self.table, &columns)
                .await?
                .into_iter()
                .map(|constraint| {
                    format!(
                        "ALTER TABLE {} DROP CONSTRAINT {}",
                        self.table,
                        self.dialect.quote_identifier(&constraint.name)
                    )
                })
                .collect();

        debug!(table = %self.table, statements = statements.len(), "Built DROP DEFAULT CONSTRAINTS");
        Ok(statements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::default_constraint::default_constraints_query;
    use crate::introspect::testing::FakeCatalog;

    #[tokio::test]
    async fn test_drops_found_constraints() {
        let dialect = Dialect::mssql();
        let conn = FakeCatalog::default().with_answer(
            default_constraints_query(&dialect, "issues", &["kee", "status", "line"]).unwrap(),
            vec![
                FakeCatalog::row(&["DF__issues__status__5EBF139D", "status"]),
                FakeCatalog::row(&["DF__issues__kee__5DCAEF64", "kee"]),
            ],
        );
        let statements = DropMsSqlDefaultConstraintsBuilder::new(&dialect, "issues")
            .unwrap()
            .add_column("kee")
            .add_column("status")
            .add_column("line")
            .build(&conn)
            .await
            .unwrap();
        assert_eq!(
            statements,
            vec![
                "ALTER TABLE issues DROP CONSTRAINT [DF__issues__kee__5DCAEF64]",
                "ALTER TABLE issues DROP CONSTRAINT [DF__issues__status__5EBF139D]",
            ]
        );
    }

    #[tokio::test]
    async fn test_no_columns() {
        let err = DropMsSqlDefaultConstraintsBuilder::new(&Dialect::mssql(), "issues")
            .unwrap()
            .build(&FakeCatalog::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DdlError::InvalidState(_)));
    }

    #[test]
    fn test_rejects_other_dialects_like_the_finder() {
        for dialect in [Dialect::h2(), Dialect::oracle(), Dialect::mysql()] {
            let err = DropMsSqlDefaultConstraintsBuilder::new(&dialect, "issues").unwrap_err();
            assert!(matches!(err, DdlError::InvalidState(_)), "{dialect}");

            let err = default_constraints_query(&dialect, "issues", &["kee"]).unwrap_err();
            assert!(matches!(err, DdlError::InvalidState(_)), "{dialect}");
        }
    }
}
