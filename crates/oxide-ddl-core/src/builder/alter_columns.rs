//! ALTER TABLE changing the type or nullability of existing columns.

use tracing::debug;

use super::{reject_default, require_columns, validate_defs};
use crate::column::ColumnDef;
use crate::dialect::{Dialect, DialectKind, nullability};
use crate::error::Result;
use crate::naming::validate_table_name;

/// Changes the type and nullability of existing columns.
///
/// Default values are a creation-only concept: a column definition carrying
/// one is rejected.
#[derive(Debug, Clone)]
pub struct AlterColumnsBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<ColumnDef>,
}

impl AlterColumnsBuilder {
    /// Starts altering columns of `table`.
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

    /// Sets the new definition of a column.
    #[must_use]
    pub fn update_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Builds the statements.
    ///
    /// PostgreSQL, Oracle and MySQL alter every column in one statement; H2
    /// and SQL Server need one statement per column.
    ///
    /// # Errors
    ///
    /// Fails when no column was given, when a column name exceeds the
    /// dialect's limits, or when a column has a default value.
    pub fn build(&self) -> Result<Vec<String>> {
        require_columns(&self.columns)?;
        validate_defs(&self.dialect, &self.columns)?;
        for column in &self.columns {
            reject_default(column)?;
        }

        let statements = match self.dialect.kind() {
            DialectKind::PostgreSql => {
                let clauses: Vec<String> = self
                    .columns
                    .iter()
                    .map(|c| {
                        let not_null = if c.is_nullable() { "DROP" } else { "SET" };
                        format!(
                            "ALTER COLUMN {name} TYPE {ty}, ALTER COLUMN {name} {not_null} NOT NULL",
                            name = c.name(),
                            ty = self.dialect.render_type(c),
                        )
                    })
                    .collect();
                vec![format!("ALTER TABLE {} {}", self.table, clauses.join(", "))]
            }
            DialectKind::Oracle => vec![format!(
                "ALTER TABLE {} MODIFY ({})",
                self.table,
                self.typed_clauses().join(", ")
            )],
            DialectKind::MySql => vec![format!(
                "ALTER TABLE {} MODIFY COLUMN {}",
                self.table,
                self.typed_clauses().join(", MODIFY COLUMN ")
            )],
            DialectKind::MsSql | DialectKind::H2 => self
                .typed_clauses()
                .into_iter()
                .map(|clause| format!("ALTER TABLE {} ALTER COLUMN {clause}", self.table))
                .collect(),
        };

        debug!(
            table = %self.table,
            columns = self.columns.len(),
            statements = statements.len(),
            "Built ALTER COLUMNS"
        );
        Ok(statements)
    }

    /// `<name> <type> NULL|NOT NULL` for every column.
    fn typed_clauses(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| format!("{} {}{}", c.name(), self.dialect.render_type(c), nullability(c)))
            .collect()
    }
}
