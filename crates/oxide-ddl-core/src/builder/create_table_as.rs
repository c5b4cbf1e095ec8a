//! CREATE TABLE ... AS SELECT, copying columns from another table.

use tracing::debug;

use super::{AlterColumnsBuilder, require_columns};
use crate::column::ColumnDef;
use crate::dialect::{Dialect, DialectKind};
use crate::error::Result;
use crate::naming::{validate_column_name, validate_table_name};

#[derive(Debug, Clone)]
enum SelectedColumn {
    /// Copied as is.
    Plain(String),
    /// Copied from `cast_from`, converted to the type of `target`.
    Cast { target: ColumnDef, cast_from: String },
}

impl SelectedColumn {
    fn name(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::Cast { target, .. } => target.name(),
        }
    }
}

/// Creates a table from a selection of columns of another table.
///
/// Cast columns declared NOT NULL are tightened afterwards with the
/// statements of [`AlterColumnsBuilder`], since a `SELECT` cannot carry the
/// constraint itself.
#[derive(Debug, Clone)]
pub struct CreateTableAsSelectBuilder {
    dialect: Dialect,
    table: String,
    from_table: String,
    columns: Vec<SelectedColumn>,
}

impl CreateTableAsSelectBuilder {
    /// Starts a copy of `from_table` into the new table `table`.
    ///
    /// # Errors
    ///
    /// Fails when a table name is invalid.
    pub fn new(dialect: &Dialect, table: &str, from_table: &str) -> Result<Self> {
        let limits = dialect.naming_limits();
        Ok(Self {
            dialect: *dialect,
            table: validate_table_name(table, limits)?,
            from_table: validate_table_name(from_table, limits)?,
            columns: Vec::new(),
        })
    }

    /// Copies a column unchanged.
    #[must_use]
    pub fn add_column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(SelectedColumn::Plain(column.into()));
        self
    }

    /// Copies `cast_from` into a column described by `target`.
    #[must_use]
    pub fn add_column_with_cast(mut self, target: ColumnDef, cast_from: impl Into<String>) -> Self {
        self.columns.push(SelectedColumn::Cast {
            target,
            cast_from: cast_from.into(),
        });
        self
    }

    /// Builds the statements.
    ///
    /// # Errors
    ///
    /// Fails when no column was selected, when a column name is invalid, or
    /// when a NOT NULL cast column carries a default value.
    pub fn build(&self) -> Result<Vec<String>> {
        require_columns(&self.columns)?;
        let limits = self.dialect.naming_limits();
        for column in &self.columns {
            validate_column_name(column.name(), limits)?;
            if let SelectedColumn::Cast { cast_from, .. } = column {
                validate_column_name(cast_from, limits)?;
            }
        }

        let mut statements = vec![self.create_statement()];
        for column in &self.columns {
            if let SelectedColumn::Cast { target, .. } = column {
                if !target.is_nullable() {
                    statements.extend(
                        AlterColumnsBuilder::new(&self.dialect, &self.table)?
                            .update_column(target.clone())
                            .build()?,
                    );
                }
            }
        }

        debug!(
            table = %self.table,
            from = %self.from_table,
            statements = statements.len(),
            "Built CREATE TABLE AS SELECT"
        );
        Ok(statements)
    }

    fn create_statement(&self) -> String {
        // Without a column list (MySQL, SQL Server) a cast needs an alias to
        // name the new column.
        let aliased = matches!(self.dialect.kind(), DialectKind::MySql | DialectKind::MsSql);
        let expressions: Vec<String> = self
            .columns
            .iter()
            .map(|column| match column {
                SelectedColumn::Plain(name) => name.clone(),
                SelectedColumn::Cast { target, cast_from } => {
                    let cast = format!("CAST({cast_from} AS {})", self.dialect.render_type(target));
                    if aliased {
                        format!("{cast} AS {}", target.name())
                    } else {
                        cast
                    }
                }
            })
            .collect();
        let expressions = expressions.join(", ");

        match self.dialect.kind() {
            DialectKind::MsSql => format!(
                "SELECT {expressions} INTO {} FROM {}",
                self.table, self.from_table
            ),
            DialectKind::MySql => format!(
                "CREATE TABLE {} AS (SELECT {expressions} FROM {})",
                self.table, self.from_table
            ),
            DialectKind::H2 | DialectKind::Oracle | DialectKind::PostgreSql => {
                let names: Vec<&str> = self.columns.iter().map(SelectedColumn::name).collect();
                format!(
                    "CREATE TABLE {} ({}) AS (SELECT {expressions} FROM {})",
                    self.table,
                    names.join(", "),
                    self.from_table
                )
            }
        }
    }
}
