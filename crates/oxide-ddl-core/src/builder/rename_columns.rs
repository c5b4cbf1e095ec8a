//! Column renames.

use tracing::debug;

use super::{reject_default, require_columns, validate_defs};
use crate::column::ColumnDef;
use crate::dialect::{Dialect, DialectKind, nullability};
use crate::error::{DdlError, Result};
use crate::naming::{validate_column_name, validate_table_name};

#[derive(Debug, Clone)]
struct Rename {
    old_name: String,
    new_column: ColumnDef,
}

/// Renames columns, one statement per rename.
///
/// The new column is given as a full definition because MySQL restates the
/// column type when renaming.
#[derive(Debug, Clone)]
pub struct RenameColumnsBuilder {
    dialect: Dialect,
    table: String,
    renames: Vec<Rename>,
}

impl RenameColumnsBuilder {
    /// Starts renaming columns of `table`.
    ///
    /// # Errors
    ///
    /// Fails when `table` is not a valid table name.
    pub fn new(dialect: &Dialect, table: &str) -> Result<Self> {
        Ok(Self {
            dialect: *dialect,
            table: validate_table_name(table, dialect.naming_limits())?,
            renames: Vec::new(),
        })
    }

    /// Renames `old_name` to the name of `new_column`.
    #[must_use]
    pub fn rename_column(mut self, old_name: impl Into<String>, new_column: ColumnDef) -> Self {
        self.renames.push(Rename {
            old_name: old_name.into(),
            new_column,
        });
        self
    }

    /// Builds the statements.
    ///
    /// # Errors
    ///
    /// Fails when nothing is renamed, when an old or new name is invalid for
    /// the dialect, when old and new names are equal, or when a new column
    /// has a default value.
    pub fn build(&self) -> Result<Vec<String>> {
        require_columns(&self.renames)?;
        let statements = self
            .renames
            .iter()
            .map(|rename| self.rename_statement(rename))
            .collect::<Result<Vec<_>>>()?;
        debug!(table = %self.table, statements = statements.len(), "Built RENAME COLUMNS");
        Ok(statements)
    }

    fn rename_statement(&self, rename: &Rename) -> Result<String> {
        let old = validate_column_name(&rename.old_name, self.dialect.naming_limits())?;
        let new = &rename.new_column;
        validate_defs(&self.dialect, [new])?;
        if old == new.name() {
            return Err(DdlError::invalid_argument("Column names must be different"));
        }
        reject_default(new)?;

        let table = &self.table;
        Ok(match self.dialect.kind() {
            DialectKind::H2 => {
                format!("ALTER TABLE {table} ALTER COLUMN {old} RENAME TO {}", new.name())
            }
            DialectKind::PostgreSql | DialectKind::Oracle => {
                format!("ALTER TABLE {table} RENAME COLUMN {old} TO {}", new.name())
            }
            DialectKind::MsSql => {
                format!("EXEC sp_rename '{table}.{old}', '{}', 'COLUMN'", new.name())
            }
            DialectKind::MySql => format!(
                "ALTER TABLE {table} CHANGE {old} {} {}{}",
                new.name(),
                self.dialect.render_type(new),
                nullability(new)
            ),
        })
    }
}
