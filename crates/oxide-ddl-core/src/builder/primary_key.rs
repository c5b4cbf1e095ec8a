//! Adding and dropping primary keys.

use tracing::debug;

use super::{
    ORA_NO_SEQUENCE, ORA_NO_TRIGGER, oracle_ignoring, oracle_sequence_name, oracle_trigger_name,
    require_columns,
};
use crate::column::ColumnDef;
use crate::dialect::{Dialect, DialectKind};
use crate::error::{DdlError, Result};
use crate::naming::{PK_PREFIX, validate_column_name, validate_constraint_name, validate_table_name};

// =============================================================================
// AddPrimaryKeyBuilder
// =============================================================================

/// Adds a primary key named `pk_<table>` to an existing table.
///
/// # Example
///
/// ```rust
/// use oxide_ddl_core::builder::AddPrimaryKeyBuilder;
/// use oxide_ddl_core::Dialect;
///
/// let statements = AddPrimaryKeyBuilder::new(&Dialect::mssql(), "issues")?
///     .add_pk_column("id")
///     .build()?;
/// assert_eq!(
///     statements,
///     vec!["ALTER TABLE issues ADD CONSTRAINT pk_issues PRIMARY KEY (id)"]
/// );
/// # Ok::<(), oxide_ddl_core::DdlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AddPrimaryKeyBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<String>,
}

impl AddPrimaryKeyBuilder {
    /// Starts a primary key on `table`.
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

    /// Adds a key column. Order is preserved.
    #[must_use]
    pub fn add_pk_column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Builds the statement.
    ///
    /// # Errors
    ///
    /// Fails when no column was given or a name is invalid.
    pub fn build(&self) -> Result<Vec<String>> {
        require_columns(&self.columns)?;
        let limits = self.dialect.naming_limits();
        let columns = self
            .columns
            .iter()
            .map(|c| validate_column_name(c, limits))
            .collect::<Result<Vec<_>>>()?;
        let constraint = validate_constraint_name(&format!("{PK_PREFIX}{}", self.table), limits)?;

        let sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {constraint} PRIMARY KEY ({})",
            self.table,
            columns.join(",")
        );
        debug!(table = %self.table, constraint = %constraint, "Built ADD PRIMARY KEY");
        Ok(vec![sql])
    }
}

// =============================================================================
// DropPrimaryKeyBuilder
// =============================================================================

/// Drops the primary key of a table.
///
/// The constraint name must be the one the database actually holds, as
/// returned by [`primary_key::constraint_name`](crate::introspect::primary_key::constraint_name);
/// it is quoted, not validated. When the key column is auto-incremented, the
/// artifacts backing it go first.
#[derive(Debug, Clone)]
pub struct DropPrimaryKeyBuilder {
    dialect: Dialect,
    table: String,
    constraint: String,
    auto_increment: Option<ColumnDef>,
    trigger_name: Option<String>,
}

impl DropPrimaryKeyBuilder {
    /// Drops the constraint `constraint` of `table`.
    ///
    /// # Errors
    ///
    /// Fails when `table` is invalid or `constraint` is empty.
    pub fn new(dialect: &Dialect, table: &str, constraint: impl Into<String>) -> Result<Self> {
        let constraint = constraint.into();
        if constraint.trim().is_empty() {
            return Err(DdlError::invalid_argument("Constraint name can't be empty"));
        }
        Ok(Self {
            dialect: *dialect,
            table: validate_table_name(table, dialect.naming_limits())?,
            constraint,
            auto_increment: None,
            trigger_name: None,
        })
    }

    /// Declares the auto-increment key column, whose sequence (and trigger on
    /// Oracle) must be removed with the key.
    #[must_use]
    pub fn auto_increment_column(mut self, column: ColumnDef) -> Self {
        self.auto_increment = Some(column);
        self
    }

    /// Oracle only: name of the insert trigger to drop, as found by
    /// [`trigger::find_trigger_name`](crate::introspect::trigger::find_trigger_name).
    /// Defaults to `<table>_idt`.
    #[must_use]
    pub fn with_trigger_name(mut self, name: impl Into<String>) -> Self {
        self.trigger_name = Some(name.into());
        self
    }

    /// Builds the statements.
    ///
    /// # Errors
    ///
    /// Fails when the auto-increment column name is invalid.
    pub fn build(&self) -> Result<Vec<String>> {
        if let Some(column) = &self.auto_increment {
            validate_column_name(column.name(), self.dialect.naming_limits())?;
        }
        let quoted = self.dialect.quote_identifier(&self.constraint);
        let mut statements = Vec::new();

        match self.dialect.kind() {
            DialectKind::H2 | DialectKind::MsSql => {
                statements.push(format!("ALTER TABLE {} DROP CONSTRAINT {quoted}", self.table));
            }
            DialectKind::PostgreSql => {
                if let Some(column) = &self.auto_increment {
                    statements.push(format!(
                        "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT",
                        self.table,
                        column.name()
                    ));
                    statements.push(format!(
                        "DROP SEQUENCE IF EXISTS {}_{}_seq",
                        self.table,
                        column.name()
                    ));
                }
                statements.push(format!("ALTER TABLE {} DROP CONSTRAINT {quoted}", self.table));
            }
            DialectKind::Oracle => {
                if self.auto_increment.is_some() {
                    let trigger = self.trigger_name.as_ref().map_or_else(
                        || oracle_trigger_name(&self.table),
                        |name| self.dialect.quote_identifier(name),
                    );
                    statements.push(oracle_ignoring(
                        &format!("DROP TRIGGER {trigger}"),
                        ORA_NO_TRIGGER,
                    ));
                    statements.push(oracle_ignoring(
                        &format!("DROP SEQUENCE {}", oracle_sequence_name(&self.table)),
                        ORA_NO_SEQUENCE,
                    ));
                }
                statements.push(format!(
                    "ALTER TABLE {} DROP CONSTRAINT {quoted} DROP INDEX",
                    self.table
                ));
            }
            DialectKind::MySql => {
                if let Some(column) = &self.auto_increment {
                    statements.push(format!(
                        "ALTER TABLE {} MODIFY {} {} NOT NULL",
                        self.table,
                        column.name(),
                        self.dialect.render_type(column)
                    ));
                }
                statements.push(format!("ALTER TABLE {} DROP PRIMARY KEY", self.table));
            }
        }

        debug!(
            table = %self.table,
            constraint = %self.constraint,
            statements = statements.len(),
            "Built DROP PRIMARY KEY"
        );
        Ok(statements)
    }
}
