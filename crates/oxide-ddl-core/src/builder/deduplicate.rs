//! Removal of duplicated rows ahead of a unique constraint.

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{DdlError, Result};
use crate::naming::{validate_column_name, validate_table_name};

/// Deletes every row sharing its reference columns with a row of lower
/// identity, keeping the first one of each group.
///
/// ```rust
/// use oxide_ddl_core::builder::DeduplicateTableBuilder;
/// use oxide_ddl_core::Dialect;
///
/// let statements = DeduplicateTableBuilder::new(&Dialect::h2(), "issues")?
///     .identity_column("id")
///     .add_reference_column("kee")
///     .add_reference_column("project_uuid")
///     .build()?;
/// assert_eq!(
///     statements,
///     vec!["DELETE FROM issues WHERE id NOT IN (SELECT MIN(id) FROM issues GROUP BY kee, project_uuid)"]
/// );
/// # Ok::<(), oxide_ddl_core::DdlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeduplicateTableBuilder {
    dialect: Dialect,
    table: String,
    identity: Option<String>,
    references: Vec<String>,
}

impl DeduplicateTableBuilder {
    /// Starts deduplicating `table`.
    ///
    /// # Errors
    ///
    /// Fails when `table` is not a valid table name.
    pub fn new(dialect: &Dialect, table: &str) -> Result<Self> {
        Ok(Self {
            dialect: *dialect,
            table: validate_table_name(table, dialect.naming_limits())?,
            identity: None,
            references: Vec::new(),
        })
    }

    /// Sets the column identifying rows; the lowest value of each group is kept.
    #[must_use]
    pub fn identity_column(mut self, column: impl Into<String>) -> Self {
        self.identity = Some(column.into());
        self
    }

    /// Adds a column rows are grouped by.
    #[must_use]
    pub fn add_reference_column(mut self, column: impl Into<String>) -> Self {
        self.references.push(column.into());
        self
    }

    /// Builds the statement. The same on every dialect.
    ///
    /// # Errors
    ///
    /// Fails when the identity column is unset, when no reference column was
    /// given, or when a column name is invalid.
    pub fn build(&self) -> Result<Vec<String>> {
        let limits = self.dialect.naming_limits();
        let identity = self
            .identity
            .as_deref()
            .ok_or(DdlError::MissingValue("Identity column"))?;
        let identity = validate_column_name(identity, limits)?;
        if self.references.is_empty() {
            return Err(DdlError::invalid_argument(
                "At least one reference column must be specified",
            ));
        }
        let references = self
            .references
            .iter()
            .map(|c| validate_column_name(c, limits))
            .collect::<Result<Vec<_>>>()?;

        let sql = format!(
            "DELETE FROM {table} WHERE {identity} NOT IN (SELECT MIN({identity}) FROM {table} GROUP BY {})",
            references.join(", "),
            table = self.table,
        );
        debug!(table = %self.table, "Built DEDUPLICATE");
        Ok(vec![sql])
    }
}
