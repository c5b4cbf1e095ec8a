//! DROP INDEX.

use tracing::debug;

use crate::dialect::{Dialect, DialectKind};
use crate::error::Result;
use crate::naming::{validate_index_name, validate_table_name};

/// Drops an index.
#[derive(Debug, Clone)]
pub struct DropIndexBuilder {
    dialect: Dialect,
    table: String,
    name: String,
}

impl DropIndexBuilder {
    /// Drops the index `name` of `table`.
    ///
    /// # Errors
    ///
    /// Fails when the table or index name is invalid.
    pub fn new(dialect: &Dialect, table: &str, name: &str) -> Result<Self> {
        let limits = dialect.naming_limits();
        Ok(Self {
            dialect: *dialect,
            table: validate_table_name(table, limits)?,
            name: validate_index_name(name, limits)?,
        })
    }

    /// Builds the statement.
    ///
    /// # Errors
    ///
    /// Never fails once constructed; the `Result` keeps the builder API
    /// uniform.
    pub fn build(&self) -> Result<Vec<String>> {
        let sql = match self.dialect.kind() {
            DialectKind::H2 | DialectKind::PostgreSql => {
                format!("DROP INDEX IF EXISTS {}", self.name)
            }
            DialectKind::MsSql | DialectKind::MySql => {
                format!("DROP INDEX {} ON {}", self.name, self.table)
            }
            DialectKind::Oracle => format!("DROP INDEX {}", self.name),
        };
        debug!(table = %self.table, index = %self.name, "Built DROP INDEX");
        Ok(vec![sql])
    }
}
