//! DROP TABLE.

use tracing::debug;

use super::{
    ORA_NO_SEQUENCE, ORA_NO_TABLE, ORA_NO_TRIGGER, oracle_ignoring, oracle_sequence_name,
    oracle_trigger_name,
};
use crate::dialect::{Dialect, DialectKind};
use crate::error::Result;
use crate::naming::validate_table_name;

/// Drops a table.
///
/// On Oracle the table may come with the sequence and trigger of an emulated
/// auto-increment column. All three are dropped, each in a block ignoring
/// the "does not exist" error, whether they exist or not.
#[derive(Debug, Clone)]
pub struct DropTableBuilder {
    dialect: Dialect,
    table: String,
}

impl DropTableBuilder {
    /// Drops `table`.
    ///
    /// # Errors
    ///
    /// Fails when `table` is not a valid table name.
    pub fn new(dialect: &Dialect, table: &str) -> Result<Self> {
        Ok(Self {
            dialect: *dialect,
            table: validate_table_name(table, dialect.naming_limits())?,
        })
    }

    /// Builds the statements.
    ///
    /// # Errors
    ///
    /// Never fails once constructed.
    pub fn build(&self) -> Result<Vec<String>> {
        let statements = match self.dialect.kind() {
            DialectKind::Oracle => vec![
                oracle_ignoring(
                    &format!("DROP SEQUENCE {}", oracle_sequence_name(&self.table)),
                    ORA_NO_SEQUENCE,
                ),
                oracle_ignoring(
                    &format!("DROP TRIGGER {}", oracle_trigger_name(&self.table)),
                    ORA_NO_TRIGGER,
                ),
                oracle_ignoring(&format!("DROP TABLE {}", self.table), ORA_NO_TABLE),
            ],
            DialectKind::H2 | DialectKind::MsSql | DialectKind::PostgreSql | DialectKind::MySql => {
                vec![format!("DROP TABLE {}", self.table)]
            }
        };
        debug!(table = %self.table, statements = statements.len(), "Built DROP TABLE");
        Ok(statements)
    }
}
