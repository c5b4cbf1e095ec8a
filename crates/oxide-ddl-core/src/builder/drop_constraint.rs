//! ALTER TABLE ... DROP CONSTRAINT for constraints other than primary keys.

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{DdlError, Result};
use crate::naming::{PK_PREFIX, validate_constraint_name, validate_table_name};

/// Drops a named constraint.
///
/// Primary keys are refused: they go through
/// [`DropPrimaryKeyBuilder`](super::DropPrimaryKeyBuilder), which also takes
/// care of auto-increment artifacts.
#[derive(Debug, Clone)]
pub struct DropConstraintBuilder {
    table: String,
    constraint: String,
}

impl DropConstraintBuilder {
    /// Drops `constraint` from `table`.
    ///
    /// # Errors
    ///
    /// Fails when a name is invalid or when `constraint` starts with `pk_`.
    pub fn new(dialect: &Dialect, table: &str, constraint: &str) -> Result<Self> {
        let limits = dialect.naming_limits();
        let table = validate_table_name(table, limits)?;
        if constraint.starts_with(PK_PREFIX) {
            return Err(DdlError::invalid_argument(
                "This builder should not be used with primary keys",
            ));
        }
        Ok(Self {
            table,
            constraint: validate_constraint_name(constraint, limits)?,
        })
    }

    /// Builds the statement. The syntax is the same on every dialect.
    ///
    /// # Errors
    ///
    /// Never fails once constructed.
    pub fn build(&self) -> Result<Vec<String>> {
        debug!(table = %self.table, constraint = %self.constraint, "Built DROP CONSTRAINT");
        Ok(vec![format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.table, self.constraint
        )])
    }
}
