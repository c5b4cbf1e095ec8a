//! Statement builders.
//!
//! Each builder is created with a [`Dialect`](crate::Dialect) and the
//! identifiers it targets. Constructors validate those identifiers right
//! away; everything added through chained calls is checked by `build()`.
//!
//! `build()` never mutates the builder, so calling it twice yields the same
//! statements. The returned statements must be executed in order on the same
//! connection.

mod add_columns;
mod alter_columns;
mod create_index;
mod create_table;
mod create_table_as;
mod deduplicate;
mod drop_columns;
mod drop_constraint;
mod drop_index;
mod drop_table;
mod mssql_default_constraints;
mod primary_key;
mod rename_columns;

pub use add_columns::AddColumnsBuilder;
pub use alter_columns::AlterColumnsBuilder;
pub use create_index::{CreateIndexBuilder, IndexColumn};
pub use create_table::{ColumnFlag, CreateTableBuilder};
pub use create_table_as::CreateTableAsSelectBuilder;
pub use deduplicate::DeduplicateTableBuilder;
pub use drop_columns::DropColumnsBuilder;
pub use drop_constraint::DropConstraintBuilder;
pub use drop_index::DropIndexBuilder;
pub use drop_table::DropTableBuilder;
pub use mssql_default_constraints::DropMsSqlDefaultConstraintsBuilder;
pub use primary_key::{AddPrimaryKeyBuilder, DropPrimaryKeyBuilder};
pub use rename_columns::RenameColumnsBuilder;

use crate::column::ColumnDef;
use crate::dialect::Dialect;
use crate::error::{DdlError, Result};
use crate::naming::validate_column_name;

const NO_COLUMNS: &str = "at least one column must be specified";

/// Fails with an invalid-state error when nothing was added.
fn require_columns<T>(columns: &[T]) -> Result<()> {
    if columns.is_empty() {
        return Err(DdlError::invalid_state(NO_COLUMNS));
    }
    Ok(())
}

/// Checks column definition names against the limits of `dialect`.
///
/// Definitions are built before any dialect is known, so the configured
/// column name limit can only be enforced here.
fn validate_defs<'a>(
    dialect: &Dialect,
    columns: impl IntoIterator<Item = &'a ColumnDef>,
) -> Result<()> {
    for column in columns {
        validate_column_name(column.name(), dialect.naming_limits())?;
    }
    Ok(())
}

/// Rejects columns carrying a default value outside of table creation.
fn reject_default(column: &ColumnDef) -> Result<()> {
    if column.has_default() {
        return Err(DdlError::invalid_argument(format!(
            "Default value is not supported on column '{}'",
            column.name()
        )));
    }
    Ok(())
}

/// Name of the sequence backing an emulated auto-increment column.
fn oracle_sequence_name(table: &str) -> String {
    format!("{table}_seq")
}

/// Name of the trigger feeding an emulated auto-increment column.
fn oracle_trigger_name(table: &str) -> String {
    format!("{table}_idt")
}

/// Wraps a DDL statement in a PL/SQL block ignoring one error code.
fn oracle_ignoring(statement: &str, ignored_sqlcode: i32) -> String {
    format!(
        "BEGIN\n  EXECUTE IMMEDIATE '{}';\nEXCEPTION\n  WHEN OTHERS THEN\n    IF SQLCODE != {ignored_sqlcode} THEN\n    RAISE;\n    END IF;\nEND;",
        statement.replace('\'', "''")
    )
}

/// Oracle: ORA-02289, sequence does not exist.
const ORA_NO_SEQUENCE: i32 = -2289;
/// Oracle: ORA-04080, trigger does not exist.
const ORA_NO_TRIGGER: i32 = -4080;
/// Oracle: ORA-00942, table or view does not exist.
const ORA_NO_TABLE: i32 = -942;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_ignoring_block() {
        assert_eq!(
            oracle_ignoring("DROP SEQUENCE issues_seq", ORA_NO_SEQUENCE),
            "BEGIN\n  EXECUTE IMMEDIATE 'DROP SEQUENCE issues_seq';\nEXCEPTION\n  WHEN OTHERS THEN\n    IF SQLCODE != -2289 THEN\n    RAISE;\n    END IF;\nEND;"
        );
    }

    #[test]
    fn test_oracle_ignoring_escapes_quotes() {
        let block = oracle_ignoring("DROP TRIGGER \"A'B\"", ORA_NO_TRIGGER);
        assert!(block.contains("'DROP TRIGGER \"A''B\"'"));
    }

    #[test]
    fn test_require_columns() {
        let err = require_columns::<String>(&[]).unwrap_err();
        assert!(matches!(err, DdlError::InvalidState(_)));
        assert_eq!(err.to_string(), NO_COLUMNS);
        assert!(require_columns(&["id"]).is_ok());
    }
}
