//! Column type rendering.

use super::{Dialect, DialectKind};
use crate::column::{ColumnDef, ColumnType, VARCHAR_MAX_SIZE};

use DialectKind::{H2, MsSql, MySql, Oracle, PostgreSql};

impl Dialect {
    /// Renders the SQL type of a column.
    ///
    /// Total over every (column type, engine) pair: there is no fallback arm.
    #[must_use]
    pub fn render_type(&self, column: &ColumnDef) -> String {
        match (column.column_type(), self.kind) {
            (ColumnType::Boolean { .. }, H2 | PostgreSql) => "BOOLEAN".to_string(),
            (ColumnType::Boolean { .. }, Oracle) => "NUMBER(1)".to_string(),
            (ColumnType::Boolean { .. }, MsSql) => "BIT".to_string(),
            (ColumnType::Boolean { .. }, MySql) => "TINYINT(1)".to_string(),

            (ColumnType::Integer { .. }, H2 | PostgreSql | MySql) => "INTEGER".to_string(),
            (ColumnType::Integer { .. }, Oracle) => "NUMBER(38,0)".to_string(),
            (ColumnType::Integer { .. }, MsSql) => "INT".to_string(),

            (ColumnType::BigInteger { .. }, H2 | PostgreSql | MsSql | MySql) => {
                "BIGINT".to_string()
            }
            (ColumnType::BigInteger { .. }, Oracle) => "NUMBER (38)".to_string(),

            (ColumnType::TinyInt { .. }, H2 | MsSql) => "TINYINT".to_string(),
            (ColumnType::TinyInt { .. }, Oracle) => "NUMBER(3)".to_string(),
            (ColumnType::TinyInt { .. }, PostgreSql) => "SMALLINT".to_string(),
            (ColumnType::TinyInt { .. }, MySql) => "TINYINT(2)".to_string(),

            (
                ColumnType::Decimal {
                    precision, scale, ..
                },
                H2 | Oracle | PostgreSql,
            ) => format!("NUMERIC ({precision},{scale})"),
            (
                ColumnType::Decimal {
                    precision, scale, ..
                },
                MsSql | MySql,
            ) => format!("DECIMAL ({precision},{scale})"),

            (ColumnType::Varchar { limit, .. }, H2 | PostgreSql | MySql) => {
                format!("VARCHAR ({limit})")
            }
            (ColumnType::Varchar { limit, .. }, MsSql) => format!("NVARCHAR ({limit})"),
            (
                ColumnType::Varchar {
                    limit,
                    ignore_oracle_unit,
                    ..
                },
                Oracle,
            ) => {
                if *ignore_oracle_unit {
                    format!("VARCHAR2 ({limit})")
                } else {
                    format!("VARCHAR2 ({limit} CHAR)")
                }
            }

            (ColumnType::Clob, H2 | Oracle) => "CLOB".to_string(),
            (ColumnType::Clob, MsSql) => "NVARCHAR (MAX)".to_string(),
            (ColumnType::Clob, PostgreSql) => "TEXT".to_string(),
            (ColumnType::Clob, MySql) => "LONGTEXT".to_string(),

            (ColumnType::Blob, H2 | Oracle) => "BLOB".to_string(),
            (ColumnType::Blob, MsSql) => "VARBINARY(MAX)".to_string(),
            (ColumnType::Blob, PostgreSql) => "BYTEA".to_string(),
            (ColumnType::Blob, MySql) => "LONGBLOB".to_string(),
        }
    }

    /// Renders a column reference inside an index definition.
    ///
    /// MySQL gets a key length hint on VARCHAR columns, omitted once the
    /// length reaches [`VARCHAR_MAX_SIZE`].
    #[must_use]
    pub fn index_column_reference(&self, column: &ColumnDef) -> String {
        match (column.column_type(), self.kind) {
            (ColumnType::Varchar { limit, .. }, MySql) if *limit < VARCHAR_MAX_SIZE => {
                format!("{} ({limit})", column.name())
            }
            _ => column.name().to_string(),
        }
    }
}
