//! Target database dialects.
//!
//! The set of supported engines is closed, so a [`Dialect`] is a plain value:
//! an engine identifier, the server version when it matters, and the naming
//! limits identifiers are checked against. Every rendering decision is an
//! exhaustive `match` on [`DialectKind`], so adding an engine is a compile
//! error everywhere it needs handling.
//!
//! A `Dialect` is `Copy` and never mutated after construction, so one value
//! can be shared by any number of builders.

mod types;
mod version;

pub use version::DbVersion;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::column::{ColumnDef, ColumnType};
use crate::error::{DdlError, Result};
use crate::naming::NamingLimits;

/// First PostgreSQL release accepting `NULLS NOT DISTINCT` on unique indexes.
pub const POSTGRES_NULLS_NOT_DISTINCT_SINCE: DbVersion = DbVersion::new(15, 0);

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// H2 embedded database.
    H2,
    /// Oracle Database.
    Oracle,
    /// Microsoft SQL Server.
    #[serde(rename = "mssql")]
    MsSql,
    /// PostgreSQL.
    #[serde(rename = "postgresql")]
    PostgreSql,
    /// MySQL.
    #[serde(rename = "mysql")]
    MySql,
}

impl DialectKind {
    /// All supported engines.
    pub const ALL: [Self; 5] = [
        Self::H2,
        Self::Oracle,
        Self::MsSql,
        Self::PostgreSql,
        Self::MySql,
    ];

    /// Returns the dialect identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::H2 => "h2",
            Self::Oracle => "oracle",
            Self::MsSql => "mssql",
            Self::PostgreSql => "postgresql",
            Self::MySql => "mysql",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DialectKind {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "h2" => Ok(Self::H2),
            "oracle" => Ok(Self::Oracle),
            "mssql" | "sqlserver" => Ok(Self::MsSql),
            "postgresql" | "postgres" => Ok(Self::PostgreSql),
            "mysql" => Ok(Self::MySql),
            _ => Err(DdlError::invalid_argument(format!(
                "Unsupported database '{s}'"
            ))),
        }
    }
}

/// How a dialect keeps two rows with NULL in a unique index from both being
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueNullsPolicy {
    /// Append `NULLS NOT DISTINCT` to the index definition.
    NullsNotDistinct,
    /// Wrap every nullable column in `COALESCE(col, '')`.
    CoalesceNullable,
    /// The engine already treats NULLs as equal in unique indexes.
    NullsAlreadyEqual,
}

/// A target database dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    kind: DialectKind,
    version: Option<DbVersion>,
    naming: NamingLimits,
}

impl Dialect {
    /// Creates a dialect with no known server version.
    ///
    /// For PostgreSQL this assumes a server older than 15; use
    /// [`Dialect::postgresql`] when the version is known.
    #[must_use]
    pub fn new(kind: DialectKind) -> Self {
        Self {
            kind,
            version: None,
            naming: NamingLimits::default(),
        }
    }

    /// H2 dialect.
    #[must_use]
    pub fn h2() -> Self {
        Self::new(DialectKind::H2)
    }

    /// Oracle dialect.
    #[must_use]
    pub fn oracle() -> Self {
        Self::new(DialectKind::Oracle)
    }

    /// SQL Server dialect.
    #[must_use]
    pub fn mssql() -> Self {
        Self::new(DialectKind::MsSql)
    }

    /// MySQL dialect.
    #[must_use]
    pub fn mysql() -> Self {
        Self::new(DialectKind::MySql)
    }

    /// PostgreSQL dialect for a server of the given version.
    #[must_use]
    pub fn postgresql(version: DbVersion) -> Self {
        Self::new(DialectKind::PostgreSql).with_version(version)
    }

    /// Sets the server version.
    #[must_use]
    pub const fn with_version(mut self, version: DbVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Replaces the identifier naming limits.
    #[must_use]
    pub const fn with_naming_limits(mut self, naming: NamingLimits) -> Self {
        self.naming = naming;
        self
    }

    /// Returns the engine.
    #[must_use]
    pub const fn kind(&self) -> DialectKind {
        self.kind
    }

    /// Returns the server version, if known.
    #[must_use]
    pub const fn version(&self) -> Option<DbVersion> {
        self.version
    }

    /// Returns the identifier naming limits.
    #[must_use]
    pub const fn naming_limits(&self) -> &NamingLimits {
        &self.naming
    }

    /// Returns the SQL literal for `true`.
    #[must_use]
    pub const fn true_literal(&self) -> &'static str {
        if self.has_native_boolean() { "true" } else { "1" }
    }

    /// Returns the SQL literal for `false`.
    #[must_use]
    pub const fn false_literal(&self) -> &'static str {
        if self.has_native_boolean() { "false" } else { "0" }
    }

    /// Returns whether the engine has a real BOOLEAN type.
    #[must_use]
    pub const fn has_native_boolean(&self) -> bool {
        matches!(self.kind, DialectKind::H2 | DialectKind::PostgreSql)
    }

    /// Returns whether unique indexes accept `NULLS NOT DISTINCT`.
    #[must_use]
    pub fn supports_nulls_not_distinct(&self) -> bool {
        match self.kind {
            DialectKind::H2 => true,
            DialectKind::PostgreSql => self
                .version
                .is_some_and(|v| v >= POSTGRES_NULLS_NOT_DISTINCT_SINCE),
            DialectKind::Oracle | DialectKind::MsSql | DialectKind::MySql => false,
        }
    }

    /// Returns how unique indexes must handle nullable columns.
    #[must_use]
    pub fn unique_nulls_policy(&self) -> UniqueNullsPolicy {
        if self.supports_nulls_not_distinct() {
            UniqueNullsPolicy::NullsNotDistinct
        } else if self.kind == DialectKind::MsSql {
            UniqueNullsPolicy::NullsAlreadyEqual
        } else {
            UniqueNullsPolicy::CoalesceNullable
        }
    }

    /// Returns whether auto-increment needs a sequence and a trigger.
    #[must_use]
    pub const fn emulates_auto_increment(&self) -> bool {
        matches!(self.kind, DialectKind::Oracle)
    }

    /// Quotes an identifier that did not go through name validation, such as
    /// a constraint name assigned by the database.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        match self.kind {
            DialectKind::MsSql => format!("[{}]", name.replace(']', "]]")),
            DialectKind::MySql => format!("`{}`", name.replace('`', "``")),
            DialectKind::H2 | DialectKind::Oracle | DialectKind::PostgreSql => {
                format!("\"{}\"", name.replace('"', "\"\""))
            }
        }
    }

    /// Renders the default value of a column, if it has one.
    #[must_use]
    pub fn default_literal(&self, column: &ColumnDef) -> Option<String> {
        match column.column_type() {
            ColumnType::Boolean { default } => default.map(|b| {
                if b {
                    self.true_literal().to_string()
                } else {
                    self.false_literal().to_string()
                }
            }),
            ColumnType::Integer { default } => default.map(|v| v.to_string()),
            ColumnType::BigInteger { default } => default.map(|v| v.to_string()),
            ColumnType::TinyInt { default } => default.map(|v| v.to_string()),
            ColumnType::Decimal { default, .. } => default.map(|v| v.to_string()),
            ColumnType::Varchar { default, .. } => default
                .as_ref()
                .map(|s| format!("'{}'", s.replace('\'', "''"))),
            ColumnType::Clob | ColumnType::Blob => None,
        }
    }

    /// Renders `<name> <type>[ DEFAULT <value>] NULL|NOT NULL`.
    #[must_use]
    pub fn column_clause(&self, column: &ColumnDef) -> String {
        let mut sql = format!("{} {}", column.name(), self.render_type(column));
        if let Some(default) = self.default_literal(column) {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default);
        }
        sql.push_str(nullability(column));
        sql
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(version) = self.version {
            write!(f, " {version}")?;
        }
        Ok(())
    }
}

pub(crate) const fn nullability(column: &ColumnDef) -> &'static str {
    if column.is_nullable() {
        " NULL"
    } else {
        " NOT NULL"
    }
}
