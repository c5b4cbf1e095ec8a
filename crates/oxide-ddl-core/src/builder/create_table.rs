//! CREATE TABLE, with primary key and auto-increment handling.

use tracing::debug;

use super::{
    oracle_sequence_name, oracle_trigger_name, reject_default, require_columns, validate_defs,
};
use crate::column::{ColumnDef, ColumnType};
use crate::dialect::{Dialect, DialectKind, nullability};
use crate::error::{DdlError, Result};
use crate::naming::{PK_PREFIX, validate_constraint_name, validate_table_name};

/// The only name an auto-increment column may have.
const AUTO_INCREMENT_COLUMN: &str = "id";

/// Suffix of every table created on MySQL.
const MYSQL_TABLE_SUFFIX: &str = " ENGINE=InnoDB CHARACTER SET utf8 COLLATE utf8_bin";

/// Extra behaviors attached to a column of a new table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnFlag {
    /// Values are generated by the database on insert.
    ///
    /// Only allowed on a NOT NULL `INTEGER` or `BIGINT` column named `id`
    /// without a default value, and at most once per table.
    AutoIncrement,
}

#[derive(Debug, Clone)]
struct TableColumn {
    def: ColumnDef,
    auto_increment: bool,
}

impl TableColumn {
    fn new(def: ColumnDef, flags: &[ColumnFlag]) -> Self {
        Self {
            def,
            auto_increment: flags.contains(&ColumnFlag::AutoIncrement),
        }
    }
}

/// Builds `CREATE TABLE` statements.
///
/// # Example
///
/// ```rust
/// use oxide_ddl_core::builder::CreateTableBuilder;
/// use oxide_ddl_core::column::{boolean, varchar};
/// use oxide_ddl_core::Dialect;
///
/// let dialect = Dialect::h2();
/// let statements = CreateTableBuilder::new(&dialect, "table_42")?
///     .add_pk_column(boolean("bool_col").build()?)
///     .add_column(varchar("varchar_col").limit(40).build()?)
///     .build()?;
///
/// assert_eq!(
///     statements,
///     vec!["CREATE TABLE table_42 (bool_col BOOLEAN NULL,varchar_col VARCHAR (40) NULL, CONSTRAINT pk_table_42 PRIMARY KEY (bool_col))"]
/// );
/// # Ok::<(), oxide_ddl_core::DdlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CreateTableBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<TableColumn>,
    pk_columns: Vec<TableColumn>,
    pk_constraint_name: Option<String>,
}

impl CreateTableBuilder {
    /// Starts a CREATE TABLE for `table`.
    ///
    /// # Errors
    ///
    /// Fails when `table` is not a valid table name.
    pub fn new(dialect: &Dialect, table: &str) -> Result<Self> {
        Ok(Self {
            dialect: *dialect,
            table: validate_table_name(table, dialect.naming_limits())?,
            columns: Vec::new(),
            pk_columns: Vec::new(),
            pk_constraint_name: None,
        })
    }

    /// Adds a column outside of the primary key.
    #[must_use]
    pub fn add_column(self, column: ColumnDef) -> Self {
        self.add_column_with_flags(column, &[])
    }

    /// Adds a column outside of the primary key, with flags.
    #[must_use]
    pub fn add_column_with_flags(mut self, column: ColumnDef, flags: &[ColumnFlag]) -> Self {
        self.columns.push(TableColumn::new(column, flags));
        self
    }

    /// Adds a primary key column. Key columns keep their insertion order.
    #[must_use]
    pub fn add_pk_column(self, column: ColumnDef) -> Self {
        self.add_pk_column_with_flags(column, &[])
    }

    /// Adds a primary key column, with flags.
    #[must_use]
    pub fn add_pk_column_with_flags(mut self, column: ColumnDef, flags: &[ColumnFlag]) -> Self {
        self.pk_columns.push(TableColumn::new(column, flags));
        self
    }

    /// Overrides the primary key constraint name (`pk_<table>` by default).
    #[must_use]
    pub fn with_pk_constraint_name(mut self, name: impl Into<String>) -> Self {
        self.pk_constraint_name = Some(name.into());
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Builds the statements.
    ///
    /// One statement on every dialect, except Oracle with an auto-increment
    /// column: the table, its sequence and its insert trigger.
    ///
    /// # Errors
    ///
    /// Fails when no column was added, when a column name exceeds the
    /// dialect's limits, when an auto-increment column breaks one of the
    /// [`ColumnFlag::AutoIncrement`] rules or has a default value, or when
    /// the primary key constraint name is invalid.
    pub fn build(&self) -> Result<Vec<String>> {
        let all: Vec<&TableColumn> = self.pk_columns.iter().chain(&self.columns).collect();
        require_columns(&all)?;
        validate_defs(&self.dialect, all.iter().map(|c| &c.def))?;
        let auto_increment = self.auto_increment_column(&all)?;

        let mut sql = format!("CREATE TABLE {} (", self.table);
        let clauses: Vec<String> = all.iter().map(|c| self.column_clause(c)).collect();
        sql.push_str(&clauses.join(","));
        if !self.pk_columns.is_empty() {
            let names: Vec<&str> = self.pk_columns.iter().map(|c| c.def.name()).collect();
            sql.push_str(&format!(
                ", CONSTRAINT {} PRIMARY KEY ({})",
                self.pk_name()?,
                names.join(",")
            ));
        }
        sql.push(')');
        if self.dialect.kind() == DialectKind::MySql {
            sql.push_str(MYSQL_TABLE_SUFFIX);
        }

        let mut statements = vec![sql];
        if let Some(column) = auto_increment {
            if self.dialect.emulates_auto_increment() {
                statements.push(self.oracle_sequence());
                statements.push(self.oracle_trigger(column.name()));
            }
        }

        debug!(
            table = %self.table,
            dialect = %self.dialect,
            statements = statements.len(),
            "Built CREATE TABLE"
        );
        Ok(statements)
    }

    fn pk_name(&self) -> Result<String> {
        let name = self
            .pk_constraint_name
            .clone()
            .unwrap_or_else(|| format!("{PK_PREFIX}{}", self.table));
        validate_constraint_name(&name, self.dialect.naming_limits())
    }

    fn auto_increment_column<'c>(&self, all: &[&'c TableColumn]) -> Result<Option<&'c ColumnDef>> {
        let flagged: Vec<&ColumnDef> = all
            .iter()
            .filter(|c| c.auto_increment)
            .map(|c| &c.def)
            .collect();
        for column in &flagged {
            if column.name() != AUTO_INCREMENT_COLUMN {
                return Err(DdlError::invalid_argument(format!(
                    "Auto increment column name must be {AUTO_INCREMENT_COLUMN}"
                )));
            }
            if !column.column_type().is_auto_incrementable() {
                return Err(DdlError::invalid_argument(
                    "Auto increment column must either be BigInteger or Integer",
                ));
            }
            if column.is_nullable() {
                return Err(DdlError::invalid_argument(
                    "Auto increment column can't be nullable",
                ));
            }
            reject_default(column)?;
        }
        if flagged.len() > 1 {
            return Err(DdlError::invalid_argument(
                "There can't be more than one auto increment column",
            ));
        }
        Ok(flagged.first().copied())
    }

    fn column_clause(&self, column: &TableColumn) -> String {
        if !column.auto_increment {
            return self.dialect.column_clause(&column.def);
        }
        let def = &column.def;
        match self.dialect.kind() {
            DialectKind::PostgreSql => {
                let serial = if matches!(def.column_type(), ColumnType::BigInteger { .. }) {
                    "BIGSERIAL"
                } else {
                    "SERIAL"
                };
                format!("{} {serial}{}", def.name(), nullability(def))
            }
            DialectKind::MsSql => format!(
                "{} {}{} IDENTITY (1,1)",
                def.name(),
                self.dialect.render_type(def),
                nullability(def)
            ),
            DialectKind::H2 => format!(
                "{} {}{} AUTO_INCREMENT (1,1)",
                def.name(),
                self.dialect.render_type(def),
                nullability(def)
            ),
            DialectKind::MySql => format!(
                "{} {}{} AUTO_INCREMENT",
                def.name(),
                self.dialect.render_type(def),
                nullability(def)
            ),
            DialectKind::Oracle => format!(
                "{} {}{}",
                def.name(),
                self.dialect.render_type(def),
                nullability(def)
            ),
        }
    }

    fn oracle_sequence(&self) -> String {
        format!(
            "CREATE SEQUENCE {} START WITH 1 INCREMENT BY 1",
            oracle_sequence_name(&self.table)
        )
    }

    fn oracle_trigger(&self, column: &str) -> String {
        format!(
            "CREATE OR REPLACE TRIGGER {trigger} BEFORE INSERT ON {table} FOR EACH ROW BEGIN IF :new.{column} IS null THEN SELECT {sequence}.nextval INTO :new.{column} FROM dual; END IF; END;",
            trigger = oracle_trigger_name(&self.table),
            table = self.table,
            sequence = oracle_sequence_name(&self.table),
        )
    }
}
