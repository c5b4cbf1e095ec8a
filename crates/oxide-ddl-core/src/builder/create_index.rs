//! CREATE [UNIQUE] INDEX.

use tracing::debug;

use super::require_columns;
use crate::column::ColumnDef;
use crate::dialect::{Dialect, DialectKind, UniqueNullsPolicy};
use crate::error::{DdlError, Result};
use crate::naming::{validate_column_name, validate_index_name, validate_table_name};

/// A column taking part in an index.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexColumn {
    /// Only the name is known. Enough for non-unique indexes.
    Name(String),
    /// Full definition, nullability included.
    Def(ColumnDef),
}

impl IndexColumn {
    fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Def(def) => def.name(),
        }
    }
}

impl From<ColumnDef> for IndexColumn {
    fn from(def: ColumnDef) -> Self {
        Self::Def(def)
    }
}

/// Builds `CREATE INDEX` statements.
///
/// Unique indexes must keep two rows with NULL in the same column from both
/// being accepted. Depending on the dialect the index gets a trailing
/// `NULLS NOT DISTINCT`, or each nullable column is wrapped in
/// `COALESCE(col, '')`, itself parenthesized on MySQL; see
/// [`UniqueNullsPolicy`].
///
/// # Example
///
/// ```rust
/// use oxide_ddl_core::builder::CreateIndexBuilder;
/// use oxide_ddl_core::column::varchar;
/// use oxide_ddl_core::{DbVersion, Dialect};
///
/// let dialect = Dialect::postgresql(DbVersion::new(14, 0));
/// let statements = CreateIndexBuilder::new(&dialect, "issues", "uniq_issues_kee")?
///     .unique(true)
///     .add_column(varchar("branch").limit(40).build()?)
///     .add_column(varchar("kee").limit(40).not_null().build()?)
///     .build()?;
///
/// assert_eq!(
///     statements,
///     vec!["CREATE UNIQUE INDEX uniq_issues_kee ON issues (COALESCE(branch, ''), kee)"]
/// );
/// # Ok::<(), oxide_ddl_core::DdlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CreateIndexBuilder {
    dialect: Dialect,
    table: String,
    name: String,
    unique: bool,
    columns: Vec<IndexColumn>,
}

impl CreateIndexBuilder {
    /// Starts an index named `name` on `table`.
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
            unique: false,
            columns: Vec::new(),
        })
    }

    /// Makes the index unique.
    #[must_use]
    pub const fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Adds a column by its full definition.
    #[must_use]
    pub fn add_column(mut self, column: impl Into<IndexColumn>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Adds a column by name only. Unique indexes reject such columns.
    #[must_use]
    pub fn add_column_name(mut self, column: impl Into<String>) -> Self {
        self.columns.push(IndexColumn::Name(column.into()));
        self
    }

    /// Builds the statement.
    ///
    /// # Errors
    ///
    /// Fails when no column was added, when a column name is invalid, or when
    /// the index is unique and a column was given by name only.
    pub fn build(&self) -> Result<Vec<String>> {
        require_columns(&self.columns)?;
        for column in &self.columns {
            validate_column_name(column.name(), self.dialect.naming_limits())?;
            if self.unique && matches!(column, IndexColumn::Name(_)) {
                return Err(DdlError::invalid_argument(
                    "nullability must be provided for unique indexes",
                ));
            }
        }

        let policy = self.unique.then(|| self.dialect.unique_nulls_policy());
        let references: Vec<String> = self
            .columns
            .iter()
            .map(|c| self.column_reference(c, policy))
            .collect();

        let mut sql = format!(
            "CREATE {}INDEX {} ON {} ({})",
            if self.unique { "UNIQUE " } else { "" },
            self.name,
            self.table,
            references.join(", ")
        );
        if policy == Some(UniqueNullsPolicy::NullsNotDistinct) {
            sql.push_str(" NULLS NOT DISTINCT");
        }

        debug!(
            table = %self.table,
            index = %self.name,
            unique = self.unique,
            "Built CREATE INDEX"
        );
        Ok(vec![sql])
    }

    fn column_reference(&self, column: &IndexColumn, policy: Option<UniqueNullsPolicy>) -> String {
        match column {
            IndexColumn::Name(name) => name.clone(),
            IndexColumn::Def(def) => {
                if def.is_nullable() && policy == Some(UniqueNullsPolicy::CoalesceNullable) {
                    let coalesce = format!("COALESCE({}, '')", def.name());
                    // MySQL only takes expressions as parenthesized key parts.
                    if self.dialect.kind() == DialectKind::MySql {
                        format!("({coalesce})")
                    } else {
                        coalesce
                    }
                } else {
                    self.dialect.index_column_reference(def)
                }
            }
        }
    }
}
