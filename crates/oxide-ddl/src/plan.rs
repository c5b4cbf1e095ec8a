//! JSON change plans.
//!
//! A plan is a list of steps, each mapped onto one statement builder:
//!
//! ```json
//! {
//!   "steps": [
//!     {
//!       "op": "create_table",
//!       "table": "issues",
//!       "pk_columns": [{ "name": "id", "type": "integer", "nullable": false, "auto_increment": true }],
//!       "columns": [{ "name": "kee", "type": "varchar", "limit": 50, "nullable": false }]
//!     },
//!     { "op": "drop_index", "table": "issues", "name": "issues_kee" }
//!   ]
//! }
//! ```

use oxide_ddl_core::builder::{
    AddColumnsBuilder, AddPrimaryKeyBuilder, AlterColumnsBuilder, ColumnFlag, CreateIndexBuilder,
    CreateTableAsSelectBuilder, CreateTableBuilder, DeduplicateTableBuilder, DropColumnsBuilder,
    DropConstraintBuilder, DropIndexBuilder, DropPrimaryKeyBuilder, DropTableBuilder, IndexColumn,
    RenameColumnsBuilder,
};
use oxide_ddl_core::column::{
    ColumnDef, big_integer, blob, boolean, clob, decimal, integer, tiny_int, varchar,
};
use oxide_ddl_core::{Dialect, Result};
use serde::Deserialize;

const fn nullable_by_default() -> bool {
    true
}

/// Type of a column and its type-specific settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnTypeSpec {
    /// BOOLEAN.
    Boolean { default: Option<bool> },
    /// INTEGER.
    Integer { default: Option<i32> },
    /// BIGINT.
    BigInteger { default: Option<i64> },
    /// TINYINT.
    TinyInt { default: Option<u8> },
    /// DECIMAL.
    Decimal {
        precision: Option<u8>,
        scale: Option<u8>,
        default: Option<f64>,
    },
    /// VARCHAR.
    Varchar {
        limit: Option<u32>,
        #[serde(default)]
        ignore_oracle_unit: bool,
        default: Option<String>,
    },
    /// CLOB.
    Clob,
    /// BLOB.
    Blob,
}

/// A column as written in a plan.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Whether NULL is accepted.
    #[serde(default = "nullable_by_default")]
    pub nullable: bool,
    /// Only meaningful in `create_table`.
    #[serde(default)]
    pub auto_increment: bool,
    /// Type and settings.
    #[serde(flatten)]
    pub column_type: ColumnTypeSpec,
}

impl ColumnSpec {
    /// Builds the validated column definition.
    ///
    /// # Errors
    ///
    /// Fails when the name is invalid or a type setting is missing or out of
    /// range.
    pub fn to_def(&self) -> Result<ColumnDef> {
        let name = self.name.as_str();
        let nullable = self.nullable;
        match &self.column_type {
            ColumnTypeSpec::Boolean { default } => {
                let mut b = boolean(name).nullable(nullable);
                if let Some(v) = default {
                    b = b.default_value(*v);
                }
                b.build()
            }
            ColumnTypeSpec::Integer { default } => {
                let mut b = integer(name).nullable(nullable);
                if let Some(v) = default {
                    b = b.default_value(*v);
                }
                b.build()
            }
            ColumnTypeSpec::BigInteger { default } => {
                let mut b = big_integer(name).nullable(nullable);
                if let Some(v) = default {
                    b = b.default_value(*v);
                }
                b.build()
            }
            ColumnTypeSpec::TinyInt { default } => {
                let mut b = tiny_int(name).nullable(nullable);
                if let Some(v) = default {
                    b = b.default_value(*v);
                }
                b.build()
            }
            ColumnTypeSpec::Decimal {
                precision,
                scale,
                default,
            } => {
                let mut b = decimal(name).nullable(nullable);
                if let Some(p) = precision {
                    b = b.precision(*p);
                }
                if let Some(s) = scale {
                    b = b.scale(*s);
                }
                if let Some(v) = default {
                    b = b.default_value(*v);
                }
                b.build()
            }
            ColumnTypeSpec::Varchar {
                limit,
                ignore_oracle_unit,
                default,
            } => {
                let mut b = varchar(name)
                    .nullable(nullable)
                    .ignore_oracle_unit(*ignore_oracle_unit);
                if let Some(l) = limit {
                    b = b.limit(*l);
                }
                if let Some(v) = default {
                    b = b.default_value(v.clone());
                }
                b.build()
            }
            ColumnTypeSpec::Clob => clob(name).nullable(nullable).build(),
            ColumnTypeSpec::Blob => blob(name).nullable(nullable).build(),
        }
    }

    const fn flags(&self) -> &'static [ColumnFlag] {
        if self.auto_increment {
            &[ColumnFlag::AutoIncrement]
        } else {
            &[]
        }
    }
}

/// An index column: a bare name or a full column.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IndexColumnSpec {
    /// Name only.
    Name(String),
    /// Full column, needed by unique indexes.
    Column(ColumnSpec),
}

/// A column selected by `create_table_as`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SelectSpec {
    /// Copied unchanged.
    Name(String),
    /// Copied from `cast_from` with the type of `column`.
    Cast {
        /// Target column.
        column: ColumnSpec,
        /// Source column.
        cast_from: String,
    },
}

/// One rename in `rename_columns`.
#[derive(Debug, Clone, Deserialize)]
pub struct RenameSpec {
    /// Current column name.
    pub from: String,
    /// New column.
    pub to: ColumnSpec,
}

/// One schema change.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// CREATE TABLE.
    CreateTable {
        table: String,
        #[serde(default)]
        pk_columns: Vec<ColumnSpec>,
        #[serde(default)]
        columns: Vec<ColumnSpec>,
        pk_constraint_name: Option<String>,
    },
    /// ALTER TABLE ADD.
    AddColumns { table: String, columns: Vec<ColumnSpec> },
    /// ALTER TABLE changing column definitions.
    AlterColumns { table: String, columns: Vec<ColumnSpec> },
    /// ALTER TABLE DROP COLUMN.
    DropColumns { table: String, columns: Vec<String> },
    /// CREATE INDEX.
    CreateIndex {
        table: String,
        name: String,
        #[serde(default)]
        unique: bool,
        columns: Vec<IndexColumnSpec>,
    },
    /// DROP INDEX.
    DropIndex { table: String, name: String },
    /// ADD CONSTRAINT ... PRIMARY KEY.
    AddPrimaryKey { table: String, columns: Vec<String> },
    /// Primary key removal, with auto-increment artifacts.
    DropPrimaryKey {
        table: String,
        constraint: String,
        auto_increment_column: Option<ColumnSpec>,
        trigger: Option<String>,
    },
    /// DROP CONSTRAINT.
    DropConstraint { table: String, constraint: String },
    /// Column renames.
    RenameColumns { table: String, renames: Vec<RenameSpec> },
    /// CREATE TABLE ... AS SELECT.
    CreateTableAs {
        table: String,
        from: String,
        columns: Vec<SelectSpec>,
    },
    /// DROP TABLE.
    DropTable { table: String },
    /// Duplicate row removal.
    Deduplicate {
        table: String,
        identity: Option<String>,
        references: Vec<String>,
    },
}

impl Step {
    /// Short name of the step, for logs.
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::CreateTable { .. } => "create_table",
            Self::AddColumns { .. } => "add_columns",
            Self::AlterColumns { .. } => "alter_columns",
            Self::DropColumns { .. } => "drop_columns",
            Self::CreateIndex { .. } => "create_index",
            Self::DropIndex { .. } => "drop_index",
            Self::AddPrimaryKey { .. } => "add_primary_key",
            Self::DropPrimaryKey { .. } => "drop_primary_key",
            Self::DropConstraint { .. } => "drop_constraint",
            Self::RenameColumns { .. } => "rename_columns",
            Self::CreateTableAs { .. } => "create_table_as",
            Self::DropTable { .. } => "drop_table",
            Self::Deduplicate { .. } => "deduplicate",
        }
    }

    /// Renders the statements of this step.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying builder or column definition.
    pub fn render(&self, dialect: &Dialect) -> Result<Vec<String>> {
        match self {
            Self::CreateTable {
                table,
                pk_columns,
                columns,
                pk_constraint_name,
            } => create_table(dialect, table, pk_columns, columns, pk_constraint_name.as_deref()),
            Self::AddColumns { table, columns } => {
                let mut builder = AddColumnsBuilder::new(dialect, table)?;
                for column in columns {
                    builder = builder.add_column(column.to_def()?);
                }
                builder.build()
            }
            Self::AlterColumns { table, columns } => {
                let mut builder = AlterColumnsBuilder::new(dialect, table)?;
                for column in columns {
                    builder = builder.update_column(column.to_def()?);
                }
                builder.build()
            }
            Self::DropColumns { table, columns } => columns
                .iter()
                .fold(DropColumnsBuilder::new(dialect, table)?, |b, c| {
                    b.drop_column(c.clone())
                })
                .build(),
            Self::CreateIndex {
                table,
                name,
                unique,
                columns,
            } => create_index(dialect, table, name, *unique, columns),
            Self::DropIndex { table, name } => DropIndexBuilder::new(dialect, table, name)?.build(),
            Self::AddPrimaryKey { table, columns } => columns
                .iter()
                .fold(AddPrimaryKeyBuilder::new(dialect, table)?, |b, c| {
                    b.add_pk_column(c.clone())
                })
                .build(),
            Self::DropPrimaryKey {
                table,
                constraint,
                auto_increment_column,
                trigger,
            } => {
                let mut builder = DropPrimaryKeyBuilder::new(dialect, table, constraint.clone())?;
                if let Some(column) = auto_increment_column {
                    builder = builder.auto_increment_column(column.to_def()?);
                }
                if let Some(trigger) = trigger {
                    builder = builder.with_trigger_name(trigger.clone());
                }
                builder.build()
            }
            Self::DropConstraint { table, constraint } => {
                DropConstraintBuilder::new(dialect, table, constraint)?.build()
            }
            Self::RenameColumns { table, renames } => {
                let mut builder = RenameColumnsBuilder::new(dialect, table)?;
                for rename in renames {
                    builder = builder.rename_column(rename.from.clone(), rename.to.to_def()?);
                }
                builder.build()
            }
            Self::CreateTableAs {
                table,
                from,
                columns,
            } => create_table_as(dialect, table, from, columns),
            Self::DropTable { table } => DropTableBuilder::new(dialect, table)?.build(),
            Self::Deduplicate {
                table,
                identity,
                references,
            } => {
                let mut builder = DeduplicateTableBuilder::new(dialect, table)?;
                if let Some(identity) = identity {
                    builder = builder.identity_column(identity.clone());
                }
                references
                    .iter()
                    .fold(builder, |b, c| b.add_reference_column(c.clone()))
                    .build()
            }
        }
    }
}

fn create_table(
    dialect: &Dialect,
    table: &str,
    pk_columns: &[ColumnSpec],
    columns: &[ColumnSpec],
    pk_constraint_name: Option<&str>,
) -> Result<Vec<String>> {
    let mut builder = CreateTableBuilder::new(dialect, table)?;
    for column in pk_columns {
        builder = builder.add_pk_column_with_flags(column.to_def()?, column.flags());
    }
    for column in columns {
        builder = builder.add_column_with_flags(column.to_def()?, column.flags());
    }
    if let Some(name) = pk_constraint_name {
        builder = builder.with_pk_constraint_name(name);
    }
    builder.build()
}

fn create_index(
    dialect: &Dialect,
    table: &str,
    name: &str,
    unique: bool,
    columns: &[IndexColumnSpec],
) -> Result<Vec<String>> {
    let mut builder = CreateIndexBuilder::new(dialect, table, name)?.unique(unique);
    for column in columns {
        builder = builder.add_column(match column {
            IndexColumnSpec::Name(name) => IndexColumn::Name(name.clone()),
            IndexColumnSpec::Column(spec) => IndexColumn::Def(spec.to_def()?),
        });
    }
    builder.build()
}

fn create_table_as(
    dialect: &Dialect,
    table: &str,
    from: &str,
    columns: &[SelectSpec],
) -> Result<Vec<String>> {
    let mut builder = CreateTableAsSelectBuilder::new(dialect, table, from)?;
    for column in columns {
        builder = match column {
            SelectSpec::Name(name) => builder.add_column(name.clone()),
            SelectSpec::Cast { column, cast_from } => {
                builder.add_column_with_cast(column.to_def()?, cast_from.clone())
            }
        };
    }
    builder.build()
}

/// A list of schema changes, rendered in order.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    /// Steps, in execution order.
    pub steps: Vec<Step>,
}

impl Plan {
    /// Parses a plan from JSON.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, an unknown `op` or a missing field.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_ddl_core::{DbVersion, DdlError};

    fn render(json: &str, dialect: &Dialect) -> Result<Vec<String>> {
        let plan = Plan::from_json(json).unwrap();
        let mut statements = Vec::new();
        for step in &plan.steps {
            statements.extend(step.render(dialect)?);
        }
        Ok(statements)
    }

    #[test]
    fn test_create_table_with_auto_increment() {
        let json = r#"{
            "steps": [{
                "op": "create_table",
                "table": "issues",
                "pk_columns": [{ "name": "id", "type": "integer", "nullable": false, "auto_increment": true }],
                "columns": [{ "name": "kee", "type": "varchar", "limit": 50, "nullable": false }]
            }]
        }"#;
        let statements = render(json, &Dialect::postgresql(DbVersion::new(15, 0))).unwrap();
        assert_eq!(
            statements,
            vec!["CREATE TABLE issues (id SERIAL NOT NULL,kee VARCHAR (50) NOT NULL, CONSTRAINT pk_issues PRIMARY KEY (id))"]
        );
        assert_eq!(render(json, &Dialect::oracle()).unwrap().len(), 3);
    }

    #[test]
    fn test_column_defaults_and_settings() {
        let json = r#"{
            "steps": [{
                "op": "add_columns",
                "table": "rules",
                "columns": [
                    { "name": "enabled", "type": "boolean", "nullable": false, "default": true },
                    { "name": "gap", "type": "decimal", "precision": 30, "scale": 20 },
                    { "name": "body", "type": "clob" }
                ]
            }]
        }"#;
        assert_eq!(
            render(json, &Dialect::mssql()).unwrap(),
            vec!["ALTER TABLE rules ADD enabled BIT DEFAULT 1 NOT NULL, gap DECIMAL (30,20) NULL, body NVARCHAR (MAX) NULL"]
        );
    }

    #[test]
    fn test_index_columns_by_name_or_definition() {
        let json = r#"{
            "steps": [
                { "op": "create_index", "table": "issues", "name": "issues_kee", "columns": ["kee"] },
                {
                    "op": "create_index", "table": "issues", "name": "issues_uniq", "unique": true,
                    "columns": [{ "name": "branch", "type": "varchar", "limit": 40 }]
                }
            ]
        }"#;
        assert_eq!(
            render(json, &Dialect::oracle()).unwrap(),
            vec![
                "CREATE INDEX issues_kee ON issues (kee)",
                "CREATE UNIQUE INDEX issues_uniq ON issues (COALESCE(branch, ''))",
            ]
        );
        assert_eq!(
            render(json, &Dialect::mysql()).unwrap()[1],
            "CREATE UNIQUE INDEX issues_uniq ON issues ((COALESCE(branch, '')))"
        );
    }

    #[test]
    fn test_create_table_as_with_cast() {
        let json = r#"{
            "steps": [{
                "op": "create_table_as", "table": "issues_copy", "from": "issues",
                "columns": ["kee", { "column": { "name": "line", "type": "integer", "nullable": false }, "cast_from": "line" }]
            }]
        }"#;
        assert_eq!(
            render(json, &Dialect::mssql()).unwrap(),
            vec![
                "SELECT kee, CAST(line AS INT) AS line INTO issues_copy FROM issues",
                "ALTER TABLE issues_copy ALTER COLUMN line INT NOT NULL",
            ]
        );
    }

    #[test]
    fn test_every_remaining_step() {
        let json = r#"{
            "steps": [
                { "op": "alter_columns", "table": "issues", "columns": [{ "name": "kee", "type": "varchar", "limit": 80 }] },
                { "op": "drop_columns", "table": "issues", "columns": ["a_col", "b_col"] },
                { "op": "drop_index", "table": "issues", "name": "issues_kee" },
                { "op": "add_primary_key", "table": "issues", "columns": ["id"] },
                { "op": "drop_primary_key", "table": "issues", "constraint": "pk_issues" },
                { "op": "drop_constraint", "table": "issues", "constraint": "fk_issues_rules" },
                { "op": "rename_columns", "table": "issues", "renames": [{ "from": "kee", "to": { "name": "uuid", "type": "varchar", "limit": 40 } }] },
                { "op": "drop_table", "table": "issues_copy" },
                { "op": "deduplicate", "table": "issues", "identity": "id", "references": ["kee"] }
            ]
        }"#;
        let statements = render(json, &Dialect::h2()).unwrap();
        assert_eq!(
            statements,
            vec![
                "ALTER TABLE issues ALTER COLUMN kee VARCHAR (80) NULL",
                "ALTER TABLE issues DROP COLUMN a_col",
                "ALTER TABLE issues DROP COLUMN b_col",
                "DROP INDEX IF EXISTS issues_kee",
                "ALTER TABLE issues ADD CONSTRAINT pk_issues PRIMARY KEY (id)",
                "ALTER TABLE issues DROP CONSTRAINT \"pk_issues\"",
                "ALTER TABLE issues DROP CONSTRAINT fk_issues_rules",
                "ALTER TABLE issues ALTER COLUMN kee RENAME TO uuid",
                "DROP TABLE issues_copy",
                "DELETE FROM issues WHERE id NOT IN (SELECT MIN(id) FROM issues GROUP BY kee)",
            ]
        );
    }

    #[test]
    fn test_builder_errors_surface() {
        let json = r#"{ "steps": [{ "op": "add_columns", "table": "issues", "columns": [{ "name": "kee", "type": "varchar" }] }] }"#;
        let err = render(json, &Dialect::h2()).unwrap_err();
        assert!(matches!(err, DdlError::MissingValue("Limit")));

        let json = r#"{ "steps": [{ "op": "deduplicate", "table": "issues", "references": ["kee"] }] }"#;
        let err = render(json, &Dialect::h2()).unwrap_err();
        assert!(matches!(err, DdlError::MissingValue(_)));
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        assert!(Plan::from_json(r#"{ "steps": [{ "op": "truncate", "table": "issues" }] }"#).is_err());
    }
}
