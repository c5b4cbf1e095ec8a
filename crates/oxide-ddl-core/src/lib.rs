//! # oxide-ddl-core
//!
//! Turns schema changes (create a table, add columns, add an index, rename a
//! column, drop a constraint, deduplicate rows, ...) into the exact SQL
//! statement sequence required by one of five database engines: H2, Oracle,
//! SQL Server, PostgreSQL and MySQL.
//!
//! Every builder follows the same shape: construct it with a [`Dialect`] and
//! the identifiers it works on, chain configuration calls, then call
//! `build()` to get the ordered list of statements. Statements must be run in
//! list order on a single connection.
//!
//! Identifiers are validated so that every generated name is valid on every
//! engine at once. Invalid names are rejected, never rewritten.
//!
//! ## Example
//!
//! ```rust
//! use oxide_ddl_core::builder::{ColumnFlag, CreateTableBuilder};
//! use oxide_ddl_core::column::{integer, varchar};
//! use oxide_ddl_core::Dialect;
//!
//! let dialect = Dialect::oracle();
//! let statements = CreateTableBuilder::new(&dialect, "issues")?
//!     .add_pk_column_with_flags(integer("id").not_null().build()?, &[ColumnFlag::AutoIncrement])
//!     .add_column(varchar("kee").limit(50).not_null().build()?)
//!     .build()?;
//!
//! assert_eq!(statements.len(), 3);
//! assert_eq!(
//!     statements[1],
//!     "CREATE SEQUENCE issues_seq START WITH 1 INCREMENT BY 1"
//! );
//! # Ok::<(), oxide_ddl_core::DdlError>(())
//! ```
//!
//! ## Catalog lookups
//!
//! A few drops need names the database assigned on its own (primary key
//! constraints, SQL Server default constraints, Oracle triggers). The
//! [`introspect`] module resolves them through the [`CatalogConnection`]
//! trait, which driver crates implement.

pub mod builder;
pub mod column;
pub mod dialect;
pub mod error;
pub mod introspect;
pub mod naming;

pub use column::{ColumnDef, ColumnType};
pub use dialect::{DbVersion, Dialect, DialectKind, UniqueNullsPolicy};
pub use error::{DdlError, Result};
pub use introspect::CatalogConnection;
pub use naming::NamingLimits;
