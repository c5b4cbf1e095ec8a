//! # oxide-ddl-sqlx
//!
//! [`CatalogConnection`](oxide_ddl_core::CatalogConnection) implementations
//! backed by sqlx connection pools, so the catalog lookups of
//! `oxide-ddl-core` can run against a live PostgreSQL or MySQL server.
//!
//! [`CatalogPool::connect`] picks the driver from the URL scheme:
//!
//! ```rust,no_run
//! use oxide_ddl_core::introspect::primary_key;
//! use oxide_ddl_sqlx::CatalogPool;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = CatalogPool::connect("postgres://localhost/app").await?;
//! let dialect = pool.dialect().await?;
//! let name = primary_key::constraint_name(&dialect, &pool, "issues").await?;
//! println!("{name}");
//! # Ok(())
//! # }
//! ```

mod error;
mod pool;

pub use error::{CatalogError, Result};
pub use pool::{CatalogPool, MySqlCatalog, PgCatalog, dialect_kind_for_url};
