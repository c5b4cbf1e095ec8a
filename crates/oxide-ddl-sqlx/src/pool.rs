//! Catalog connections over sqlx pools.

use oxide_ddl_core::introspect::{Row as CatalogRow, version};
use oxide_ddl_core::{CatalogConnection, Dialect, DialectKind};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

/// Catalog lookups need a single connection at a time.
const MAX_CONNECTIONS: u32 = 1;

/// Returns the engine a database URL points to.
///
/// # Errors
///
/// Fails when the scheme is not `postgres`, `postgresql` or `mysql`.
pub fn dialect_kind_for_url(url: &str) -> Result<DialectKind> {
    let scheme = url.split_once("://").map_or("", |(scheme, _)| scheme);
    match scheme.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" => Ok(DialectKind::PostgreSql),
        "mysql" | "mariadb" => Ok(DialectKind::MySql),
        _ => Err(CatalogError::UnsupportedUrl(url.to_string())),
    }
}

// =============================================================================
// PostgreSQL
// =============================================================================

/// PostgreSQL catalog connection.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `url`.
    ///
    /// # Errors
    ///
    /// Fails when the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn pg_cells(row: &PgRow) -> std::result::Result<CatalogRow, sqlx::Error> {
    (0..row.len())
        .map(|i| row.try_get::<Option<String>, _>(i))
        .collect()
}

impl CatalogConnection for PgCatalog {
    type Error = sqlx::Error;

    async fn fetch_rows(&self, sql: &str) -> std::result::Result<Vec<CatalogRow>, sqlx::Error> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        rows.iter().map(pg_cells).collect()
    }
}

// =============================================================================
// MySQL
// =============================================================================

/// MySQL catalog connection.
#[derive(Debug, Clone)]
pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connects to `url`.
    ///
    /// # Errors
    ///
    /// Fails when the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// `information_schema` columns come back as binary strings on some servers.
fn mysql_cell(row: &MySqlRow, index: usize) -> std::result::Result<Option<String>, sqlx::Error> {
    match row.try_get::<Option<String>, _>(index) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnDecode { .. }) => Ok(row
            .try_get::<Option<Vec<u8>>, _>(index)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())),
        Err(err) => Err(err),
    }
}

impl CatalogConnection for MySqlCatalog {
    type Error = sqlx::Error;

    async fn fetch_rows(&self, sql: &str) -> std::result::Result<Vec<CatalogRow>, sqlx::Error> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| (0..row.len()).map(|i| mysql_cell(row, i)).collect())
            .collect()
    }
}

// =============================================================================
// CatalogPool
// =============================================================================

/// A catalog connection to whichever engine a URL points to.
#[derive(Debug, Clone)]
pub enum CatalogPool {
    /// PostgreSQL server.
    Postgres(PgCatalog),
    /// MySQL server.
    MySql(MySqlCatalog),
}

impl CatalogPool {
    /// Connects to `url`, choosing the driver from its scheme.
    ///
    /// # Errors
    ///
    /// Fails when the scheme is unsupported or the connection fails.
    pub async fn connect(url: &str) -> Result<Self> {
        let kind = dialect_kind_for_url(url)?;
        debug!(dialect = %kind, "Connecting to catalog");
        match kind {
            DialectKind::PostgreSql => Ok(Self::Postgres(PgCatalog::connect(url).await?)),
            DialectKind::MySql => Ok(Self::MySql(MySqlCatalog::connect(url).await?)),
            DialectKind::H2 | DialectKind::Oracle | DialectKind::MsSql => {
                Err(CatalogError::UnsupportedUrl(url.to_string()))
            }
        }
    }

    /// Returns the engine behind the pool.
    #[must_use]
    pub const fn kind(&self) -> DialectKind {
        match self {
            Self::Postgres(_) => DialectKind::PostgreSql,
            Self::MySql(_) => DialectKind::MySql,
        }
    }

    /// Returns the dialect of the server, probing the version on PostgreSQL.
    ///
    /// # Errors
    ///
    /// Fails when the version query fails.
    pub async fn dialect(&self) -> Result<Dialect> {
        let dialect = match self {
            Self::Postgres(catalog) => version::probe_postgresql(catalog).await?,
            Self::MySql(_) => Dialect::mysql(),
        };
        info!(dialect = %dialect, "Resolved dialect from server");
        Ok(dialect)
    }

    /// Closes every connection of the pool.
    pub async fn close(&self) {
        match self {
            Self::Postgres(catalog) => catalog.pool.close().await,
            Self::MySql(catalog) => catalog.pool.close().await,
        }
    }
}

impl CatalogConnection for CatalogPool {
    type Error = sqlx::Error;

    async fn fetch_rows(&self, sql: &str) -> std::result::Result<Vec<CatalogRow>, sqlx::Error> {
        match self {
            Self::Postgres(catalog) => catalog.fetch_rows(sql).await,
            Self::MySql(catalog) => catalog.fetch_rows(sql).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_kind_for_url() {
        assert_eq!(
            dialect_kind_for_url("postgres://localhost/app").unwrap(),
            DialectKind::PostgreSql
        );
        assert_eq!(
            dialect_kind_for_url("postgresql://u:p@db:5432/app").unwrap(),
            DialectKind::PostgreSql
        );
        assert_eq!(
            dialect_kind_for_url("mysql://root@localhost/app").unwrap(),
            DialectKind::MySql
        );
    }

    #[test]
    fn test_unsupported_urls() {
        for url in ["sqlite:db.sqlite3", "jdbc:h2:mem:test", "sqlserver://db", ""] {
            let err = dialect_kind_for_url(url).unwrap_err();
            assert!(matches!(err, CatalogError::UnsupportedUrl(_)), "{url}");
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_unsupported_scheme() {
        let err = CatalogPool::connect("oracle://db/orcl").await.unwrap_err();
        assert!(err.to_string().starts_with("Unsupported database URL"));
    }
}
