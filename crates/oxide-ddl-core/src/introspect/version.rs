//! Server version probing.

use tracing::info;

use super::{CatalogConnection, first_value, query};
use crate::dialect::{DbVersion, Dialect, DialectKind};
use crate::error::{DdlError, Result};

/// Query returning the PostgreSQL server version.
pub const POSTGRES_VERSION_QUERY: &str = "SHOW server_version";

/// Reads the version of a PostgreSQL server.
///
/// # Errors
///
/// Fails when the query fails, returns nothing, or returns an unparsable
/// version.
pub async fn server_version<C: CatalogConnection>(conn: &C) -> Result<DbVersion> {
    let raw = first_value(query(conn, POSTGRES_VERSION_QUERY).await?)
        .ok_or_else(|| DdlError::NotFound("Server did not report its version".to_string()))?;
    DbVersion::parse(&raw)
}

/// Builds the PostgreSQL dialect matching the server behind `conn`.
///
/// The version is read once here; dialect values never query again.
///
/// # Errors
///
/// As [`server_version`].
pub async fn probe_postgresql<C: CatalogConnection>(conn: &C) -> Result<Dialect> {
    let version = server_version(conn).await?;
    let dialect = Dialect::new(DialectKind::PostgreSql).with_version(version);
    info!(version = %version, nulls_not_distinct = dialect.supports_nulls_not_distinct(), "Probed PostgreSQL server");
    Ok(dialect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::UniqueNullsPolicy;
    use crate::introspect::testing::FakeCatalog;

    #[tokio::test]
    async fn test_probe_recent_server() {
        let conn = FakeCatalog::default().with_answer(
            POSTGRES_VERSION_QUERY,
            vec![FakeCatalog::row(&["16.2 (Debian 16.2-1.pgdg120+2)"])],
        );
        let dialect = probe_postgresql(&conn).await.unwrap();
        assert_eq!(dialect.version(), Some(DbVersion::new(16, 2)));
        assert_eq!(dialect.unique_nulls_policy(), UniqueNullsPolicy::NullsNotDistinct);
    }

    #[tokio::test]
    async fn test_probe_old_server() {
        let conn = FakeCatalog::default()
            .with_answer(POSTGRES_VERSION_QUERY, vec![FakeCatalog::row(&["11.22"])]);
        let dialect = probe_postgresql(&conn).await.unwrap();
        assert_eq!(dialect.unique_nulls_policy(), UniqueNullsPolicy::CoalesceNullable);
    }

    #[tokio::test]
    async fn test_missing_version() {
        let err = server_version(&FakeCatalog::default()).await.unwrap_err();
        assert!(matches!(err, DdlError::NotFound(_)));
    }
}
