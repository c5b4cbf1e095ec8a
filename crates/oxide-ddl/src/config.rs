//! Dialect resolution from command-line settings.

use std::path::Path;

use anyhow::{Context, bail};
use oxide_ddl_core::{DbVersion, Dialect, DialectKind, NamingLimits};
use oxide_ddl_sqlx::{CatalogPool, dialect_kind_for_url};
use tracing::warn;

/// Reads identifier length limits from a JSON file. Missing keys keep their
/// default value.
///
/// # Errors
///
/// Fails when the file cannot be read or is not a valid limits object.
pub fn load_naming_limits(path: &Path) -> anyhow::Result<NamingLimits> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read naming limits from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid naming limits in {}", path.display()))
}

/// Settings a dialect is resolved from.
#[derive(Debug, Default)]
pub struct DialectSettings<'a> {
    pub kind: Option<DialectKind>,
    pub pg_version: Option<DbVersion>,
    pub database_url: Option<&'a str>,
    pub naming_limits: Option<NamingLimits>,
}

impl DialectSettings<'_> {
    /// Engine named explicitly, or implied by the database URL.
    ///
    /// # Errors
    ///
    /// Fails when neither is given or the URL scheme is unsupported.
    pub fn kind(&self) -> anyhow::Result<DialectKind> {
        match (self.kind, self.database_url) {
            (Some(kind), _) => Ok(kind),
            (None, Some(url)) => Ok(dialect_kind_for_url(url)?),
            (None, None) => bail!("--dialect is required when no --database-url is given"),
        }
    }

    /// Resolves the dialect without touching the network.
    ///
    /// Returns `None` when the PostgreSQL version must be probed.
    ///
    /// # Errors
    ///
    /// As [`Self::kind`].
    pub fn resolve_offline(&self) -> anyhow::Result<Option<Dialect>> {
        let kind = self.kind()?;
        let dialect = match (kind, self.pg_version) {
            (DialectKind::PostgreSql, Some(version)) => Dialect::postgresql(version),
            (DialectKind::PostgreSql, None) if self.database_url.is_some() => return Ok(None),
            (DialectKind::PostgreSql, None) => {
                warn!("No PostgreSQL version given, assuming a server older than 15");
                Dialect::new(kind)
            }
            _ => Dialect::new(kind),
        };
        Ok(Some(self.apply_limits(dialect)))
    }

    /// Resolves the dialect, probing the server version when needed.
    ///
    /// # Errors
    ///
    /// As [`Self::kind`], or when the server cannot be reached or reports an
    /// unreadable version.
    pub async fn resolve(&self) -> anyhow::Result<Dialect> {
        if let Some(dialect) = self.resolve_offline()? {
            return Ok(dialect);
        }
        let url = self
            .database_url
            .context("--database-url is required to probe the server")?;
        let pool = CatalogPool::connect(url).await?;
        let dialect = pool.dialect().await;
        pool.close().await;
        Ok(self.apply_limits(dialect?))
    }

    fn apply_limits(&self, mut dialect: Dialect) -> Dialect {
        if let Some(limits) = self.naming_limits {
            dialect = dialect.with_naming_limits(limits);
        }
        dialect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_ddl_core::UniqueNullsPolicy;
    use std::io::Write;

    #[test]
    fn test_load_partial_naming_limits() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "table": 64, "column": 30 }}"#).unwrap();
        let limits = load_naming_limits(file.path()).unwrap();
        assert_eq!(limits.table, 64);
        assert_eq!(limits.column, Some(30));
        assert_eq!(limits.constraint, NamingLimits::default().constraint);
    }

    #[test]
    fn test_load_invalid_naming_limits() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "table = 64").unwrap();
        let err = load_naming_limits(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid naming limits"));
    }

    #[test]
    fn test_kind_from_url() {
        let settings = DialectSettings {
            database_url: Some("mysql://root@localhost/app"),
            ..Default::default()
        };
        assert_eq!(settings.kind().unwrap(), DialectKind::MySql);
        assert!(DialectSettings::default().kind().is_err());
    }

    #[test]
    fn test_explicit_dialect_wins_over_url() {
        let settings = DialectSettings {
            kind: Some(DialectKind::Oracle),
            database_url: Some("postgres://localhost/app"),
            ..Default::default()
        };
        let dialect = settings.resolve_offline().unwrap().unwrap();
        assert_eq!(dialect.kind(), DialectKind::Oracle);
    }

    #[test]
    fn test_postgresql_version_resolution() {
        let settings = DialectSettings {
            kind: Some(DialectKind::PostgreSql),
            pg_version: Some(DbVersion::new(15, 1)),
            ..Default::default()
        };
        let dialect = settings.resolve_offline().unwrap().unwrap();
        assert_eq!(dialect.unique_nulls_policy(), UniqueNullsPolicy::NullsNotDistinct);

        let settings = DialectSettings {
            kind: Some(DialectKind::PostgreSql),
            ..Default::default()
        };
        let dialect = settings.resolve_offline().unwrap().unwrap();
        assert_eq!(dialect.unique_nulls_policy(), UniqueNullsPolicy::CoalesceNullable);

        let settings = DialectSettings {
            database_url: Some("postgres://localhost/app"),
            ..Default::default()
        };
        assert!(settings.resolve_offline().unwrap().is_none());
    }

    #[test]
    fn test_naming_limits_applied() {
        let limits = NamingLimits {
            table: 64,
            ..NamingLimits::default()
        };
        let settings = DialectSettings {
            kind: Some(DialectKind::H2),
            naming_limits: Some(limits),
            ..Default::default()
        };
        let dialect = settings.resolve_offline().unwrap().unwrap();
        assert_eq!(dialect.naming_limits().table, 64);
    }
}
