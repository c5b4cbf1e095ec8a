#![allow(dead_code)]

use oxide_ddl_core::{DbVersion, Dialect, DialectKind};

/// PostgreSQL server older than the `NULLS NOT DISTINCT` release.
pub fn postgresql_14() -> Dialect {
    Dialect::postgresql(DbVersion::new(14, 11))
}

/// PostgreSQL server accepting `NULLS NOT DISTINCT`.
pub fn postgresql_15() -> Dialect {
    Dialect::postgresql(DbVersion::new(15, 0))
}

/// One dialect per engine.
pub fn all_dialects() -> Vec<Dialect> {
    DialectKind::ALL
        .into_iter()
        .map(|kind| match kind {
            DialectKind::PostgreSql => postgresql_14(),
            other => Dialect::new(other),
        })
        .collect()
}

/// Builds twice and checks both runs agree before returning the statements.
pub fn build_twice<F>(dialect: &Dialect, build: F) -> Vec<String>
where
    F: Fn() -> oxide_ddl_core::Result<Vec<String>>,
{
    let first = build().unwrap_or_else(|e| panic!("build failed on {dialect}: {e}"));
    let second = build().unwrap_or_else(|e| panic!("second build failed on {dialect}: {e}"));
    assert_eq!(first, second, "build is not repeatable on {dialect}");
    first
}
