//! Catalog lookups through a hand-written `CatalogConnection`.

use std::collections::HashMap;

use oxide_ddl_core::builder::{DropMsSqlDefaultConstraintsBuilder, DropPrimaryKeyBuilder};
use oxide_ddl_core::column::integer;
use oxide_ddl_core::introspect::{Row, primary_key, trigger, version};
use oxide_ddl_core::{CatalogConnection, DdlError, Dialect, DialectKind};

#[derive(Debug, thiserror::Error)]
#[error("catalog unavailable")]
struct Unavailable;

/// Serves rows for queries containing a given fragment.
#[derive(Default)]
struct ScriptedCatalog {
    answers: HashMap<&'static str, Vec<Row>>,
}

impl ScriptedCatalog {
    fn answer(mut self, fragment: &'static str, value: &str) -> Self {
        self.answers
            .insert(fragment, vec![vec![Some(value.to_string())]]);
        self
    }
}

impl CatalogConnection for ScriptedCatalog {
    type Error = Unavailable;

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>, Unavailable> {
        if self.answers.is_empty() {
            return Err(Unavailable);
        }
        Ok(self
            .answers
            .iter()
            .find(|(fragment, _)| sql.contains(*fragment))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}

#[tokio::test]
async fn test_drop_primary_key_with_found_names() {
    let dialect = Dialect::oracle();
    let conn = ScriptedCatalog::default()
        .answer("user_constraints", "SYS_C0012345")
        .answer("user_triggers", "ISSUES_IDT");

    let constraint = primary_key::constraint_name(&dialect, &conn, "issues")
        .await
        .unwrap();
    let trigger = trigger::find_trigger_name(&dialect, &conn, "issues")
        .await
        .unwrap()
        .unwrap();

    let statements = DropPrimaryKeyBuilder::new(&dialect, "issues", constraint)
        .unwrap()
        .auto_increment_column(integer("id").not_null().build().unwrap())
        .with_trigger_name(trigger)
        .build()
        .unwrap();
    assert_eq!(statements.len(), 3);
    assert!(statements[0].contains("DROP TRIGGER \"ISSUES_IDT\""));
    assert_eq!(
        statements[2],
        "ALTER TABLE issues DROP CONSTRAINT \"SYS_C0012345\" DROP INDEX"
    );
}

#[tokio::test]
async fn test_missing_primary_key_is_not_found() {
    let conn = ScriptedCatalog::default().answer("user_triggers", "ISSUES_IDT");
    for kind in DialectKind::ALL {
        let err = primary_key::constraint_name(&Dialect::new(kind), &conn, "issues")
            .await
            .unwrap_err();
        assert!(matches!(err, DdlError::NotFound(_)), "{kind}");
    }
}

#[tokio::test]
async fn test_driver_errors_surface_unchanged() {
    let conn = ScriptedCatalog::default();
    let err = version::server_version(&conn).await.unwrap_err();
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "catalog unavailable");

    let err = DropMsSqlDefaultConstraintsBuilder::new(&Dialect::mssql(), "issues")
        .unwrap()
        .add_column("kee")
        .build(&conn)
        .await
        .unwrap_err();
    assert!(matches!(err, DdlError::Catalog(_)));
}

#[tokio::test]
async fn test_probed_version_drives_unique_indexes() {
    let conn = ScriptedCatalog::default().answer("server_version", "15.6");
    let dialect = version::probe_postgresql(&conn).await.unwrap();
    assert!(dialect.supports_nulls_not_distinct());
}
