//! Catalog lookups on a live database.
//!
//! Some drops need names the database chose by itself. The lookups here run
//! one read-only catalog query each through [`CatalogConnection`], which
//! driver crates (oxide-ddl-sqlx, ...) implement so this crate stays
//! driver-agnostic.
//!
//! Table names are validated before being embedded in a query.

pub mod default_constraint;
pub mod primary_key;
pub mod trigger;
pub mod version;

use std::future::Future;

use tracing::debug;

use crate::error::{DdlError, Result};

/// One result row: every column as nullable text.
pub type Row = Vec<Option<String>>;

/// A connection able to answer read-only catalog queries.
pub trait CatalogConnection {
    /// Error type of the underlying driver.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs `sql` and returns every row, each cell converted to text.
    fn fetch_rows(
        &self,
        sql: &str,
    ) -> impl Future<Output = std::result::Result<Vec<Row>, Self::Error>> + Send;
}

/// Runs a catalog query, wrapping driver failures without classifying them.
async fn query<C: CatalogConnection>(conn: &C, sql: &str) -> Result<Vec<Row>> {
    debug!(sql = %sql, "Querying catalog");
    conn.fetch_rows(sql).await.map_err(DdlError::catalog)
}

/// First cell of the first row, if any.
fn first_value(rows: Vec<Row>) -> Option<String> {
    rows.into_iter().next()?.into_iter().next()?
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::{CatalogConnection, Row};

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    pub struct FakeError;

    /// Answers queries from canned rows and records what was asked.
    #[derive(Debug, Default)]
    pub struct FakeCatalog {
        answers: HashMap<String, Vec<Row>>,
        pub queries: Mutex<Vec<String>>,
        pub fail: bool,
    }

    impl FakeCatalog {
        pub fn with_answer(mut self, sql: impl Into<String>, rows: Vec<Row>) -> Self {
            self.answers.insert(sql.into(), rows);
            self
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn row(cells: &[&str]) -> Row {
            cells.iter().map(|c| Some((*c).to_string())).collect()
        }
    }

    impl CatalogConnection for FakeCatalog {
        type Error = FakeError;

        async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>, FakeError> {
            self.queries.lock().unwrap().push(sql.to_string());
            if self.fail {
                return Err(FakeError);
            }
            Ok(self.answers.get(sql).cloned().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeCatalog;
    use super::*;

    #[test]
    fn test_first_value() {
        assert_eq!(first_value(vec![]), None);
        assert_eq!(first_value(vec![vec![None]]), None);
        assert_eq!(
            first_value(vec![FakeCatalog::row(&["a", "b"]), FakeCatalog::row(&["c"])]),
            Some("a".to_string())
        );
    }

    #[tokio::test]
    async fn test_driver_errors_are_wrapped() {
        let conn = FakeCatalog::failing();
        let err = query(&conn, "SELECT 1").await.unwrap_err();
        assert!(matches!(err, DdlError::Catalog(_)));
        assert_eq!(err.to_string(), "Catalog query failed: connection refused");
    }
}
