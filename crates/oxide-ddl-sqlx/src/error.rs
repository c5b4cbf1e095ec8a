//! Error types for sqlx-backed catalog connections.

/// Errors raised while connecting to or querying a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Database error from the driver.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The URL scheme names no supported driver.
    #[error("Unsupported database URL '{0}': expected postgres://, postgresql:// or mysql://")]
    UnsupportedUrl(String),

    /// Error from the DDL engine (version parsing, dialect probing).
    #[error(transparent)]
    Ddl(#[from] oxide_ddl_core::DdlError),
}

/// Result type for catalog connections.
pub type Result<T> = std::result::Result<T, CatalogError>;
