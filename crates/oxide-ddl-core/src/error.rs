//! Error types for DDL generation.

/// Errors raised while configuring or building DDL statements.
#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    /// A builder is missing mandatory configuration (no columns, no table
    /// name, ...), or an engine-specific operation was used on another
    /// engine.
    #[error("{0}")]
    InvalidState(String),

    /// An invalid identifier or a disallowed combination of options.
    #[error("{0}")]
    InvalidArgument(String),

    /// A required value was never provided.
    #[error("{0} can't be null")]
    MissingValue(&'static str),

    /// A catalog lookup could not resolve the requested object.
    #[error("{0}")]
    NotFound(String),

    /// The live database failed while answering a catalog query.
    #[error("Catalog query failed: {0}")]
    Catalog(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DdlError {
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn catalog<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Catalog(Box::new(err))
    }
}

/// Result type for DDL generation.
pub type Result<T> = std::result::Result<T, DdlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value_message() {
        let err = DdlError::MissingValue("Identity column");
        assert_eq!(err.to_string(), "Identity column can't be null");
    }

    #[test]
    fn test_catalog_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection reset");
        let err = DdlError::catalog(io);
        let source = std::error::Error::source(&err).expect("source is kept");
        assert_eq!(source.to_string(), "connection reset");
    }
}
