//! Database server versions.

use std::fmt;

use crate::error::{DdlError, Result};

/// Major/minor version reported by a database server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DbVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl DbVersion {
    /// Creates a version.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parses a server-reported version string such as `15.4`,
    /// `16.1 (Debian 16.1-1.pgdg120+1)` or `9.6.24`.
    ///
    /// Anything after the leading `major[.minor]` is ignored.
    ///
    /// # Errors
    ///
    /// Fails when `raw` does not start with a major version number.
    pub fn parse(raw: &str) -> Result<Self> {
        let numeric: &str = raw
            .trim()
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .next()
            .unwrap_or_default();
        let mut parts = numeric.split('.').filter(|p| !p.is_empty());
        let major = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| {
                DdlError::invalid_argument(format!("Can't parse database version '{raw}'"))
            })?;
        let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        Ok(Self { major, minor })
    }
}

impl fmt::Display for DbVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl std::str::FromStr for DbVersion {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
