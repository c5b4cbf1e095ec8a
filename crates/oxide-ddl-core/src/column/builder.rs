//! Per-type column definition builders.
//!
//! Each column type has its own settings type (`VarcharSpec`, `DecimalSpec`,
//! ...), so only the setters that make sense for that type exist, and a
//! default value always has the type of its column.
//!
//! # Example
//!
//! ```rust
//! use oxide_ddl_core::column::{boolean, varchar};
//!
//! let status = varchar("status").limit(1).not_null().default_value("P").build()?;
//! let enabled = boolean("enabled").not_null().default_value(true).build()?;
//!
//! assert_eq!(status.name(), "status");
//! assert!(!enabled.is_nullable());
//! # Ok::<(), oxide_ddl_core::DdlError>(())
//! ```

use super::{ColumnDef, ColumnType, DEFAULT_DECIMAL_PRECISION, DEFAULT_DECIMAL_SCALE};
use crate::error::{DdlError, Result};
use crate::naming::{NamingLimits, validate_column_name};

/// Type-specific settings of a column under construction.
pub trait ColumnSpec {
    /// Checks the settings and turns them into a [`ColumnType`].
    fn into_column_type(self) -> Result<ColumnType>;
}

/// Column definition builder, parameterized by the column type settings.
///
/// Columns are nullable unless [`not_null`](Self::not_null) is called.
#[derive(Debug, Clone)]
pub struct ColumnDefBuilder<S> {
    name: String,
    nullable: bool,
    spec: S,
}

impl<S: ColumnSpec> ColumnDefBuilder<S> {
    fn new(name: impl Into<String>, spec: S) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            spec,
        }
    }

    /// Sets whether the column accepts NULL.
    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub const fn not_null(self) -> Self {
        self.nullable(false)
    }

    /// Builds the column definition.
    ///
    /// # Errors
    ///
    /// Fails when the name is not a valid column identifier or when a
    /// type-specific setting is missing or out of range.
    pub fn build(self) -> Result<ColumnDef> {
        let name = validate_column_name(&self.name, &NamingLimits::default())?;
        Ok(ColumnDef {
            name,
            nullable: self.nullable,
            column_type: self.spec.into_column_type()?,
        })
    }
}

/// Settings of a BOOLEAN column.
#[derive(Debug, Clone, Default)]
pub struct BooleanSpec {
    default: Option<bool>,
}

impl ColumnSpec for BooleanSpec {
    fn into_column_type(self) -> Result<ColumnType> {
        Ok(ColumnType::Boolean {
            default: self.default,
        })
    }
}

impl ColumnDefBuilder<BooleanSpec> {
    /// Sets the default value.
    #[must_use]
    pub const fn default_value(mut self, value: bool) -> Self {
        self.spec.default = Some(value);
        self
    }
}

/// Settings of an INTEGER column.
#[derive(Debug, Clone, Default)]
pub struct IntegerSpec {
    default: Option<i32>,
}

impl ColumnSpec for IntegerSpec {
    fn into_column_type(self) -> Result<ColumnType> {
        Ok(ColumnType::Integer {
            default: self.default,
        })
    }
}

impl ColumnDefBuilder<IntegerSpec> {
    /// Sets the default value.
    #[must_use]
    pub const fn default_value(mut self, value: i32) -> Self {
        self.spec.default = Some(value);
        self
    }
}

/// Settings of a BIGINT column.
#[derive(Debug, Clone, Default)]
pub struct BigIntegerSpec {
    default: Option<i64>,
}

impl ColumnSpec for BigIntegerSpec {
    fn into_column_type(self) -> Result<ColumnType> {
        Ok(ColumnType::BigInteger {
            default: self.default,
        })
    }
}

impl ColumnDefBuilder<BigIntegerSpec> {
    /// Sets the default value.
    #[must_use]
    pub const fn default_value(mut self, value: i64) -> Self {
        self.spec.default = Some(value);
        self
    }
}

/// Settings of a TINYINT column.
#[derive(Debug, Clone, Default)]
pub struct TinyIntSpec {
    default: Option<u8>,
}

impl ColumnSpec for TinyIntSpec {
    fn into_column_type(self) -> Result<ColumnType> {
        Ok(ColumnType::TinyInt {
            default: self.default,
        })
    }
}

impl ColumnDefBuilder<TinyIntSpec> {
    /// Sets the default value.
    #[must_use]
    pub const fn default_value(mut self, value: u8) -> Self {
        self.spec.default = Some(value);
        self
    }
}

/// Settings of a DECIMAL column. Precision and scale default to 38 and 20.
#[derive(Debug, Clone)]
pub struct DecimalSpec {
    precision: u8,
    scale: u8,
    default: Option<f64>,
}

impl Default for DecimalSpec {
    fn default() -> Self {
        Self {
            precision: DEFAULT_DECIMAL_PRECISION,
            scale: DEFAULT_DECIMAL_SCALE,
            default: None,
        }
    }
}

impl ColumnSpec for DecimalSpec {
    fn into_column_type(self) -> Result<ColumnType> {
        if self.precision == 0 || self.precision > DEFAULT_DECIMAL_PRECISION {
            return Err(DdlError::invalid_argument(format!(
                "Precision must be between 1 and {DEFAULT_DECIMAL_PRECISION}, got {}",
                self.precision
            )));
        }
        if self.scale > self.precision {
            return Err(DdlError::invalid_argument(format!(
                "Scale can't be greater than precision ({} > {})",
                self.scale, self.precision
            )));
        }
        Ok(ColumnType::Decimal {
            precision: self.precision,
            scale: self.scale,
            default: self.default,
        })
    }
}

impl ColumnDefBuilder<DecimalSpec> {
    /// Sets the precision.
    #[must_use]
    pub const fn precision(mut self, precision: u8) -> Self {
        self.spec.precision = precision;
        self
    }

    /// Sets the scale.
    #[must_use]
    pub const fn scale(mut self, scale: u8) -> Self {
        self.spec.scale = scale;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub const fn default_value(mut self, value: f64) -> Self {
        self.spec.default = Some(value);
        self
    }
}

/// Settings of a VARCHAR column. The limit is mandatory.
#[derive(Debug, Clone, Default)]
pub struct VarcharSpec {
    limit: Option<u32>,
    ignore_oracle_unit: bool,
    default: Option<String>,
}

impl ColumnSpec for VarcharSpec {
    fn into_column_type(self) -> Result<ColumnType> {
        let limit = self.limit.ok_or(DdlError::MissingValue("Limit"))?;
        if limit == 0 {
            return Err(DdlError::invalid_argument("Limit must be greater than 0"));
        }
        Ok(ColumnType::Varchar {
            limit,
            ignore_oracle_unit: self.ignore_oracle_unit,
            default: self.default,
        })
    }
}

impl ColumnDefBuilder<VarcharSpec> {
    /// Sets the maximum number of characters.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.spec.limit = Some(limit);
        self
    }

    /// Renders the Oracle type without the `CHAR` length semantics.
    #[must_use]
    pub const fn ignore_oracle_unit(mut self, ignore: bool) -> Self {
        self.spec.ignore_oracle_unit = ignore;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.spec.default = Some(value.into());
        self
    }
}

/// Settings of a CLOB column.
#[derive(Debug, Clone, Default)]
pub struct ClobSpec;

impl ColumnSpec for ClobSpec {
    fn into_column_type(self) -> Result<ColumnType> {
        Ok(ColumnType::Clob)
    }
}

/// Settings of a BLOB column.
#[derive(Debug, Clone, Default)]
pub struct BlobSpec;

impl ColumnSpec for BlobSpec {
    fn into_column_type(self) -> Result<ColumnType> {
        Ok(ColumnType::Blob)
    }
}

// =============================================================================
// Shorthand Functions
// =============================================================================

/// Creates a BOOLEAN column builder.
#[must_use]
pub fn boolean(name: impl Into<String>) -> ColumnDefBuilder<BooleanSpec> {
    ColumnDefBuilder::new(name, BooleanSpec::default())
}

/// Creates an INTEGER column builder.
#[must_use]
pub fn integer(name: impl Into<String>) -> ColumnDefBuilder<IntegerSpec> {
    ColumnDefBuilder::new(name, IntegerSpec::default())
}

/// Creates a BIGINT column builder.
#[must_use]
pub fn big_integer(name: impl Into<String>) -> ColumnDefBuilder<BigIntegerSpec> {
    ColumnDefBuilder::new(name, BigIntegerSpec::default())
}

/// Creates a TINYINT column builder.
#[must_use]
pub fn tiny_int(name: impl Into<String>) -> ColumnDefBuilder<TinyIntSpec> {
    ColumnDefBuilder::new(name, TinyIntSpec::default())
}

/// Creates a DECIMAL column builder.
#[must_use]
pub fn decimal(name: impl Into<String>) -> ColumnDefBuilder<DecimalSpec> {
    ColumnDefBuilder::new(name, DecimalSpec::default())
}

/// Creates a VARCHAR column builder. [`limit`](ColumnDefBuilder::limit) must
/// be called before building.
#[must_use]
pub fn varchar(name: impl Into<String>) -> ColumnDefBuilder<VarcharSpec> {
    ColumnDefBuilder::new(name, VarcharSpec::default())
}

/// Creates a CLOB column builder.
#[must_use]
pub fn clob(name: impl Into<String>) -> ColumnDefBuilder<ClobSpec> {
    ColumnDefBuilder::new(name, ClobSpec)
}

/// Creates a BLOB column builder.
#[must_use]
pub fn blob(name: impl Into<String>) -> ColumnDefBuilder<BlobSpec> {
    ColumnDefBuilder::new(name, BlobSpec)
}
