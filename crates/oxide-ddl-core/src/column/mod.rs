//! Typed column definitions.
//!
//! A [`ColumnDef`] is a name, a nullability flag and one of a closed set of
//! column types. Values are only obtainable through the per-type builders in
//! [`builder`], which check required settings, so a `ColumnDef` is always
//! complete once constructed.

mod builder;

pub use builder::{
    BigIntegerSpec, BlobSpec, BooleanSpec, ClobSpec, ColumnDefBuilder, ColumnSpec, DecimalSpec,
    IntegerSpec, TinyIntSpec, VarcharSpec, big_integer, blob, boolean, clob, decimal, integer,
    tiny_int, varchar,
};

/// Length at and above which a VARCHAR length stops being meaningful for
/// index key hints.
pub const VARCHAR_MAX_SIZE: u32 = 4000;

/// Default precision of DECIMAL columns.
pub const DEFAULT_DECIMAL_PRECISION: u8 = 38;

/// Default scale of DECIMAL columns.
pub const DEFAULT_DECIMAL_SCALE: u8 = 20;

/// The type of a column, with its type-specific settings and default value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    /// Boolean column.
    Boolean {
        /// Default value.
        default: Option<bool>,
    },
    /// 32-bit integer column.
    Integer {
        /// Default value.
        default: Option<i32>,
    },
    /// 64-bit integer column.
    BigInteger {
        /// Default value.
        default: Option<i64>,
    },
    /// Small integer column (0..=255 on every engine).
    TinyInt {
        /// Default value.
        default: Option<u8>,
    },
    /// Fixed-point decimal column.
    Decimal {
        /// Total number of digits.
        precision: u8,
        /// Number of digits after the decimal point.
        scale: u8,
        /// Default value.
        default: Option<f64>,
    },
    /// Variable-length character column.
    Varchar {
        /// Maximum number of characters.
        limit: u32,
        /// Render the Oracle type with byte rather than character semantics.
        ignore_oracle_unit: bool,
        /// Default value.
        default: Option<String>,
    },
    /// Character large object.
    Clob,
    /// Binary large object.
    Blob,
}

impl ColumnType {
    /// Returns whether a default value is set.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        match self {
            Self::Boolean { default } => default.is_some(),
            Self::Integer { default } => default.is_some(),
            Self::BigInteger { default } => default.is_some(),
            Self::TinyInt { default } => default.is_some(),
            Self::Decimal { default, .. } => default.is_some(),
            Self::Varchar { default, .. } => default.is_some(),
            Self::Clob | Self::Blob => false,
        }
    }

    /// Returns whether the type can back an auto-increment column.
    #[must_use]
    pub const fn is_auto_incrementable(&self) -> bool {
        matches!(self, Self::Integer { .. } | Self::BigInteger { .. })
    }
}

/// A complete, validated column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    name: String,
    nullable: bool,
    column_type: ColumnType,
}

impl ColumnDef {
    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the column accepts NULL.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the column type.
    #[must_use]
    pub const fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    /// Returns whether a default value is set.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.column_type.has_default()
    }
}
