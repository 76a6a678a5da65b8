//! Argument values bound to placeholders.
//!
//! [`SqlValue`] is the closed set of values the engine can carry, and
//! [`SqlArgument`] pairs a value with the [`DbType`] a driver should bind it as.
//! The `DbType` is inferred from the value unless given explicitly.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Database type a driver binds an argument as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    AnsiString,
    Binary,
    Boolean,
    Byte,
    Date,
    DateTime,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    Object,
    SByte,
    Single,
    String,
    Time,
    UInt16,
    UInt32,
    UInt64,
}

/// A value carried by a [`SqlArgument`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
    String(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DateTimeUtc(DateTime<Utc>),
}

impl SqlValue {
    /// Resolve the [`DbType`] for this value.
    pub fn db_type(&self) -> DbType {
        match self {
            SqlValue::Null => DbType::Object,
            SqlValue::Bool(_) => DbType::Boolean,
            SqlValue::I8(_) => DbType::SByte,
            SqlValue::I16(_) => DbType::Int16,
            SqlValue::I32(_) => DbType::Int32,
            SqlValue::I64(_) => DbType::Int64,
            SqlValue::U8(_) => DbType::Byte,
            SqlValue::U16(_) => DbType::UInt16,
            SqlValue::U32(_) => DbType::UInt32,
            SqlValue::U64(_) => DbType::UInt64,
            SqlValue::F32(_) => DbType::Single,
            SqlValue::F64(_) => DbType::Double,
            #[cfg(feature = "rust_decimal")]
            SqlValue::Decimal(_) => DbType::Decimal,
            SqlValue::String(_) => DbType::String,
            SqlValue::Bytes(_) => DbType::Binary,
            SqlValue::Uuid(_) => DbType::Guid,
            SqlValue::Date(_) => DbType::Date,
            SqlValue::Time(_) => DbType::Time,
            SqlValue::DateTime(_) => DbType::DateTime,
            SqlValue::DateTimeUtc(_) => DbType::DateTimeOffset,
        }
    }

    /// Check if this is `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

// Floats compare by bit pattern so that `Eq` and `Hash` agree.
impl PartialEq for SqlValue {
    fn eq(&self, other: &Self) -> bool {
        use SqlValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (I8(a), I8(b)) => a == b,
            (I16(a), I16(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (U8(a), U8(b)) => a == b,
            (U16(a), U16(b)) => a == b,
            (U32(a), U32(b)) => a == b,
            (U64(a), U64(b)) => a == b,
            (F32(a), F32(b)) => a.to_bits() == b.to_bits(),
            (F64(a), F64(b)) => a.to_bits() == b.to_bits(),
            #[cfg(feature = "rust_decimal")]
            (Decimal(a), Decimal(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Time(a), Time(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (DateTimeUtc(a), DateTimeUtc(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for SqlValue {}

impl Hash for SqlValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            SqlValue::Null => {}
            SqlValue::Bool(v) => v.hash(state),
            SqlValue::I8(v) => v.hash(state),
            SqlValue::I16(v) => v.hash(state),
            SqlValue::I32(v) => v.hash(state),
            SqlValue::I64(v) => v.hash(state),
            SqlValue::U8(v) => v.hash(state),
            SqlValue::U16(v) => v.hash(state),
            SqlValue::U32(v) => v.hash(state),
            SqlValue::U64(v) => v.hash(state),
            SqlValue::F32(v) => v.to_bits().hash(state),
            SqlValue::F64(v) => v.to_bits().hash(state),
            #[cfg(feature = "rust_decimal")]
            SqlValue::Decimal(v) => v.hash(state),
            SqlValue::String(v) => v.hash(state),
            SqlValue::Bytes(v) => v.hash(state),
            SqlValue::Uuid(v) => v.hash(state),
            SqlValue::Date(v) => v.hash(state),
            SqlValue::Time(v) => v.hash(state),
            SqlValue::DateTime(v) => v.hash(state),
            SqlValue::DateTimeUtc(v) => v.hash(state),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(v: $ty) -> Self {
                    SqlValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Vec<u8> => Bytes,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => DateTimeUtc,
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for SqlValue {
    fn from(v: rust_decimal::Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::String(v.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::String(v.clone())
    }
}

impl From<&[u8]> for SqlValue {
    fn from(v: &[u8]) -> Self {
        SqlValue::Bytes(v.to_vec())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// A value plus the database type it binds as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SqlArgument {
    value: SqlValue,
    db_type: DbType,
}

impl SqlArgument {
    /// Create an argument whose [`DbType`] is inferred from the value.
    pub fn new(value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        let db_type = value.db_type();
        Self { value, db_type }
    }

    /// Create an argument with an explicit [`DbType`] (e.g. a typed `NULL`).
    pub fn typed(value: impl Into<SqlValue>, db_type: DbType) -> Self {
        Self {
            value: value.into(),
            db_type,
        }
    }

    pub fn value(&self) -> &SqlValue {
        &self.value
    }

    pub fn db_type(&self) -> DbType {
        self.db_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_db_type_inference() {
        assert_eq!(SqlArgument::new(1).db_type(), DbType::Int32);
        assert_eq!(SqlArgument::new(1i64).db_type(), DbType::Int64);
        assert_eq!(SqlArgument::new("FOO").db_type(), DbType::String);
        assert_eq!(SqlArgument::new(true).db_type(), DbType::Boolean);
        assert_eq!(SqlArgument::new(1.5f64).db_type(), DbType::Double);
        assert_eq!(SqlArgument::new(Uuid::nil()).db_type(), DbType::Guid);
        assert_eq!(SqlArgument::new(vec![1u8, 2]).db_type(), DbType::Binary);
        assert_eq!(SqlArgument::new(None::<i32>).db_type(), DbType::Object);
    }

    #[test]
    fn test_explicit_db_type() {
        let arg = SqlArgument::typed(None::<String>, DbType::AnsiString);
        assert!(arg.value().is_null());
        assert_eq!(arg.db_type(), DbType::AnsiString);
    }

    #[test]
    fn test_null_equality_and_hash() {
        let a = SqlArgument::new(None::<i32>);
        let b = SqlArgument::new(SqlValue::Null);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_nan_is_reflexive() {
        let nan = SqlValue::F64(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_ne!(SqlValue::I32(1), SqlValue::I64(1));
    }
}
