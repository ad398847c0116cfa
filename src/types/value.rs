//! # Runtime Value Representation
//!
//! `Value<'a>` is the tagged union of every scalar a row can hold. Text uses
//! `Cow` so values decoded from a packed row borrow straight from its buffer,
//! while values supplied by callers (defaults, appends) may own their data.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | Column types |
//! |---------|-----------|--------------|
//! | Null | - | any |
//! | Bool | bool | bool |
//! | Int16 | i16 | int16 |
//! | Int32 | i32 | int32 |
//! | Int64 | i64 | int64 |
//! | Float | f32 | float |
//! | Double | f64 | double |
//! | Date | u32 (packed) | date |
//! | Timestamp | i64 | timestamp |
//! | String | Cow<str> | string, varchar |
//!
//! The same variant set drives both explicit appends and default backfill, so
//! the two paths cannot encode a type differently.

use std::borrow::Cow;

use super::DataType;

#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Date(u32),
    Timestamp(i64),
    String(Cow<'a, str>),
}

impl<'a> Value<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type carried by the value, `None` for NULL.
    pub fn data_type(&self) -> Option<DataType> {
        Some(match self {
            Value::Null => return None,
            Value::Bool(_) => DataType::Bool,
            Value::Int16(_) => DataType::Int16,
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Date(_) => DataType::Date,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::String(_) => DataType::String,
        })
    }

    pub fn text(value: impl Into<Cow<'a, str>>) -> Self {
        Value::String(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of a numeric value. Floats truncate toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(*b as i64),
            Value::Int16(v) => Some(*v as i64),
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) | Value::Timestamp(v) => Some(*v),
            Value::Date(v) => Some(*v as i64),
            Value::Float(v) => Some(*v as i64),
            Value::Double(v) => Some(*v as i64),
            Value::Null | Value::String(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Textual form used in composite index keys: base-10 for numerics,
    /// `true`/`false` for booleans, the literal text for strings. NULL has
    /// no key form.
    pub fn key_string(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
            Value::Int16(v) => Some(v.to_string()),
            Value::Int32(v) => Some(v.to_string()),
            Value::Int64(v) | Value::Timestamp(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::Double(v) => Some(v.to_string()),
            Value::Date(v) => Some(v.to_string()),
            Value::String(s) => Some(s.to_string()),
        }
    }

    /// Converts the value into the storage representation of `target`.
    ///
    /// Returns `None` when the value cannot live in that column's layout at
    /// all (text into a fixed-width column or the reverse). NULL converts to
    /// NULL for every target.
    pub fn cast_to(&self, target: DataType) -> Option<Value<'a>> {
        if self.is_null() {
            return Some(Value::Null);
        }
        if let Some(actual) = self.data_type() {
            if target.is_exact_match(actual) {
                return Some(self.clone());
            }
        }
        if target.is_text() {
            return None;
        }
        let float_source = matches!(self, Value::Float(_) | Value::Double(_));
        Some(match target {
            DataType::Bool => Value::Bool(if float_source {
                self.as_f64()? != 0.0
            } else {
                self.as_i64()? != 0
            }),
            DataType::Int16 => Value::Int16(self.as_i64()? as i16),
            DataType::Int32 => Value::Int32(self.as_i64()? as i32),
            DataType::Int64 => Value::Int64(self.as_i64()?),
            DataType::Timestamp => Value::Timestamp(self.as_i64()?),
            DataType::Date => Value::Date(self.as_i64()? as u32),
            DataType::Float => Value::Float(self.as_f64()? as f32),
            DataType::Double => Value::Double(self.as_f64()?),
            DataType::String | DataType::Varchar => return None,
        })
    }

    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(v),
            Value::Int16(v) => Value::Int16(v),
            Value::Int32(v) => Value::Int32(v),
            Value::Int64(v) => Value::Int64(v),
            Value::Float(v) => Value::Float(v),
            Value::Double(v) => Value::Double(v),
            Value::Date(v) => Value::Date(v),
            Value::Timestamp(v) => Value::Timestamp(v),
            Value::String(s) => Value::String(Cow::Owned(s.into_owned())),
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value<'_> {
    fn from(v: i16) -> Self {
        Value::Int16(v)
    }
}

impl From<i32> for Value<'_> {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value<'_> {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f32> for Value<'_> {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::String(Cow::Borrowed(v))
    }
}

impl From<String> for Value<'_> {
    fn from(v: String) -> Self {
        Value::String(Cow::Owned(v))
    }
}
