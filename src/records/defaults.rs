//! # Default Values
//!
//! `DefaultValueMap` maps column positions to the value a `RowBuilder`
//! backfills when the caller skips that column. An explicit NULL default is
//! allowed and distinct from "no default".
//!
//! The map is built once per table and shared read-only by every builder
//! created from the same schema. Cloning it only bumps a reference count.
//!
//! ## Literal Defaults
//!
//! Catalogs usually hand defaults over as text. `from_literals` parses them
//! against the column types:
//!
//! | Column type | Accepted literal |
//! |-------------|------------------|
//! | any | `null` (case-insensitive) |
//! | bool | `true`, `false`, `1`, `0` |
//! | int16/int32/int64/timestamp | base-10 integer |
//! | float/double | decimal number |
//! | date | `YYYY-MM-DD` or a packed integer |
//! | string/varchar | raw text, optional surrounding single quotes stripped |

use std::borrow::Cow;
use std::sync::Arc;

use eyre::{bail, Result, WrapErr};
use hashbrown::HashMap;

use crate::records::schema::Schema;
use crate::types::{pack_date, DataType, Value};

#[derive(Debug, Clone, Default)]
pub struct DefaultValueMap {
    values: Arc<HashMap<usize, Value<'static>>>,
    string_budget: usize,
}

impl DefaultValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (usize, Value<'static>)>,
    {
        let values: HashMap<usize, Value<'static>> = values.into_iter().collect();
        let string_budget = values
            .values()
            .filter_map(|v| v.as_str().map(str::len))
            .sum();
        Self {
            values: Arc::new(values),
            string_budget,
        }
    }

    /// Parses textual defaults against `schema`'s column types.
    pub fn from_literals<'s, I>(schema: &Schema, literals: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, &'s str)>,
    {
        let mut values = Vec::new();
        for (position, literal) in literals {
            let column = schema.column(position).ok_or_else(|| {
                eyre::eyre!(
                    "default for column {} but schema has {} columns",
                    position,
                    schema.column_count()
                )
            })?;
            let value = parse_literal(column.data_type(), literal).wrap_err_with(|| {
                format!(
                    "invalid default '{}' for column '{}' ({})",
                    literal,
                    column.name(),
                    column.data_type()
                )
            })?;
            values.push((position, value));
        }
        Ok(Self::from_values(values))
    }

    pub fn get(&self, position: usize) -> Option<&Value<'static>> {
        self.values.get(&position)
    }

    pub fn contains(&self, position: usize) -> bool {
        self.values.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total bytes of all string defaults. Builders reserve this on top of
    /// the caller's variable-length budget.
    pub fn string_budget(&self) -> usize {
        self.string_budget
    }
}

fn parse_literal(data_type: DataType, literal: &str) -> Result<Value<'static>> {
    let trimmed = literal.trim();
    if trimmed.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }

    Ok(match data_type {
        DataType::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            other => bail!("expected boolean, got '{}'", other),
        },
        DataType::Int16 => Value::Int16(trimmed.parse()?),
        DataType::Int32 => Value::Int32(trimmed.parse()?),
        DataType::Int64 => Value::Int64(trimmed.parse()?),
        DataType::Timestamp => Value::Timestamp(trimmed.parse()?),
        DataType::Float => Value::Float(trimmed.parse()?),
        DataType::Double => Value::Double(trimmed.parse()?),
        DataType::Date => Value::Date(parse_date(trimmed)?),
        DataType::String | DataType::Varchar => {
            let text = literal
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .unwrap_or(literal);
            Value::String(Cow::Owned(text.to_string()))
        }
    })
}

fn parse_date(literal: &str) -> Result<u32> {
    if let Ok(packed) = literal.parse::<u32>() {
        return Ok(packed);
    }
    let mut parts = literal.splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected YYYY-MM-DD, got '{}'", literal);
    };
    Ok(pack_date(y.parse()?, m.parse()?, d.parse()?)?)
}
