//! # Type System
//!
//! ## Module Structure
//!
//! - `data_type`: the closed `DataType` enum and its fixed widths
//! - `value`: runtime `Value<'a>` with zero-copy text
//! - `column`: `ColumnDef` with timestamp/index flags
//! - `date`: packed date encoding
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `DataType` | Declared column type |
//! | `Value<'a>` | One scalar, borrowed from a row or owned |
//! | `ColumnDef` | Column name, type and flags |

mod column;
mod data_type;
mod date;
mod value;

pub use column::ColumnDef;
pub use data_type::DataType;
pub use date::{pack_date, unpack_date};
pub use value::Value;
