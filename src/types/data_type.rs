//! # Column Data Types
//!
//! `DataType` is the closed set of scalar types a column may declare. It is
//! `#[repr(u8)]` so the discriminant fits a single byte.
//!
//! ## Type Categories
//!
//! | Category | Types | Fixed Size |
//! |----------|-------|------------|
//! | **Boolean** | Bool | 1 byte |
//! | **Integer** | Int16, Int32, Int64 | 2, 4, 8 bytes |
//! | **Float** | Float, Double | 4, 8 bytes |
//! | **Date/Time** | Date, Timestamp | 4, 8 bytes |
//! | **Text** | String, Varchar | Variable |
//!
//! ## Usage
//!
//! ```ignore
//! use rowpack::types::DataType;
//!
//! let dt = DataType::Int64;
//! assert_eq!(dt.fixed_size(), Some(8));
//! assert!(!dt.is_variable());
//! ```

/// Scalar type declared by a column.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool = 0,
    Int16 = 1,
    Int32 = 2,
    Int64 = 3,
    Float = 4,
    Double = 5,
    Date = 6,
    Timestamp = 7,

    String = 20,
    Varchar = 21,
}

impl DataType {
    /// Width of the type in the fixed region, `None` for variable-length types.
    pub const fn fixed_size(&self) -> Option<usize> {
        match self {
            DataType::Bool => Some(1),
            DataType::Int16 => Some(2),
            DataType::Int32 | DataType::Float | DataType::Date => Some(4),
            DataType::Int64 | DataType::Double | DataType::Timestamp => Some(8),
            DataType::String | DataType::Varchar => None,
        }
    }

    pub const fn is_variable(&self) -> bool {
        self.fixed_size().is_none()
    }

    pub const fn is_text(&self) -> bool {
        matches!(self, DataType::String | DataType::Varchar)
    }

    /// True for the types that accept a numeric cast in lenient mode.
    pub const fn is_numeric(&self) -> bool {
        !self.is_text()
    }

    /// Whether a value of type `other` may be stored in a column of this type
    /// without any conversion.
    pub const fn is_exact_match(&self, other: DataType) -> bool {
        (*self as u8) == (other as u8) || (self.is_text() && other.is_text())
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DataType::Bool),
            1 => Some(DataType::Int16),
            2 => Some(DataType::Int32),
            3 => Some(DataType::Int64),
            4 => Some(DataType::Float),
            5 => Some(DataType::Double),
            6 => Some(DataType::Date),
            7 => Some(DataType::Timestamp),
            20 => Some(DataType::String),
            21 => Some(DataType::Varchar),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
            DataType::String => "string",
            DataType::Varchar => "varchar",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
