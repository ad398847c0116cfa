//! # Row Builder Options
//!
//! `BuilderOptions` carries the knobs a caller may set on a `RowBuilder`.
//! It follows the fluent builder style: start from `BuilderOptions::default()`
//! and chain setters.
//!
//! | Option       | Default   | Description                                    |
//! |--------------|-----------|------------------------------------------------|
//! | type_check   | `Lenient` | How an appended value's type is matched to the column |
//!
//! ## Type Checking
//!
//! - **Lenient** keeps the historical behavior: the caller is trusted to call
//!   the right append method. Numeric values are cast into the column's
//!   storage type. A string can still never land in a fixed-width column (or
//!   the reverse) because the layout has no room for it.
//! - **Strict** rejects any value whose type differs from the column type.
//!   `String` and `Varchar` are interchangeable in both modes.
//!
//! ```ignore
//! let options = BuilderOptions::default().type_check(TypeCheck::Strict);
//! let mut builder = RowBuilder::with_options(&schema, &defaults, options);
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeCheck {
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuilderOptions {
    type_check: TypeCheck,
}

impl BuilderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_check(mut self, mode: TypeCheck) -> Self {
        self.type_check = mode;
        self
    }

    pub fn strict(self) -> Self {
        self.type_check(TypeCheck::Strict)
    }

    pub fn type_check_mode(&self) -> TypeCheck {
        self.type_check
    }

    pub fn is_strict(&self) -> bool {
        self.type_check == TypeCheck::Strict
    }
}
