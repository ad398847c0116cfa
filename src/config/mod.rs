//! # Configuration
//!
//! This module centralizes the row format constants and the per-builder
//! options.
//!
//! ## Module Organization
//!
//! - [`constants`]: layout constants with compile-time consistency checks
//! - [`options`]: `BuilderOptions` and the `TypeCheck` mode

pub mod constants;
pub mod options;

pub use constants::*;
pub use options::{BuilderOptions, TypeCheck};
