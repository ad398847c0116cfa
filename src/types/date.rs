//! # Packed Dates
//!
//! Dates are stored in four bytes as
//! `(year - 1900) << 16 | (month - 1) << 8 | day`, so packed dates sort in
//! calendar order.

use crate::config::DATE_BASE_YEAR;
use crate::error::{CodecError, Result};

pub fn pack_date(year: u32, month: u32, day: u32) -> Result<u32> {
    if year < DATE_BASE_YEAR
        || year - DATE_BASE_YEAR > u16::MAX as u32
        || !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
    {
        return Err(CodecError::InvalidDate { year, month, day });
    }
    Ok(((year - DATE_BASE_YEAR) << 16) | ((month - 1) << 8) | day)
}

/// Splits a packed date back into `(year, month, day)`.
pub fn unpack_date(packed: u32) -> (u32, u32, u32) {
    let year = (packed >> 16) + DATE_BASE_YEAR;
    let month = ((packed >> 8) & 0xFF) + 1;
    let day = packed & 0xFF;
    (year, month, day)
}
