//! Unified error type for lapwatch.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.
//!
//! The display and timing paths themselves never fail; these variants
//! only cover the conversions at the edges of the system.

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Display row number outside 1..=2.
    InvalidRow(u8),

    /// Interrupt line index with no button channel behind it.
    UnknownChannel(u8),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidRow(row) => write!(f, "invalid display row {}", row),
            Error::UnknownChannel(line) => write!(f, "no button on interrupt line {}", line),
        }
    }
}
