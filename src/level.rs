//! # Overview
//!
//! Compression levels recognised by the Zstandard writer. The enum mirrors
//! the conventional fast/default/best split while still admitting any
//! explicit level in zstd's standard range via
//! [`CompressionLevel::Precise`].
//!
//! # Examples
//!
//! ```
//! use zstream::level::CompressionLevel;
//!
//! let level = CompressionLevel::from_numeric(7).unwrap();
//! assert_eq!(level.as_zstd(), 7);
//! assert_eq!(CompressionLevel::Best.as_zstd(), 19);
//! ```

use std::{fmt, num::NonZeroU8};

/// Highest level accepted by [`CompressionLevel::from_numeric`].
///
/// This is zstd's maximum standard compression level.
pub const MAX_LEVEL: u32 = 22;

/// Compression levels recognised by the writer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum CompressionLevel {
    /// Favour speed over compression ratio.
    Fast,
    /// Use zstd's default balance between speed and ratio.
    #[default]
    Default,
    /// Favour the best practical compression ratio.
    Best,
    /// Use an explicit zstd compression level in the range `1..=22`.
    Precise(NonZeroU8),
}

impl CompressionLevel {
    /// Creates a [`CompressionLevel::Precise`] value from an explicit numeric level.
    ///
    /// The supplied `level` must fall within the inclusive range `1..=22`.
    /// The caller is responsible for interpreting `0` as disabled
    /// compression; this helper mirrors zstd's standard level range and
    /// returns an error when the value exceeds the supported bounds.
    pub fn from_numeric(level: u32) -> Result<Self, CompressionLevelError> {
        if (1..=MAX_LEVEL).contains(&level) {
            let precise = NonZeroU8::new(level as u8).expect("validated non-zero level");
            Ok(Self::Precise(precise))
        } else {
            Err(CompressionLevelError::new(level))
        }
    }

    /// Constructs a [`CompressionLevel::Precise`] variant from the provided level.
    #[must_use]
    pub const fn precise(level: NonZeroU8) -> Self {
        Self::Precise(level)
    }

    /// Returns the integer level handed to the zstd engine.
    #[must_use]
    pub const fn as_zstd(self) -> i32 {
        match self {
            Self::Fast => 1,
            Self::Default => 3,
            Self::Best => 19,
            Self::Precise(value) => value.get() as i32,
        }
    }
}

/// Error returned when a requested compression level falls outside the
/// permissible zstd range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompressionLevelError {
    level: u32,
}

impl CompressionLevelError {
    /// Creates a new error capturing the unsupported compression level.
    const fn new(level: u32) -> Self {
        Self { level }
    }

    /// Returns the invalid compression level that triggered the error.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }
}

impl fmt::Display for CompressionLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "compression level {} is outside the supported range 1-{MAX_LEVEL}",
            self.level
        )
    }
}

impl std::error::Error for CompressionLevelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_levels_map_to_expected_values() {
        assert_eq!(CompressionLevel::Fast.as_zstd(), 1);
        assert_eq!(CompressionLevel::Default.as_zstd(), 3);
        assert_eq!(CompressionLevel::Best.as_zstd(), 19);
    }

    #[test]
    fn precise_level_converts_to_requested_value() {
        let level = NonZeroU8::new(12).expect("non-zero");
        assert_eq!(CompressionLevel::precise(level).as_zstd(), 12);
    }

    #[test]
    fn numeric_level_constructor_accepts_valid_range() {
        for level in 1..=MAX_LEVEL {
            let precise = CompressionLevel::from_numeric(level).expect("valid level");
            let expected = NonZeroU8::new(level as u8).expect("validated");
            assert_eq!(precise, CompressionLevel::Precise(expected));
        }
    }

    #[test]
    fn numeric_level_constructor_rejects_out_of_range() {
        let err = CompressionLevel::from_numeric(0).expect_err("zero rejected");
        assert_eq!(err.level(), 0);
        let err = CompressionLevel::from_numeric(23).expect_err("level above 22 rejected");
        assert_eq!(err.level(), 23);
    }

    #[test]
    fn default_level_is_default_variant() {
        assert_eq!(CompressionLevel::default(), CompressionLevel::Default);
    }
}
