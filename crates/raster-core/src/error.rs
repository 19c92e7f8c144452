//! Error types for raster-core operations.
//!
//! The [`Error`] enum covers failures when constructing or indexing a
//! [`crate::PixelBuffer`]:
//! - Buffer construction from raw bytes of the wrong length
//! - Channel counts that do not map to a [`crate::Format`]
//! - Dimensions whose byte size overflows `usize`
//! - Out-of-range pixel coordinates in the checked accessors
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{Error, Format, PixelBuffer};
//!
//! let err = PixelBuffer::from_vec(2, 2, Format::Rgb, vec![0; 5]).unwrap_err();
//! assert!(matches!(err, Error::BufferSizeMismatch { expected: 12, got: 5 }));
//! ```
//!
//! # Used By
//!
//! - [`crate::image::PixelBuffer`] - Buffer operations
//! - `raster-io` - wrapped into `IoError::Core`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or indexing pixel buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside buffer bounds.
    #[error("pixel (row {y}, col {x}) out of bounds for buffer {width}x{height}")]
    OutOfBounds {
        /// Column that was out of bounds
        x: u32,
        /// Row that was out of bounds
        y: u32,
        /// Buffer width
        width: u32,
        /// Buffer height
        height: u32,
    },

    /// Invalid buffer dimensions.
    ///
    /// Returned when `height * width * channels` overflows `usize`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Raw byte vector does not hold exactly `height * width * channels` bytes.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSizeMismatch {
        /// Required length
        expected: usize,
        /// Provided length
        got: usize,
    },

    /// Channel count has no matching [`crate::Format`].
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u32),
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(100, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
        assert!(msg.contains("80x60"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = Error::invalid_dimensions(u32::MAX, u32::MAX, "size overflows usize");
        assert!(err.to_string().contains("overflows"));
        assert!(!err.is_bounds_error());
    }

    #[test]
    fn test_unsupported_channels() {
        assert_eq!(Error::UnsupportedChannels(2).to_string(), "unsupported channel count: 2");
    }
}
