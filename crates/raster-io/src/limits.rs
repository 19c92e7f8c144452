//! Decode-time resource limits.
//!
//! BMP and TGA headers declare dimensions before any pixel data arrives.
//! [`Limits::check`] rejects oversized declarations before the pixel
//! buffer is allocated.
//!
//! The default imposes no cap, so every file an encoder can emit decodes
//! again. Callers handling untrusted input opt in through `with_limits`.
//!
//! ```
//! use raster_io::Limits;
//!
//! let limits = Limits::default().with_max_pixels(1 << 20);
//! assert!(limits.check(1024, 1024).is_ok());
//! assert!(limits.check(1025, 1024).is_err());
//! ```

use crate::{IoError, IoResult};

/// Caps applied by decoders before allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum width in pixels.
    pub max_width: u32,
    /// Maximum height in pixels.
    pub max_height: u32,
    /// Maximum `width * height`.
    pub max_pixels: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self::none()
    }
}

impl Limits {
    /// No limit.
    pub fn none() -> Self {
        Self {
            max_width: u32::MAX,
            max_height: u32::MAX,
            max_pixels: u64::MAX,
        }
    }

    /// Sets the maximum width.
    pub fn with_max_width(mut self, max: u32) -> Self {
        self.max_width = max;
        self
    }

    /// Sets the maximum height.
    pub fn with_max_height(mut self, max: u32) -> Self {
        self.max_height = max;
        self
    }

    /// Sets the maximum pixel count.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = max;
        self
    }

    /// Checks declared dimensions.
    pub fn check(&self, width: u32, height: u32) -> IoResult<()> {
        if width > self.max_width {
            return Err(IoError::LimitExceeded(format!(
                "width {} > {}",
                width, self.max_width
            )));
        }
        if height > self.max_height {
            return Err(IoError::LimitExceeded(format!(
                "height {} > {}",
                height, self.max_height
            )));
        }
        let pixels = width as u64 * height as u64;
        if pixels > self.max_pixels {
            return Err(IoError::LimitExceeded(format!(
                "{} pixels > {}",
                pixels, self.max_pixels
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let limits = Limits::default();
        assert_eq!(limits, Limits::none());
        assert!(limits.check(70_000, 1).is_ok());
        assert!(limits.check(65_535, 65_535).is_ok());
        assert!(limits.check(i32::MAX as u32, 1).is_ok());
    }

    #[test]
    fn test_pixel_cap() {
        let limits = Limits::default().with_max_pixels(1 << 20);
        assert!(limits.check(1024, 1024).is_ok());
        assert!(matches!(limits.check(1025, 1024), Err(IoError::LimitExceeded(_))));
    }

    #[test]
    fn test_none() {
        assert!(Limits::none().check(u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn test_builder() {
        let limits = Limits::none().with_max_width(10).with_max_height(20);
        assert!(limits.check(10, 20).is_ok());
        assert!(matches!(limits.check(11, 1), Err(IoError::LimitExceeded(_))));
    }
}
