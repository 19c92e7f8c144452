//! Channel layouts for 8-bit raster images.
//!
//! Every codec in the workspace stores 8-bit unsigned samples, so a
//! [`Format`] is fully described by its channel count.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::Format;
//!
//! assert_eq!(Format::Rgba.channels(), 4);
//! assert_eq!(Format::from_channels(3), Some(Format::Rgb));
//! assert_eq!(Format::from_channels(2), None);
//! ```

use std::fmt;

/// Channel layout of a [`crate::PixelBuffer`].
///
/// The discriminant is the number of interleaved channels per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Format {
    /// Single luminance channel.
    Grayscale = 1,
    /// Red, green, blue.
    #[default]
    Rgb = 3,
    /// Red, green, blue, alpha.
    Rgba = 4,
}

impl Format {
    /// Number of channels per pixel.
    #[inline]
    pub const fn channels(self) -> usize {
        self as usize
    }

    /// Bits per pixel at 8 bits per channel.
    #[inline]
    pub const fn bits_per_pixel(self) -> u32 {
        self as u32 * 8
    }

    /// Maps a channel count to its format.
    pub const fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Grayscale),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// Whether the format carries color (and therefore a channel order).
    #[inline]
    pub const fn is_color(self) -> bool {
        !matches!(self, Self::Grayscale)
    }

    /// Whether the format has an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }

    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "Grayscale",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for Format {
    type Error = crate::Error;

    fn try_from(channels: u32) -> crate::Result<Self> {
        Self::from_channels(channels as usize).ok_or(crate::Error::UnsupportedChannels(channels))
    }
}
