//! # raster-core
//!
//! Core types shared by the raster codec crates.
//!
//! - [`Format`] - Channel layout of an 8-bit image (Grayscale, RGB, RGBA)
//! - [`PixelBuffer`] - Dense `[row][col][channel]` byte storage
//! - [`pixel`] - Channel swizzles between on-disk BGR(A) and in-memory RGB(A)
//! - [`Error`] - Buffer construction and indexing errors
//!
//! ## Crate Structure
//!
//! ```text
//! raster-core (this crate)
//!    ^
//!    |
//!    +-- raster-io (codecs, registry)
//!    +-- raster-cli (command line)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use raster_core::{Format, PixelBuffer};
//!
//! let mut buf = PixelBuffer::new();
//! buf.resize(2, 3, Format::Rgb);
//! buf.row_mut(1)[0] = 255;
//! assert_eq!(buf.sample(1, 0, 0), 255);
//! assert_eq!(buf.len(), 2 * 3 * 3);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod image;
pub mod pixel;

pub use error::{Error, Result};
pub use format::Format;
pub use image::PixelBuffer;
pub use pixel::{swap_red_blue, swapped_red_blue};

/// Prelude module for convenient imports.
///
/// ```
/// use raster_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::Format;
    pub use crate::image::PixelBuffer;
    pub use crate::pixel::{swap_red_blue, swapped_red_blue};
}
