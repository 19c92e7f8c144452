//! # raster-io
//!
//! Pluggable raster image codecs.
//!
//! - **BMP** - Uncompressed 24/32-bit Windows bitmaps, parsed in-crate
//! - **TGA** - Uncompressed truecolor and grayscale Targa, parsed in-crate
//! - **PNG** - Via the `png` crate
//! - **JPEG** - Via `jpeg-decoder` / `jpeg-encoder`
//!
//! # Architecture
//!
//! - [`Codec`] - Trait every format implements (stream <-> [`PixelBuffer`])
//! - [`Image`] - Pixel buffer bound to the codec that reads and writes it
//! - [`CodecRegistry`] - Extension-keyed table of codec factories
//! - [`read`] / [`write`] - Path-based helpers choosing the codec by extension
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use raster_io::{read, write};
//!
//! let image = read("input.bmp")?;
//! write("output.tga", image.buffer())?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Layouts |
//! |--------|------|-------|---------|
//! | BMP | Yes | Yes | RGB, RGBA (write: no grayscale) |
//! | TGA | Yes | Yes | Grayscale, RGB, RGBA |
//! | PNG | Yes | Yes | Grayscale, RGB, RGBA |
//! | JPEG | Yes | Yes | Grayscale, RGB (alpha dropped on write) |
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod image;
mod limits;
mod traits;

pub mod bmp;
pub mod registry;
pub mod tga;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use error::{ErrorKind, IoError, IoResult};
pub use image::Image;
pub use limits::Limits;
pub use registry::{CodecDescriptor, CodecRegistry};
pub use traits::{Codec, ReadSeek};

pub use raster_core::{Format, PixelBuffer};

use std::path::Path;

/// Reads an image, choosing the codec from the file extension.
///
/// # Example
///
/// ```rust,ignore
/// let image = raster_io::read("input.tga")?;
/// println!("{}x{} {}", image.width(), image.height(), image.format());
/// ```
///
/// # Errors
///
/// - [`IoError::UnsupportedFormat`] if no codec is registered for the extension
/// - [`IoError::InvalidArgument`] if the file cannot be opened
/// - Codec errors if the content is malformed
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let mut image = CodecRegistry::global()
        .create_for_path(path)
        .ok_or_else(|| unsupported(path))?;
    image.load(path)?;
    Ok(image)
}

/// Writes a buffer, choosing the codec from the file extension.
///
/// # Errors
///
/// - [`IoError::UnsupportedFormat`] if no codec is registered for the extension
/// - [`IoError::InvalidArgument`] if the file cannot be created
/// - Codec errors if the buffer layout is not encodable
pub fn write<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> IoResult<()> {
    let path = path.as_ref();
    let mut image = CodecRegistry::global()
        .create_for_path(path)
        .ok_or_else(|| unsupported(path))?;
    image.set_buffer(buffer.clone());
    image.save(path)
}

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}
