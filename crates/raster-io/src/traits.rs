//! Codec trait implemented by every format.
//!
//! A codec is a stateless, single-pass transform between a byte stream and
//! a [`PixelBuffer`]. Codecs are object-safe so the registry can hand out
//! `Box<dyn Codec>` from a plain factory function.
//!
//! # Example
//!
//! ```rust,ignore
//! use raster_io::{Codec, IoResult, ReadSeek};
//! use raster_core::PixelBuffer;
//! use std::io::Write;
//!
//! struct MyFormat;
//!
//! impl Codec for MyFormat {
//!     fn name(&self) -> &'static str { "MyFormat" }
//!     fn can_read(&self, header: &[u8]) -> bool { header.starts_with(b"MY") }
//!     fn decode(&self, reader: &mut dyn ReadSeek) -> IoResult<PixelBuffer> {
//!         // parse reader
//!     }
//!     fn encode(&self, buffer: &PixelBuffer, writer: &mut dyn Write) -> IoResult<()> {
//!         // emit bytes
//!     }
//! }
//! ```

use crate::IoResult;
use raster_core::PixelBuffer;
use std::io::{Read, Seek, Write};

/// A readable, seekable byte stream.
///
/// Blanket-implemented for every `Read + Seek` type, including `File`,
/// `BufReader<File>` and `Cursor<&[u8]>`.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// Decoder/encoder for one image format.
pub trait Codec: Send + Sync {
    /// Human-readable format name (e.g. "BMP").
    fn name(&self) -> &'static str;

    /// Returns `true` if `header` starts with this format's signature.
    ///
    /// Formats without a reliable signature return `false`.
    fn can_read(&self, header: &[u8]) -> bool;

    /// Decodes a complete image starting at the stream's current position.
    fn decode(&self, reader: &mut dyn ReadSeek) -> IoResult<PixelBuffer>;

    /// Encodes `buffer` into `writer`. The buffer is never modified.
    fn encode(&self, buffer: &PixelBuffer, writer: &mut dyn Write) -> IoResult<()>;
}
