//! Codec-bound image.
//!
//! An [`Image`] pairs a [`PixelBuffer`] with the [`Codec`] that reads and
//! writes it. Images come from [`crate::CodecRegistry::create_by_extension`]
//! with an empty buffer, or from [`Image::with_buffer`] when encoding data
//! produced elsewhere.
//!
//! ```rust,ignore
//! use raster_io::CodecRegistry;
//!
//! let mut image = CodecRegistry::global().create_by_extension("bmp").unwrap();
//! image.load("input.bmp")?;
//! println!("{}x{} {}", image.width(), image.height(), image.format());
//! image.save("copy.bmp")?;
//! ```

use crate::{Codec, IoError, IoResult, ReadSeek};
use raster_core::{Format, PixelBuffer};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Write};
use std::path::Path;
use tracing::trace;

/// Pixel data plus the codec that transcodes it.
pub struct Image {
    codec: Box<dyn Codec>,
    buffer: PixelBuffer,
}

impl Image {
    /// Creates an image with an empty buffer.
    pub fn new(codec: Box<dyn Codec>) -> Self {
        Self::with_buffer(codec, PixelBuffer::new())
    }

    /// Creates an image around existing pixels.
    pub fn with_buffer(codec: Box<dyn Codec>, buffer: PixelBuffer) -> Self {
        Self { codec, buffer }
    }

    /// Name of the bound codec.
    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }

    /// Bound codec.
    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    /// Channel layout.
    pub fn format(&self) -> Format {
        self.buffer.format()
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Raw pixel bytes.
    pub fn data(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Pixel buffer.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Mutable pixel buffer.
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    /// Replaces the pixel buffer.
    pub fn set_buffer(&mut self, buffer: PixelBuffer) {
        self.buffer = buffer;
    }

    /// Consumes the image, returning its pixels.
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// Loads the file at `path`, replacing the buffer.
    ///
    /// # Errors
    ///
    /// [`IoError::InvalidArgument`] if the file cannot be opened, otherwise
    /// whatever the codec reports. On error the buffer contents must not
    /// be relied upon.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> IoResult<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            IoError::InvalidArgument(format!("cannot open {}: {}", path.display(), e))
        })?;
        let mut reader = BufReader::new(file);
        self.load_from(&mut reader)
    }

    /// Decodes from a stream, replacing the buffer.
    pub fn load_from(&mut self, reader: &mut dyn ReadSeek) -> IoResult<()> {
        trace!(codec = self.codec.name(), "Image::load_from");
        self.buffer = self.codec.decode(reader)?;
        Ok(())
    }

    /// Decodes from memory, replacing the buffer.
    pub fn load_from_memory(&mut self, data: &[u8]) -> IoResult<()> {
        let mut cursor = Cursor::new(data);
        self.load_from(&mut cursor)
    }

    /// Saves the buffer to `path`.
    ///
    /// # Errors
    ///
    /// [`IoError::InvalidArgument`] if the file cannot be created, otherwise
    /// whatever the codec reports. The file is only touched once encoding
    /// has succeeded.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> IoResult<()> {
        let path = path.as_ref();
        let bytes = self.save_to_memory()?;
        let mut file = File::create(path).map_err(|e| {
            IoError::InvalidArgument(format!("cannot create {}: {}", path.display(), e))
        })?;
        file.write_all(&bytes)?;
        Ok(())
    }

    /// Encodes the buffer into a stream.
    pub fn save_to(&self, writer: &mut dyn Write) -> IoResult<()> {
        trace!(codec = self.codec.name(), "Image::save_to");
        self.codec.encode(&self.buffer, writer)
    }

    /// Encodes the buffer into a new byte vector.
    pub fn save_to_memory(&self) -> IoResult<Vec<u8>> {
        let mut out = Vec::new();
        self.save_to(&mut out)?;
        Ok(out)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("codec", &self.codec.name())
            .field("width", &self.width())
            .field("height", &self.height())
            .field("format", &self.format())
            .finish()
    }
}
