//! PNG format support.
//!
//! Thin wrapper over the `png` crate. Decoding expands palettes and
//! low bit depths and strips 16-bit samples to 8 bits, so every PNG maps
//! onto one of the three 8-bit layouts.
//!
//! # Example
//!
//! ```rust,ignore
//! use raster_io::png;
//!
//! let buffer = png::read("input.png")?;
//! png::write("output.png", &buffer)?;
//! ```

use crate::{Codec, Image, IoError, IoResult, Limits, ReadSeek};
use raster_core::{Format, PixelBuffer};
use std::io::{BufReader, Write};
use std::path::Path;
use tracing::debug;

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// PNG reader and writer.
#[derive(Debug, Clone, Default)]
pub struct PngCodec {
    limits: Limits,
}

impl PngCodec {
    /// Creates a codec with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with custom decode limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }
}

impl Codec for PngCodec {
    fn name(&self) -> &'static str {
        "PNG"
    }

    fn can_read(&self, header: &[u8]) -> bool {
        header.starts_with(&SIGNATURE)
    }

    fn decode(&self, reader: &mut dyn ReadSeek) -> IoResult<PixelBuffer> {
        let mut decoder = png::Decoder::new(BufReader::new(reader));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder
            .read_info()
            .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

        let (width, height) = (reader.info().width, reader.info().height);
        self.limits.check(width, height)?;

        let (color_type, bit_depth) = reader.output_color_type();
        if bit_depth != png::BitDepth::Eight {
            return Err(IoError::UnsupportedBitDepth(format!(
                "PNG {:?} {:?}",
                color_type, bit_depth
            )));
        }

        let buf_size = reader
            .output_buffer_size()
            .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
        let mut buf = vec![0u8; buf_size];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
        buf.truncate(info.buffer_size());

        let (format, data) = match color_type {
            png::ColorType::Grayscale => (Format::Grayscale, buf),
            png::ColorType::Rgb => (Format::Rgb, buf),
            png::ColorType::Rgba => (Format::Rgba, buf),
            png::ColorType::GrayscaleAlpha => {
                let rgba = buf
                    .chunks_exact(2)
                    .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                    .collect();
                (Format::Rgba, rgba)
            }
            other => {
                return Err(IoError::DecodeError(format!(
                    "unexpanded PNG color type {:?}",
                    other
                )));
            }
        };

        debug!(width, height, color = ?color_type, "decoded PNG");
        Ok(PixelBuffer::from_vec(height, width, format, data)?)
    }

    fn encode(&self, buffer: &PixelBuffer, writer: &mut dyn Write) -> IoResult<()> {
        if buffer.is_empty() {
            return Err(IoError::InvalidArgument("cannot encode an empty image as PNG".into()));
        }

        let color_type = match buffer.format() {
            Format::Grayscale => png::ColorType::Grayscale,
            Format::Rgb => png::ColorType::Rgb,
            Format::Rgba => png::ColorType::Rgba,
        };

        let mut encoder = png::Encoder::new(writer, buffer.width(), buffer.height());
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);

        let mut png_writer = encoder
            .write_header()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        png_writer
            .write_image_data(buffer.as_bytes())
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        png_writer
            .finish()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;

        debug!(width = buffer.width(), height = buffer.height(), "encoded PNG");
        Ok(())
    }
}

/// Reads a PNG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let mut image = Image::new(Box::new(PngCodec::new()));
    image.load(path)?;
    Ok(image.into_buffer())
}

/// Writes a buffer as an 8-bit PNG file.
pub fn write<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> IoResult<()> {
    Image::with_buffer(Box::new(PngCodec::new()), buffer.clone()).save(path)
}
