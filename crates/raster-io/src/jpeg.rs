//! JPEG format support.
//!
//! Decoding goes through `jpeg-decoder`, encoding through `jpeg-encoder`.
//! Both are 8-bit baseline only.
//!
//! # Examples
//!
//! ```rust,ignore
//! use raster_io::jpeg;
//!
//! let buffer = jpeg::read("photo.jpg")?;
//! jpeg::write("preview.jpg", &buffer)?;
//! ```
//!
//! With quality control:
//!
//! ```rust,ignore
//! use raster_io::jpeg::JpegCodec;
//! use raster_io::Image;
//!
//! let image = Image::with_buffer(Box::new(JpegCodec::with_quality(95)), buffer);
//! image.save("highq.jpg")?;
//! ```
//!
//! # Conversions
//!
//! | Decoded | Buffer |
//! |---------|--------|
//! | RGB24 | `Rgb` |
//! | L8 | `Grayscale` |
//! | L16 | `Grayscale` (high byte) |
//! | CMYK32 | `Rgb` (approximate) |
//!
//! RGBA buffers are written as RGB; the alpha channel is dropped.

use crate::{Codec, Image, IoError, IoResult, Limits, ReadSeek};
use raster_core::{Format, PixelBuffer};
use std::io::{BufReader, Write};
use std::path::Path;
use tracing::debug;

/// Default encoder quality.
pub const DEFAULT_QUALITY: u8 = 90;

/// JPEG reader and writer.
#[derive(Debug, Clone)]
pub struct JpegCodec {
    /// Quality level 1-100. Higher = better quality, larger files.
    quality: u8,
    limits: Limits,
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            limits: Limits::default(),
        }
    }
}

impl JpegCodec {
    /// Creates a codec with quality 90.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with the given quality, clamped to 1-100.
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            ..Self::default()
        }
    }

    /// Sets decode limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Encoder quality.
    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Codec for JpegCodec {
    fn name(&self) -> &'static str {
        "JPEG"
    }

    fn can_read(&self, header: &[u8]) -> bool {
        header.starts_with(&[0xFF, 0xD8, 0xFF])
    }

    fn decode(&self, reader: &mut dyn ReadSeek) -> IoResult<PixelBuffer> {
        let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(reader));
        decoder
            .read_info()
            .map_err(|e| IoError::DecodeError(e.to_string()))?;
        let info = decoder
            .info()
            .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;
        let width = info.width as u32;
        let height = info.height as u32;
        self.limits.check(width, height)?;

        let pixels = decoder
            .decode()
            .map_err(|e| IoError::DecodeError(e.to_string()))?;

        let (format, data) = match info.pixel_format {
            jpeg_decoder::PixelFormat::RGB24 => (Format::Rgb, pixels),
            jpeg_decoder::PixelFormat::L8 => (Format::Grayscale, pixels),
            jpeg_decoder::PixelFormat::L16 => {
                (Format::Grayscale, pixels.chunks_exact(2).map(|l16| l16[0]).collect())
            }
            jpeg_decoder::PixelFormat::CMYK32 => (Format::Rgb, cmyk_to_rgb(&pixels)),
        };

        debug!(width, height, pixel_format = ?info.pixel_format, "decoded JPEG");
        Ok(PixelBuffer::from_vec(height, width, format, data)?)
    }

    fn encode(&self, buffer: &PixelBuffer, writer: &mut dyn Write) -> IoResult<()> {
        use jpeg_encoder::{ColorType, Encoder};

        if buffer.is_empty() {
            return Err(IoError::InvalidArgument("cannot encode an empty image as JPEG".into()));
        }
        let too_large = || {
            IoError::EncodeError(format!(
                "image {}x{} exceeds JPEG maximum of {} pixels per side",
                buffer.width(),
                buffer.height(),
                u16::MAX
            ))
        };
        let width = u16::try_from(buffer.width()).map_err(|_| too_large())?;
        let height = u16::try_from(buffer.height()).map_err(|_| too_large())?;

        let stripped;
        let (pixels, color_type): (&[u8], ColorType) = match buffer.format() {
            Format::Grayscale => (buffer.as_bytes(), ColorType::Luma),
            Format::Rgb => (buffer.as_bytes(), ColorType::Rgb),
            Format::Rgba => {
                stripped = buffer
                    .as_bytes()
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect::<Vec<u8>>();
                (stripped.as_slice(), ColorType::Rgb)
            }
        };

        let mut out = Vec::new();
        Encoder::new(&mut out, self.quality)
            .encode(pixels, width, height, color_type)
            .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;
        writer.write_all(&out)?;

        debug!(width, height, quality = self.quality, bytes = out.len(), "encoded JPEG");
        Ok(())
    }
}

/// Approximate CMYK to RGB conversion without color management.
fn cmyk_to_rgb(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks_exact(4)
        .flat_map(|cmyk| {
            let k = 1.0 - cmyk[3] as f32 / 255.0;
            let channel = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0) as u8;
            [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
        })
        .collect()
}

/// Reads a JPEG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let mut image = Image::new(Box::new(JpegCodec::new()));
    image.load(path)?;
    Ok(image.into_buffer())
}

/// Writes a buffer as a JPEG file at the default quality.
pub fn write<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> IoResult<()> {
    Image::with_buffer(Box::new(JpegCodec::new()), buffer.clone()).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::io::Cursor;

    fn flat(width: u32, height: u32, format: Format, value: &[u8]) -> PixelBuffer {
        let data = value.repeat((width * height) as usize);
        PixelBuffer::from_vec(height, width, format, data).unwrap()
    }

    fn roundtrip(codec: &JpegCodec, buffer: &PixelBuffer) -> PixelBuffer {
        let mut bytes = Vec::new();
        codec.encode(buffer, &mut bytes).unwrap();
        assert!(codec.can_read(&bytes));
        codec.decode(&mut Cursor::new(&bytes)).unwrap()
    }

    fn assert_close(actual: &[u8], expected: &[u8], tolerance: u8) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(a.abs_diff(*e) <= tolerance, "byte {}: {} vs {}", i, a, e);
        }
    }

    #[test]
    fn test_roundtrip_rgb() {
        let buffer = flat(16, 16, Format::Rgb, &[200, 100, 50]);
        let loaded = roundtrip(&JpegCodec::with_quality(100), &buffer);
        assert_eq!((loaded.width(), loaded.height(), loaded.format()), (16, 16, Format::Rgb));
        assert_close(loaded.as_bytes(), buffer.as_bytes(), 8);
    }

    #[test]
    fn test_roundtrip_grayscale() {
        let buffer = flat(8, 8, Format::Grayscale, &[77]);
        let loaded = roundtrip(&JpegCodec::new(), &buffer);
        assert_eq!(loaded.format(), Format::Grayscale);
        assert_close(loaded.as_bytes(), buffer.as_bytes(), 4);
    }

    #[test]
    fn test_rgba_drops_alpha() {
        let buffer = flat(8, 8, Format::Rgba, &[10, 240, 120, 3]);
        let loaded = roundtrip(&JpegCodec::with_quality(100), &buffer);
        assert_eq!(loaded.format(), Format::Rgb);
        assert_close(&loaded.as_bytes()[..3], &[10, 240, 120], 8);
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(JpegCodec::with_quality(0).quality(), 1);
        assert_eq!(JpegCodec::with_quality(255).quality(), 100);
        assert_eq!(JpegCodec::new().quality(), DEFAULT_QUALITY);
    }

    #[test]
    fn test_cmyk_conversion() {
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 0]), vec![255, 255, 255]);
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 255]), vec![0, 0, 0]);
        assert_eq!(cmyk_to_rgb(&[255, 0, 255, 0]), vec![0, 255, 0]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = JpegCodec::new()
            .decode(&mut Cursor::new(b"\xFF\xD8\xFFgarbage"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalError);
    }
}
