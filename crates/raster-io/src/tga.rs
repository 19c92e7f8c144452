//! Truevision Targa (TGA) format support.
//!
//! Uncompressed truecolor (type 2) and grayscale (type 3) images.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use raster_io::tga;
//!
//! let buffer = tga::read("input.tga")?;
//! tga::write("output.tga", &buffer)?;
//! ```
//!
//! # Format Details
//!
//! An 18-byte little-endian header, an optional image ID, an optional color
//! map, then `width * height * depth / 8` bytes of BGR(A) or gray samples
//! with no row padding.
//!
//! Descriptor bit 5 selects the origin: clear means the first stored row is
//! the bottom of the image. Decoded buffers are always top-to-bottom, and
//! the encoder always writes a top-left origin. This is not a plain copy of
//! the stored bytes: bottom-origin files are flipped after reading, so row 0
//! of the buffer is the top row of the picture whatever the file declares.
//!
//! # Limitations
//!
//! - Color-mapped (type 1) and RLE (types 9-11) images are rejected.
//! - Right-to-left pixel order (descriptor bit 4) is ignored.

use crate::{Codec, Image, IoError, IoResult, Limits, ReadSeek};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use raster_core::{Format, PixelBuffer, swapped_red_blue};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

const HEADER_SIZE: usize = 18;

/// Uncompressed truecolor.
const TYPE_TRUECOLOR: u8 = 2;
/// Uncompressed grayscale.
const TYPE_GRAYSCALE: u8 = 3;

/// Descriptor bit: first stored row is the top row.
const ORIGIN_TOP: u8 = 0x20;
/// Descriptor bits: alpha bits per pixel.
const ALPHA_BITS_MASK: u8 = 0x0F;

/// TGA file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Header {
    id_length: u8,
    color_map_type: u8,
    image_type: u8,
    color_map_first: u16,
    color_map_length: u16,
    color_map_entry_bits: u8,
    x_origin: u16,
    y_origin: u16,
    width: u16,
    height: u16,
    pixel_depth: u8,
    descriptor: u8,
}

impl Header {
    fn read(reader: &mut dyn ReadSeek) -> IoResult<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut buf)
            .map_err(IoError::reading("TGA header"))?;

        let mut r = &buf[..];
        Ok(Self {
            id_length: r.read_u8()?,
            color_map_type: r.read_u8()?,
            image_type: r.read_u8()?,
            color_map_first: r.read_u16::<LittleEndian>()?,
            color_map_length: r.read_u16::<LittleEndian>()?,
            color_map_entry_bits: r.read_u8()?,
            x_origin: r.read_u16::<LittleEndian>()?,
            y_origin: r.read_u16::<LittleEndian>()?,
            width: r.read_u16::<LittleEndian>()?,
            height: r.read_u16::<LittleEndian>()?,
            pixel_depth: r.read_u8()?,
            descriptor: r.read_u8()?,
        })
    }

    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> IoResult<()> {
        writer.write_u8(self.id_length)?;
        writer.write_u8(self.color_map_type)?;
        writer.write_u8(self.image_type)?;
        writer.write_u16::<LittleEndian>(self.color_map_first)?;
        writer.write_u16::<LittleEndian>(self.color_map_length)?;
        writer.write_u8(self.color_map_entry_bits)?;
        writer.write_u16::<LittleEndian>(self.x_origin)?;
        writer.write_u16::<LittleEndian>(self.y_origin)?;
        writer.write_u16::<LittleEndian>(self.width)?;
        writer.write_u16::<LittleEndian>(self.height)?;
        writer.write_u8(self.pixel_depth)?;
        writer.write_u8(self.descriptor)?;
        Ok(())
    }

    /// Bytes occupied by the color map section.
    fn color_map_bytes(&self) -> u64 {
        if self.color_map_type == 0 {
            return 0;
        }
        self.color_map_length as u64 * (self.color_map_entry_bits as u64).div_ceil(8)
    }

    fn format(&self) -> IoResult<Format> {
        let channels = self.pixel_depth as usize / 8;
        let format = match (self.image_type, self.pixel_depth % 8, channels) {
            (TYPE_TRUECOLOR, 0, 3) => Format::Rgb,
            (TYPE_TRUECOLOR, 0, 4) => Format::Rgba,
            (TYPE_GRAYSCALE, 0, 1) => Format::Grayscale,
            _ => {
                return Err(IoError::UnsupportedBitDepth(format!(
                    "TGA image type {} with {}-bit pixels",
                    self.image_type, self.pixel_depth
                )));
            }
        };
        Ok(format)
    }
}

/// TGA reader and writer.
#[derive(Debug, Clone, Default)]
pub struct TgaCodec {
    limits: Limits,
}

impl TgaCodec {
    /// Creates a codec with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with custom decode limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    fn decode_impl(&self, reader: &mut dyn ReadSeek) -> IoResult<PixelBuffer> {
        let header = Header::read(reader)?;

        if !matches!(header.image_type, TYPE_TRUECOLOR | TYPE_GRAYSCALE) {
            return Err(IoError::InvalidFile(format!(
                "unsupported TGA image type {}",
                header.image_type
            )));
        }
        let format = header.format()?;

        let width = header.width as u32;
        let height = header.height as u32;
        if width == 0 || height == 0 {
            return Err(IoError::InvalidFile(format!(
                "invalid TGA dimensions {}x{}",
                width, height
            )));
        }
        self.limits.check(width, height)?;

        let skip = header.id_length as u64 + header.color_map_bytes();
        if skip > 0 {
            reader.seek(SeekFrom::Current(skip as i64))?;
        }

        let mut raw = vec![0u8; width as usize * height as usize * format.channels()];
        reader
            .read_exact(&mut raw)
            .map_err(IoError::reading("TGA pixel data"))?;

        let mut buffer = PixelBuffer::new();
        buffer.try_resize(height, width, format)?;
        swapped_red_blue(&raw, buffer.as_bytes_mut(), format.channels());

        let top_down = header.descriptor & ORIGIN_TOP != 0;
        if !top_down {
            buffer.flip_vertical();
        }

        debug!(
            width,
            height,
            image_type = header.image_type,
            depth = header.pixel_depth,
            top_down,
            "decoded TGA"
        );
        Ok(buffer)
    }

    fn encode_impl(&self, buffer: &PixelBuffer, writer: &mut dyn Write) -> IoResult<()> {
        if buffer.is_empty() {
            return Err(IoError::InvalidArgument("cannot encode an empty image as TGA".into()));
        }

        let too_large = || {
            IoError::EncodeError(format!(
                "image {}x{} exceeds TGA maximum of {} pixels per side",
                buffer.width(),
                buffer.height(),
                u16::MAX
            ))
        };
        let width = u16::try_from(buffer.width()).map_err(|_| too_large())?;
        let height = u16::try_from(buffer.height()).map_err(|_| too_large())?;

        let format = buffer.format();
        let (image_type, alpha_bits) = match format {
            Format::Grayscale => (TYPE_GRAYSCALE, 0),
            Format::Rgb => (TYPE_TRUECOLOR, 0),
            Format::Rgba => (TYPE_TRUECOLOR, 8),
        };

        Header {
            image_type,
            width,
            height,
            pixel_depth: format.bits_per_pixel() as u8,
            descriptor: ORIGIN_TOP | (alpha_bits & ALPHA_BITS_MASK),
            ..Header::default()
        }
        .write(writer)?;

        let channels = format.channels();
        if format.is_color() {
            let mut row = vec![0u8; buffer.row_stride()];
            for src in buffer.rows() {
                swapped_red_blue(src, &mut row, channels);
                writer.write_all(&row)?;
            }
        } else {
            writer.write_all(buffer.as_bytes())?;
        }

        debug!(width, height, image_type, "encoded TGA");
        Ok(())
    }
}

impl Codec for TgaCodec {
    fn name(&self) -> &'static str {
        "TGA"
    }

    /// TGA has no magic number.
    fn can_read(&self, _header: &[u8]) -> bool {
        false
    }

    fn decode(&self, reader: &mut dyn ReadSeek) -> IoResult<PixelBuffer> {
        self.decode_impl(reader)
    }

    fn encode(&self, buffer: &PixelBuffer, writer: &mut dyn Write) -> IoResult<()> {
        self.encode_impl(buffer, writer)
    }
}

/// Reads a TGA file with default limits.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let mut image = Image::new(Box::new(TgaCodec::new()));
    image.load(path)?;
    Ok(image.into_buffer())
}

/// Writes a buffer as an uncompressed TGA file.
pub fn write<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> IoResult<()> {
    Image::with_buffer(Box::new(TgaCodec::new()), buffer.clone()).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::io::Cursor;

    fn noise(len: usize, seed: u32) -> Vec<u8> {
        let mut state = seed ^ 0x9E37_79B9;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            })
            .collect()
    }

    fn encode(buffer: &PixelBuffer) -> Vec<u8> {
        let mut out = Vec::new();
        TgaCodec::new().encode(buffer, &mut out).expect("encode failed");
        out
    }

    fn decode(bytes: &[u8]) -> IoResult<PixelBuffer> {
        TgaCodec::new().decode(&mut Cursor::new(bytes))
    }

    /// Header bytes for an uncompressed image.
    fn header(image_type: u8, width: u16, height: u16, depth: u8, descriptor: u8) -> Vec<u8> {
        let mut out = vec![0u8; 12];
        out[2] = image_type;
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.push(depth);
        out.push(descriptor);
        out
    }

    #[test]
    fn test_roundtrip() {
        for (w, h) in [(3, 2), (17, 5), (16, 16)] {
            for format in [Format::Grayscale, Format::Rgb, Format::Rgba] {
                let len = (w * h) as usize * format.channels();
                let buffer = PixelBuffer::from_vec(h, w, format, noise(len, w ^ (h << 8))).unwrap();
                assert_eq!(decode(&encode(&buffer)).unwrap(), buffer, "{}x{} {:?}", w, h, format);
            }
        }
    }

    #[test]
    fn test_encoded_layout() {
        let buffer = PixelBuffer::from_vec(1, 2, Format::Rgba, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let bytes = encode(&buffer);

        assert_eq!(bytes.len(), HEADER_SIZE + 8);
        assert_eq!(&bytes[..HEADER_SIZE], &header(2, 2, 1, 32, 0x28)[..]);
        assert_eq!(&bytes[HEADER_SIZE..], &[3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn test_grayscale_header() {
        let buffer = PixelBuffer::from_vec(2, 2, Format::Grayscale, vec![10, 20, 30, 40]).unwrap();
        let bytes = encode(&buffer);
        assert_eq!(&bytes[..HEADER_SIZE], &header(3, 2, 2, 8, 0x20)[..]);
        assert_eq!(&bytes[HEADER_SIZE..], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_bottom_left_origin() {
        // Stored bottom row first.
        let mut bytes = header(3, 1, 3, 8, 0x00);
        bytes.extend_from_slice(&[3, 2, 1]);
        let buffer = decode(&bytes).unwrap();
        assert_eq!(buffer.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_skips_id_and_color_map() {
        let mut bytes = header(2, 1, 1, 24, 0x20);
        bytes[0] = 3; // image id length
        bytes[1] = 1; // color map present
        bytes[5..7].copy_from_slice(&2u16.to_le_bytes()); // two entries
        bytes[7] = 15; // 15-bit entries, 2 bytes each
        bytes.extend_from_slice(b"abc");
        bytes.extend_from_slice(&[0xFF; 4]);
        bytes.extend_from_slice(&[30, 20, 10]);

        let buffer = decode(&bytes).unwrap();
        assert_eq!(buffer.as_bytes(), &[10, 20, 30]);
    }

    #[test]
    fn test_rejects_unsupported_types() {
        for image_type in [0u8, 1, 9, 10, 11] {
            let mut bytes = header(image_type, 1, 1, 24, 0x20);
            bytes.extend_from_slice(&[0; 3]);
            let err = decode(&bytes).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InternalError, "type {}", image_type);
        }
    }

    #[test]
    fn test_rejects_mismatched_depth() {
        for (image_type, depth) in [(2u8, 8u8), (2, 16), (3, 24), (3, 16), (2, 25)] {
            let mut bytes = header(image_type, 1, 1, depth, 0x20);
            bytes.extend_from_slice(&[0; 4]);
            let err = decode(&bytes).unwrap_err();
            assert!(
                matches!(err, IoError::UnsupportedBitDepth(_)),
                "type {} depth {}: {:?}",
                image_type,
                depth,
                err
            );
        }
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let bytes = header(2, 0, 4, 24, 0x20);
        assert_eq!(decode(&bytes).unwrap_err().kind(), ErrorKind::InternalError);
    }

    #[test]
    fn test_truncated() {
        let buffer = PixelBuffer::from_vec(3, 3, Format::Rgb, noise(27, 5)).unwrap();
        let bytes = encode(&buffer);
        for cut in [0, 17, HEADER_SIZE, bytes.len() - 1] {
            let err = decode(&bytes[..cut]).unwrap_err();
            assert!(matches!(err, IoError::Truncated(_)), "cut at {}: {:?}", cut, err);
        }
    }

    #[test]
    fn test_limits() {
        let bytes = header(2, 1000, 1000, 24, 0x20);
        let codec = TgaCodec::with_limits(Limits::default().with_max_width(999));
        let err = codec.decode(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, IoError::LimitExceeded(_)));
    }

    #[test]
    fn test_encode_too_wide() {
        let buffer = PixelBuffer::zeroed(1, u16::MAX as u32 + 1, Format::Grayscale);
        let err = TgaCodec::new().encode(&buffer, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, IoError::EncodeError(_)));
        assert_eq!(err.kind(), ErrorKind::InternalError);
    }

    #[test]
    fn test_empty_encode_rejected() {
        let err = TgaCodec::new().encode(&PixelBuffer::new(), &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
