//! Windows Bitmap (BMP) format support.
//!
//! Uncompressed 24-bit and 32-bit bitmaps, parsed and emitted without any
//! external library.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use raster_io::bmp;
//!
//! let buffer = bmp::read("input.bmp")?;
//! bmp::write("output.bmp", &buffer)?;
//! ```
//!
//! # Format Details
//!
//! All integers are little-endian.
//!
//! | Section | Size | Contents |
//! |---------|------|----------|
//! | File header | 14 | `"BM"`, file size, reserved, pixel array offset |
//! | DIB header | 12 or 40 | OS/2 core header or `BITMAPINFOHEADER` |
//! | Color table | 4 x entries | BGRx, only when bpp <= 8 |
//! | Pixel array | pitch x height | BGR(A) samples, rows padded to 4 bytes |
//!
//! A positive height stores rows bottom-to-top; a negative height stores
//! them top-to-bottom. The encoder always writes a 40-byte header with a
//! positive height.
//!
//! # Limitations
//!
//! - Indexed (1/2/4/8-bit) images are rejected after the color table is read.
//! - Compressed images (RLE, bitfields) are rejected.
//! - Grayscale buffers cannot be encoded (no palette emission).

use crate::{Codec, Image, IoError, IoResult, Limits, ReadSeek};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use raster_core::{Format, PixelBuffer, swapped_red_blue};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

// === Constants ===

/// File signature.
const SIGNATURE: [u8; 2] = *b"BM";
/// File header size.
const FILE_HEADER_SIZE: u32 = 14;
/// OS/2 `BITMAPCOREHEADER` size.
const CORE_HEADER_SIZE: u32 = 12;
/// `BITMAPINFOHEADER` size.
const INFO_HEADER_SIZE: u32 = 40;
/// Uncompressed RGB.
const BI_RGB: u32 = 0;
/// 72 DPI in pixels per meter.
const PIXELS_PER_METER: i32 = 2835;
/// Largest palette an indexed bitmap can reference.
const MAX_PALETTE_ENTRIES: u32 = 256;

// === File Header ===

/// 14-byte file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileHeader {
    signature: [u8; 2],
    file_size: i32,
    reserved: i32,
    pixel_offset: i32,
}

impl FileHeader {
    fn read<R: Read + ?Sized>(reader: &mut R) -> IoResult<Self> {
        let mut buf = [0u8; FILE_HEADER_SIZE as usize];
        reader
            .read_exact(&mut buf)
            .map_err(IoError::reading("BMP file header"))?;
        Ok(Self {
            signature: [buf[0], buf[1]],
            file_size: LittleEndian::read_i32(&buf[2..6]),
            reserved: LittleEndian::read_i32(&buf[6..10]),
            pixel_offset: LittleEndian::read_i32(&buf[10..14]),
        })
    }

    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> IoResult<()> {
        writer.write_all(&self.signature)?;
        writer.write_i32::<LittleEndian>(self.file_size)?;
        writer.write_i32::<LittleEndian>(self.reserved)?;
        writer.write_i32::<LittleEndian>(self.pixel_offset)?;
        Ok(())
    }
}

// === DIB Header ===

/// 12-byte OS/2 core header. All fields signed 16-bit; planes is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CoreHeader {
    width: i16,
    height: i16,
    bit_count: i16,
}

/// 40-byte `BITMAPINFOHEADER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InfoHeader {
    width: i32,
    height: i32,
    planes: u16,
    bit_count: u16,
    compression: u32,
    size_image: u32,
    x_pels_per_meter: i32,
    y_pels_per_meter: i32,
    colors_used: u32,
    colors_important: u32,
}

impl InfoHeader {
    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> IoResult<()> {
        writer.write_u32::<LittleEndian>(INFO_HEADER_SIZE)?;
        writer.write_i32::<LittleEndian>(self.width)?;
        writer.write_i32::<LittleEndian>(self.height)?;
        writer.write_u16::<LittleEndian>(self.planes)?;
        writer.write_u16::<LittleEndian>(self.bit_count)?;
        writer.write_u32::<LittleEndian>(self.compression)?;
        writer.write_u32::<LittleEndian>(self.size_image)?;
        writer.write_i32::<LittleEndian>(self.x_pels_per_meter)?;
        writer.write_i32::<LittleEndian>(self.y_pels_per_meter)?;
        writer.write_u32::<LittleEndian>(self.colors_used)?;
        writer.write_u32::<LittleEndian>(self.colors_important)?;
        Ok(())
    }
}

/// DIB header, discriminated by its leading size field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DibHeader {
    Core(CoreHeader),
    Info(InfoHeader),
}

impl DibHeader {
    fn read<R: Read + ?Sized>(reader: &mut R) -> IoResult<Self> {
        let mut size_buf = [0u8; 4];
        reader
            .read_exact(&mut size_buf)
            .map_err(IoError::reading("BMP DIB header size"))?;
        let size = LittleEndian::read_u32(&size_buf);

        match size {
            CORE_HEADER_SIZE => {
                let mut buf = [0u8; (CORE_HEADER_SIZE - 4) as usize];
                reader
                    .read_exact(&mut buf)
                    .map_err(IoError::reading("BMP core header"))?;
                Ok(Self::Core(CoreHeader {
                    width: LittleEndian::read_i16(&buf[0..2]),
                    height: LittleEndian::read_i16(&buf[2..4]),
                    bit_count: LittleEndian::read_i16(&buf[6..8]),
                }))
            }
            INFO_HEADER_SIZE => {
                let mut buf = [0u8; (INFO_HEADER_SIZE - 4) as usize];
                reader
                    .read_exact(&mut buf)
                    .map_err(IoError::reading("BMP info header"))?;
                Ok(Self::Info(InfoHeader {
                    width: LittleEndian::read_i32(&buf[0..4]),
                    height: LittleEndian::read_i32(&buf[4..8]),
                    planes: LittleEndian::read_u16(&buf[8..10]),
                    bit_count: LittleEndian::read_u16(&buf[10..12]),
                    compression: LittleEndian::read_u32(&buf[12..16]),
                    size_image: LittleEndian::read_u32(&buf[16..20]),
                    x_pels_per_meter: LittleEndian::read_i32(&buf[20..24]),
                    y_pels_per_meter: LittleEndian::read_i32(&buf[24..28]),
                    colors_used: LittleEndian::read_u32(&buf[28..32]),
                    colors_important: LittleEndian::read_u32(&buf[32..36]),
                }))
            }
            other => Err(IoError::InvalidFile(format!(
                "unsupported BMP DIB header size {}",
                other
            ))),
        }
    }

    fn width(&self) -> i32 {
        match self {
            Self::Core(h) => h.width as i32,
            Self::Info(h) => h.width,
        }
    }

    /// Signed height; the sign selects the scan direction.
    fn height(&self) -> i32 {
        match self {
            Self::Core(h) => h.height as i32,
            Self::Info(h) => h.height,
        }
    }

    fn bit_count(&self) -> i32 {
        match self {
            Self::Core(h) => h.bit_count as i32,
            Self::Info(h) => h.bit_count as i32,
        }
    }

    fn compression(&self) -> u32 {
        match self {
            Self::Core(_) => BI_RGB,
            Self::Info(h) => h.compression,
        }
    }

    fn colors_used(&self) -> u32 {
        match self {
            Self::Core(_) => 0,
            Self::Info(h) => h.colors_used,
        }
    }

    fn is_indexed(&self) -> bool {
        (1..=8).contains(&self.bit_count())
    }

    /// Only uncompressed 24-bit and 32-bit layouts decode.
    fn is_supported(&self) -> bool {
        matches!(self.bit_count(), 24 | 32) && self.compression() == BI_RGB
    }
}

/// Reads the BGRx color table that follows the DIB header of an indexed bitmap.
fn read_color_table<R: Read + ?Sized>(reader: &mut R, dib: &DibHeader) -> IoResult<Vec<[u8; 4]>> {
    let count = match dib.colors_used() {
        0 => 1u32 << dib.bit_count(),
        n => n,
    };
    if count > MAX_PALETTE_ENTRIES {
        return Err(IoError::InvalidFile(format!(
            "BMP color table has {} entries",
            count
        )));
    }
    let mut raw = vec![0u8; count as usize * 4];
    reader
        .read_exact(&mut raw)
        .map_err(IoError::reading("BMP color table"))?;
    Ok(raw
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect())
}

/// Bytes per on-disk scanline, padded to a 4-byte boundary.
#[inline]
fn row_pitch(width: usize, bit_count: usize) -> usize {
    (width * bit_count).div_ceil(32) * 4
}

// === BmpCodec ===

/// BMP reader and writer.
///
/// # Example
///
/// ```rust,ignore
/// use raster_io::bmp::BmpCodec;
/// use raster_io::{Codec, Limits};
///
/// let codec = BmpCodec::with_limits(Limits::default().with_max_pixels(1 << 24));
/// let buffer = codec.decode(&mut std::io::Cursor::new(bytes))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct BmpCodec {
    limits: Limits,
}

impl BmpCodec {
    /// Creates a codec with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with custom decode limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    fn decode_impl(&self, reader: &mut dyn ReadSeek) -> IoResult<PixelBuffer> {
        let start = reader.stream_position()?;

        let file_header = FileHeader::read(reader)?;
        if file_header.signature != SIGNATURE {
            return Err(IoError::InvalidFile(format!(
                "invalid BMP signature {:02X} {:02X}",
                file_header.signature[0], file_header.signature[1]
            )));
        }

        let dib = DibHeader::read(reader)?;
        let bit_count = dib.bit_count();

        if dib.is_indexed() {
            let palette = read_color_table(reader, &dib)?;
            return Err(IoError::UnsupportedBitDepth(format!(
                "indexed {}-bit BMP ({} palette entries)",
                bit_count,
                palette.len()
            )));
        }
        if !dib.is_supported() {
            return Err(IoError::InvalidFile(format!(
                "unsupported BMP layout: {} bpp, compression {}",
                bit_count,
                dib.compression()
            )));
        }

        let width = dib.width();
        let height_field = dib.height();
        if width <= 0 || height_field == 0 {
            return Err(IoError::InvalidFile(format!(
                "invalid BMP dimensions {}x{}",
                width, height_field
            )));
        }
        let width = width as u32;
        let height = height_field.unsigned_abs();
        self.limits.check(width, height)?;

        let format = if bit_count == 32 { Format::Rgba } else { Format::Rgb };
        let mut buffer = PixelBuffer::new();
        buffer.try_resize(height, width, format)?;

        if file_header.pixel_offset < 0 {
            return Err(IoError::InvalidFile(format!(
                "negative BMP pixel offset {}",
                file_header.pixel_offset
            )));
        }
        reader.seek(SeekFrom::Start(start + file_header.pixel_offset as u64))?;

        let channels = match bit_count {
            24 => 3,
            32 => 4,
            other => {
                return Err(IoError::UnsupportedBitDepth(format!("BMP {} bpp", other)));
            }
        };
        let pitch = row_pitch(width as usize, bit_count as usize);
        let row_bytes = width as usize * channels;
        let bottom_up = height_field > 0;

        let mut scanline = vec![0u8; pitch];
        for i in 0..height {
            reader
                .read_exact(&mut scanline)
                .map_err(IoError::reading("BMP pixel array"))?;
            let y = if bottom_up { height - 1 - i } else { i };
            swapped_red_blue(&scanline[..row_bytes], buffer.row_mut(y), channels);
        }

        debug!(
            width,
            height,
            bpp = bit_count,
            bottom_up,
            file_size = file_header.file_size,
            "decoded BMP"
        );
        Ok(buffer)
    }

    fn encode_impl(&self, buffer: &PixelBuffer, writer: &mut dyn Write) -> IoResult<()> {
        let format = buffer.format();
        if !format.is_color() {
            return Err(IoError::EncodeError(
                "grayscale BMP encoding requires a palette and is not supported".into(),
            ));
        }
        if buffer.is_empty() {
            return Err(IoError::InvalidArgument("cannot encode an empty image as BMP".into()));
        }

        let width = buffer.width();
        let height = buffer.height();
        let channels = format.channels();
        let bit_count = format.bits_per_pixel();
        let row_bytes = buffer.row_stride();
        let file_step = (row_bytes + 3) & !3;

        let too_large = || IoError::EncodeError(format!("image {}x{} too large for BMP", width, height));
        let image_size = file_step as u64 * height as u64;
        let pixel_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
        let file_size = i32::try_from(pixel_offset as u64 + image_size).map_err(|_| too_large())?;
        let raw_size = u32::try_from(width as u64 * height as u64 * bit_count as u64 / 8)
            .map_err(|_| too_large())?;

        FileHeader {
            signature: SIGNATURE,
            file_size,
            reserved: 0,
            pixel_offset: pixel_offset as i32,
        }
        .write(writer)?;

        InfoHeader {
            width: i32::try_from(width).map_err(|_| too_large())?,
            height: i32::try_from(height).map_err(|_| too_large())?,
            planes: 1,
            bit_count: bit_count as u16,
            compression: BI_RGB,
            size_image: raw_size,
            x_pels_per_meter: PIXELS_PER_METER,
            y_pels_per_meter: PIXELS_PER_METER,
            colors_used: 0,
            colors_important: 0,
        }
        .write(writer)?;

        let padding = [0u8; 3];
        let mut scanline = vec![0u8; row_bytes];
        for y in (0..height).rev() {
            swapped_red_blue(buffer.row(y), &mut scanline, channels);
            writer.write_all(&scanline)?;
            writer.write_all(&padding[..file_step - row_bytes])?;
        }

        debug!(width, height, bpp = bit_count, file_size, "encoded BMP");
        Ok(())
    }
}

impl Codec for BmpCodec {
    fn name(&self) -> &'static str {
        "BMP"
    }

    fn can_read(&self, header: &[u8]) -> bool {
        header.starts_with(&SIGNATURE)
    }

    fn decode(&self, reader: &mut dyn ReadSeek) -> IoResult<PixelBuffer> {
        self.decode_impl(reader)
    }

    fn encode(&self, buffer: &PixelBuffer, writer: &mut dyn Write) -> IoResult<()> {
        self.encode_impl(buffer, writer)
    }
}

// === Convenience Functions ===

/// Reads a BMP file with default limits.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let mut image = Image::new(Box::new(BmpCodec::new()));
    image.load(path)?;
    Ok(image.into_buffer())
}

/// Writes a buffer as a 24-bit or 32-bit BMP file.
pub fn write<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> IoResult<()> {
    Image::with_buffer(Box::new(BmpCodec::new()), buffer.clone()).save(path)
}

// === Tests ===
