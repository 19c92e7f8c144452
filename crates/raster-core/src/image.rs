//! Pixel storage for decoded images.
//!
//! [`PixelBuffer`] is a dense three-axis byte array addressed as
//! `[row][col][channel]`.
//!
//! # Memory Layout
//!
//! Rows are stored top-to-bottom, pixels left-to-right, channels interleaved:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  <- Row 0
//!         [R G B R G B R G B ...]  <- Row 1
//!         ...
//! ```
//!
//! There is no row padding in memory; codecs that pad scanlines on disk
//! (BMP) strip and re-add the padding themselves.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{Format, PixelBuffer};
//!
//! let mut buf = PixelBuffer::new();
//! buf.resize(2, 2, Format::Rgba);
//! buf.pixel_mut(0, 1).copy_from_slice(&[255, 0, 0, 255]);
//! assert_eq!(buf.pixel(0, 1), &[255, 0, 0, 255]);
//! assert_eq!(buf.row_stride(), 8);
//! ```

use crate::{Error, Format, Result};

/// Owned `height x width x channels` byte buffer.
///
/// Invariant: `as_bytes().len() == height * width * format.channels()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: Format,
}

impl PixelBuffer {
    /// Creates an empty `0x0` RGB buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a zero-filled buffer.
    ///
    /// # Panics
    ///
    /// Panics if the byte size overflows `usize`. Use [`Self::try_resize`]
    /// for untrusted dimensions.
    pub fn zeroed(height: u32, width: u32, format: Format) -> Self {
        let mut buf = Self::new();
        buf.resize(height, width, format);
        buf
    }

    /// Wraps existing bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `data.len()` is not
    /// `height * width * format.channels()`.
    pub fn from_vec(height: u32, width: u32, format: Format, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(height, width, format)?;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    /// Reallocates to `height x width x format`, zero-filling every sample.
    ///
    /// # Panics
    ///
    /// Panics if the byte size overflows `usize`.
    pub fn resize(&mut self, height: u32, width: u32, format: Format) {
        if let Err(e) = self.try_resize(height, width, format) {
            panic!("{e}");
        }
    }

    /// Fallible [`Self::resize`].
    pub fn try_resize(&mut self, height: u32, width: u32, format: Format) -> Result<()> {
        let len = byte_len(height, width, format)?;
        self.data.clear();
        self.data.resize(len, 0);
        self.width = width;
        self.height = height;
        self.format = format;
        Ok(())
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Total number of bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes per row (`width * channels`).
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels()
    }

    /// Raw bytes in row-major, channel-interleaved order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw bytes.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer, returning its bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.row_stride();
        let start = self.row_start(y);
        &self.data[start..start + stride]
    }

    /// Mutable row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.row_stride();
        let start = self.row_start(y);
        &mut self.data[start..start + stride]
    }

    /// Iterator over rows, top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.row_stride().max(1))
    }

    /// Pixel at row `y`, column `x`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, y: u32, x: u32) -> &[u8] {
        let c = self.channels();
        assert!(x < self.width, "column {x} out of bounds for width {}", self.width);
        let start = self.row_start(y) + x as usize * c;
        &self.data[start..start + c]
    }

    /// Mutable pixel at row `y`, column `x`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel_mut(&mut self, y: u32, x: u32) -> &mut [u8] {
        let c = self.channels();
        assert!(x < self.width, "column {x} out of bounds for width {}", self.width);
        let start = self.row_start(y) + x as usize * c;
        &mut self.data[start..start + c]
    }

    /// Checked pixel access.
    pub fn get_pixel(&self, y: u32, x: u32) -> Result<&[u8]> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok(self.pixel(y, x))
    }

    /// Sample `c` of the pixel at row `y`, column `x`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[inline]
    pub fn sample(&self, y: u32, x: u32, c: usize) -> u8 {
        self.pixel(y, x)[c]
    }

    /// Reverses the row order in place.
    pub fn flip_vertical(&mut self) {
        let stride = self.row_stride();
        let h = self.height as usize;
        if stride == 0 || h < 2 {
            return;
        }
        let (mut top, mut bottom) = (0usize, h - 1);
        while top < bottom {
            let (head, tail) = self.data.split_at_mut(bottom * stride);
            head[top * stride..(top + 1) * stride].swap_with_slice(&mut tail[..stride]);
            top += 1;
            bottom -= 1;
        }
    }

    #[inline]
    fn row_start(&self, y: u32) -> usize {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        y as usize * self.row_stride()
    }
}

fn byte_len(height: u32, width: u32, format: Format) -> Result<usize> {
    (height as usize)
        .checked_mul(width as usize)
        .and_then(|n| n.checked_mul(format.channels()))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "byte size overflows usize"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(height: u32, width: u32, format: Format) -> PixelBuffer {
        let len = (height * width) as usize * format.channels();
        let data = (0..len).map(|i| (i % 251) as u8).collect();
        PixelBuffer::from_vec(height, width, format, data).unwrap()
    }

    #[test]
    fn test_resize_zero_fills() {
        let mut buf = gradient(2, 2, Format::Rgb);
        buf.resize(3, 5, Format::Rgba);
        assert_eq!(buf.len(), 3 * 5 * 4);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        assert_eq!((buf.height(), buf.width(), buf.format()), (3, 5, Format::Rgba));
    }

    #[test]
    fn test_from_vec_checks_len() {
        assert!(PixelBuffer::from_vec(2, 3, Format::Grayscale, vec![0; 6]).is_ok());
        let err = PixelBuffer::from_vec(2, 3, Format::Rgb, vec![0; 6]).unwrap_err();
        assert!(matches!(err, Error::BufferSizeMismatch { expected: 18, got: 6 }));
    }

    #[test]
    fn test_row_and_pixel_addressing() {
        let buf = gradient(3, 4, Format::Rgb);
        assert_eq!(buf.row_stride(), 12);
        assert_eq!(buf.row(1)[0], 12);
        assert_eq!(buf.pixel(2, 1), &[27, 28, 29]);
        assert_eq!(buf.sample(2, 3, 2), 35);
        assert_eq!(buf.rows().count(), 3);
    }

    #[test]
    fn test_checked_access() {
        let buf = gradient(2, 2, Format::Rgb);
        assert!(buf.get_pixel(1, 1).is_ok());
        assert!(buf.get_pixel(2, 0).unwrap_err().is_bounds_error());
        assert!(buf.get_pixel(0, 2).is_err());
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bounds_panics() {
        let buf = gradient(2, 2, Format::Rgb);
        let _ = buf.row(2);
    }

    #[test]
    #[should_panic]
    fn test_pixel_column_out_of_bounds_panics() {
        let buf = gradient(2, 2, Format::Rgb);
        let _ = buf.pixel(0, 2);
    }

    #[test]
    fn test_flip_vertical() {
        let mut buf = gradient(3, 2, Format::Grayscale);
        buf.flip_vertical();
        assert_eq!(buf.as_bytes(), &[4, 5, 2, 3, 0, 1]);
        buf.flip_vertical();
        assert_eq!(buf.as_bytes(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_try_resize_overflow() {
        let mut buf = PixelBuffer::new();
        if usize::BITS == 64 {
            // (2^32 - 1)^2 * 4 overflows 64 bits
            assert!(buf.try_resize(u32::MAX, u32::MAX, Format::Rgba).is_err());
        }
        assert!(buf.is_empty());
    }
}
