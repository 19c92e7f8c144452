//! Channel swizzles.
//!
//! BMP and TGA store color samples blue-green-red(-alpha); [`crate::PixelBuffer`]
//! holds red-green-blue(-alpha). Swapping bytes 0 and 2 of every pixel
//! converts in either direction, and applying it twice is the identity.

/// Swaps the first and third byte of every `channels`-sized pixel in place.
///
/// Trailing bytes that do not form a whole pixel are left alone. Layouts
/// with fewer than three channels have nothing to swap.
///
/// ```rust
/// use raster_core::swap_red_blue;
///
/// let mut px = [1u8, 2, 3, 4, 5, 6, 7, 8];
/// swap_red_blue(&mut px, 4);
/// assert_eq!(px, [3, 2, 1, 4, 7, 6, 5, 8]);
/// ```
#[inline]
pub fn swap_red_blue(bytes: &mut [u8], channels: usize) {
    if channels < 3 {
        return;
    }
    for px in bytes.chunks_exact_mut(channels) {
        px.swap(0, 2);
    }
}

/// Copies `src` into `dst` while swapping the first and third byte of each pixel.
///
/// Copies `min(src.len(), dst.len())` bytes rounded down to whole pixels.
#[inline]
pub fn swapped_red_blue(src: &[u8], dst: &mut [u8], channels: usize) {
    if channels < 3 {
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
        return;
    }
    for (s, d) in src.chunks_exact(channels).zip(dst.chunks_exact_mut(channels)) {
        d.copy_from_slice(s);
        d.swap(0, 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_rgb() {
        let mut px = [10u8, 20, 30, 40, 50, 60];
        swap_red_blue(&mut px, 3);
        assert_eq!(px, [30, 20, 10, 60, 50, 40]);
    }

    #[test]
    fn test_swap_is_involution() {
        let original: Vec<u8> = (0..=255u8).cycle().take(4 * 37).collect();
        for channels in [3, 4] {
            let mut px = original.clone();
            swap_red_blue(&mut px, channels);
            assert_ne!(px, original);
            swap_red_blue(&mut px, channels);
            assert_eq!(px, original);
        }
    }

    #[test]
    fn test_grayscale_untouched() {
        let mut px = [1u8, 2, 3];
        swap_red_blue(&mut px, 1);
        assert_eq!(px, [1, 2, 3]);
    }

    #[test]
    fn test_partial_pixel_untouched() {
        let mut px = [1u8, 2, 3, 4, 5];
        swap_red_blue(&mut px, 3);
        assert_eq!(px, [3, 2, 1, 4, 5]);
    }

    #[test]
    fn test_swapped_copy() {
        let src = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [0u8; 8];
        swapped_red_blue(&src, &mut dst, 4);
        assert_eq!(dst, [3, 2, 1, 4, 7, 6, 5, 8]);

        let mut back = [0u8; 8];
        swapped_red_blue(&dst, &mut back, 4);
        assert_eq!(back, src);
    }
}
