//! Grayscale rasters and color reduction.
//!
//! `GrayImage` owns a contiguous row-major 8-bit buffer. Color input is
//! reduced with BT.601 luminance (`Y = 0.299 R + 0.587 G + 0.114 B`,
//! rounded to nearest); alpha channels are ignored. Rasters are immutable
//! once built.

use crate::util::{PixMatchError, PixMatchResult};

pub mod integral;
pub mod pyramid;

#[cfg(feature = "image-io")]
pub mod io;

/// Owned 8-bit grayscale raster in row-major order.
#[derive(Clone)]
pub struct GrayImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl GrayImage {
    /// Takes ownership of an already-gray buffer of exactly `width * height`
    /// bytes.
    pub fn from_raw(data: Vec<u8>, width: usize, height: usize) -> PixMatchResult<Self> {
        let expected = checked_area(width, height)?;
        if data.len() != expected {
            return Err(PixMatchError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Converts packed RGB24 pixels.
    pub fn from_rgb8(data: &[u8], width: usize, height: usize) -> PixMatchResult<Self> {
        Self::from_packed(data, width, height, 3)
    }

    /// Converts packed RGBA32 pixels. The alpha channel does not contribute.
    pub fn from_rgba8(data: &[u8], width: usize, height: usize) -> PixMatchResult<Self> {
        Self::from_packed(data, width, height, 4)
    }

    fn from_packed(
        data: &[u8],
        width: usize,
        height: usize,
        channels: usize,
    ) -> PixMatchResult<Self> {
        let area = checked_area(width, height)?;
        let expected = area
            .checked_mul(channels)
            .ok_or(PixMatchError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(PixMatchError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }

        let mut gray = Vec::with_capacity(area);
        for px in data.chunks_exact(channels) {
            gray.push(luma_bt601(px[0], px[1], px[2]));
        }
        Ok(Self {
            data: gray,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    /// Returns the full pixel buffer in row-major order.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns row `y` as a contiguous slice of `width` pixels.
    ///
    /// Callers keep `y` within bounds; scans derive their anchor ranges from
    /// the same dimensions this raster reports.
    #[inline]
    pub(crate) fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
}

/// BT.601 luminance, rounded to nearest. Weights sum to one, so the result
/// never leaves `[0, 255]`.
#[inline]
fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    let y = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((y + 500) / 1000) as u8
}

fn checked_area(width: usize, height: usize) -> PixMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(PixMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(PixMatchError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::{luma_bt601, GrayImage};
    use crate::util::PixMatchError;

    #[test]
    fn from_raw_rejects_zero_dimensions() {
        let err = GrayImage::from_raw(vec![0u8; 4], 0, 4).err().unwrap();
        assert_eq!(
            err,
            PixMatchError::InvalidDimensions {
                width: 0,
                height: 4,
            }
        );
    }

    #[test]
    fn from_raw_rejects_mismatched_buffer() {
        let err = GrayImage::from_raw(vec![0u8; 5], 2, 3).err().unwrap();
        assert_eq!(err, PixMatchError::BufferSizeMismatch { expected: 6, got: 5 });
    }

    #[test]
    fn from_rgb8_rejects_mismatched_buffer() {
        let err = GrayImage::from_rgb8(&[0u8; 7], 2, 1).err().unwrap();
        assert_eq!(err, PixMatchError::BufferSizeMismatch { expected: 6, got: 7 });
    }

    #[test]
    fn luma_matches_bt601_reference() {
        assert_eq!(luma_bt601(0, 0, 0), 0);
        assert_eq!(luma_bt601(255, 255, 255), 255);
        // 0.299 * 255 = 76.245 -> 76
        assert_eq!(luma_bt601(255, 0, 0), 76);
        // 0.587 * 255 = 149.685 -> 150
        assert_eq!(luma_bt601(0, 255, 0), 150);
        // 0.114 * 255 = 29.07 -> 29
        assert_eq!(luma_bt601(0, 0, 255), 29);
        // 0.299 * 100 + 0.587 * 50 + 0.114 * 200 = 82.05 -> 82
        assert_eq!(luma_bt601(100, 50, 200), 82);
    }

    #[test]
    fn from_rgba8_ignores_alpha() {
        let opaque = GrayImage::from_rgba8(&[10, 20, 30, 255], 1, 1).unwrap();
        let clear = GrayImage::from_rgba8(&[10, 20, 30, 0], 1, 1).unwrap();
        assert_eq!(opaque.as_slice(), clear.as_slice());
    }

    #[test]
    fn accessors_report_layout() {
        let img = GrayImage::from_raw((0u8..6).collect(), 3, 2).unwrap();
        assert_eq!(img.dims(), (3, 2));
        assert_eq!(img.row(1), &[3, 4, 5]);
        assert_eq!(img.get(2, 1), Some(5));
        assert_eq!(img.get(3, 0), None);
    }
}
