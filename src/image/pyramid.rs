//! Image pyramids for coarse-to-fine search.
//!
//! Each level halves its predecessor with a 2x2 box filter. The average is
//! rounded to nearest with ties to even, so repeated halving does not drift
//! bright.

use crate::image::GrayImage;
use crate::util::PixMatchResult;

/// Pyramid of progressively halved grayscale images; level 0 is the base.
pub struct Pyramid {
    levels: Vec<GrayImage>,
}

impl Pyramid {
    /// Builds at most `max_levels` levels, the base included.
    ///
    /// Construction stops early once a level can no longer be halved, so
    /// the pyramid may be shallower than requested.
    pub fn build(base: &GrayImage, max_levels: usize) -> PixMatchResult<Self> {
        let max_levels = max_levels.max(1);
        let mut levels = Vec::with_capacity(max_levels);
        levels.push(base.clone());

        while levels.len() < max_levels {
            let src = levels.last().expect("pyramid has a base level");
            if src.width() < 2 || src.height() < 2 {
                break;
            }

            let dst_width = src.width() / 2;
            let dst_height = src.height() / 2;
            let mut data = vec![0u8; dst_width * dst_height];

            for y in 0..dst_height {
                let row0 = src.row(2 * y);
                let row1 = src.row(2 * y + 1);
                let dst_row = &mut data[y * dst_width..(y + 1) * dst_width];
                for (x, out) in dst_row.iter_mut().enumerate() {
                    let sum = u16::from(row0[2 * x])
                        + u16::from(row0[2 * x + 1])
                        + u16::from(row1[2 * x])
                        + u16::from(row1[2 * x + 1]);
                    *out = round_quarter_ties_even(sum);
                }
            }

            levels.push(GrayImage::from_raw(data, dst_width, dst_height)?);
        }

        Ok(Self { levels })
    }

    /// Returns the number of levels, at least one.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true only for an impossible empty pyramid; present for the
    /// conventional `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the image at `level`, where level 0 is the base resolution.
    pub fn level(&self, level: usize) -> Option<&GrayImage> {
        self.levels.get(level)
    }
}

/// `sum / 4` rounded to nearest, ties to even. `sum` is at most `4 * 255`.
#[inline]
fn round_quarter_ties_even(sum: u16) -> u8 {
    let q = sum >> 2;
    let rounded = match sum & 3 {
        0 | 1 => q,
        3 => q + 1,
        _ => q + (q & 1),
    };
    rounded as u8
}
