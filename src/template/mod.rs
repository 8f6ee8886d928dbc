//! Template statistics precomputed once per search level.

use crate::image::GrayImage;
use crate::kernel::EPS;
use crate::util::{PixMatchError, PixMatchResult};

/// Zero-mean template buffer with its normalization factor.
///
/// The centered values sum to zero by construction, which is what lets the
/// scoring kernel skip per-pixel window-mean subtraction.
pub struct TemplateStats {
    width: usize,
    height: usize,
    mean: f64,
    centered: Vec<f64>,
    norm: f64,
}

impl TemplateStats {
    /// Computes the mean, centered values, and centered L2 norm.
    ///
    /// Fails with [`PixMatchError::DegenerateTemplate`] when the template is
    /// flat; a zero-norm template correlates with nothing.
    pub fn compute(tpl: &GrayImage) -> PixMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = (width * height) as f64;

        let mut sum = 0.0f64;
        for &px in tpl.as_slice() {
            sum += f64::from(px);
        }
        let mean = sum / count;

        let mut centered = Vec::with_capacity(width * height);
        let mut norm_sq = 0.0f64;
        for &px in tpl.as_slice() {
            let c = f64::from(px) - mean;
            norm_sq += c * c;
            centered.push(c);
        }
        let norm = norm_sq.sqrt();
        if norm <= EPS {
            return Err(PixMatchError::DegenerateTemplate {
                reason: "zero contrast",
            });
        }

        Ok(Self {
            width,
            height,
            mean,
            centered,
            norm,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the mean intensity.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns `sqrt(sum of squared centered values)`.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Returns the centered template in row-major order.
    pub fn centered(&self) -> &[f64] {
        &self.centered
    }

    /// Returns one centered row.
    #[inline]
    pub(crate) fn centered_row(&self, ty: usize) -> &[f64] {
        let start = ty * self.width;
        &self.centered[start..start + self.width]
    }
}
