//! NCC scoring kernel over integral-image window statistics.

use crate::image::integral::IntegralPair;
use crate::image::GrayImage;
use crate::template::TemplateStats;

/// Contrast floor below which a window or template counts as flat.
pub const EPS: f64 = 1e-10;

/// Scores one template placement whose top-left anchor is `(x, y)`.
///
/// Returns the normalized cross-correlation clamped to `[-1, 1]`, or
/// `f64::NEG_INFINITY` when the source window is flat and the score is
/// undefined. The caller guarantees `x <= W - w` and `y <= H - h`.
#[inline]
pub fn ncc_score(
    src: &GrayImage,
    integral: &IntegralPair,
    stats: &TemplateStats,
    x: usize,
    y: usize,
) -> f64 {
    let w = stats.width();
    let h = stats.height();
    let n = (w * h) as f64;

    let (sum, sum_sq) = integral.window_sums(x, y, w, h);
    // n * variance. The subtraction cancels catastrophically on low-contrast
    // windows, so it is floored at zero before the square root.
    let var_n = sum_sq as f64 - (sum as f64) * (sum as f64) / n;
    let window_norm = var_n.max(0.0).sqrt();
    if window_norm < EPS {
        return f64::NEG_INFINITY;
    }

    // The centered template sums to zero, so the window-mean cross-term
    // vanishes and raw source bytes correlate directly against it.
    let mut dot = 0.0f64;
    for ty in 0..h {
        let src_row = &src.row(y + ty)[x..x + w];
        let tpl_row = stats.centered_row(ty);
        for (src_px, tpl_px) in src_row.iter().zip(tpl_row) {
            dot += f64::from(*src_px) * tpl_px;
        }
    }

    (dot / (window_norm * stats.norm())).clamp(-1.0, 1.0)
}
