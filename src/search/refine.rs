//! Level-by-level refinement of coarse candidates.
//!
//! A candidate found at pyramid level `k + 1` doubles into level `k` and
//! searches a small window around its upscaled anchor; the window argmax
//! becomes the refined candidate.

use crate::candidate::topk::Candidate;
use crate::image::integral::IntegralPair;
use crate::image::GrayImage;
use crate::search::scan::best_in_window;
use crate::template::TemplateStats;

/// Refinement window radius around an upscaled coarse anchor.
pub(crate) const REFINE_RADIUS: usize = 2;

/// Clips a radius-[`REFINE_RADIUS`] window around `(x, y)` to the valid
/// anchor rectangle. `None` when the window lies entirely outside.
fn window_bounds(
    x: usize,
    y: usize,
    max_x: usize,
    max_y: usize,
) -> Option<(usize, usize, usize, usize)> {
    let x0 = x.saturating_sub(REFINE_RADIUS);
    let y0 = y.saturating_sub(REFINE_RADIUS);
    if x0 > max_x || y0 > max_y {
        return None;
    }
    let x1 = (x + REFINE_RADIUS).min(max_x);
    let y1 = (y + REFINE_RADIUS).min(max_y);
    Some((x0, y0, x1, y1))
}

/// Refines candidates from the next-coarser level into this level.
///
/// Windows of neighboring candidates overlap, so refined anchors that land
/// on the same position collapse to a single entry.
pub(crate) fn refine_level(
    src: &GrayImage,
    integral: &IntegralPair,
    stats: &TemplateStats,
    coarse: &[Candidate],
) -> Vec<Candidate> {
    let max_x = src.width() - stats.width();
    let max_y = src.height() - stats.height();

    let mut refined: Vec<Candidate> = Vec::with_capacity(coarse.len());
    for cand in coarse.iter().copied() {
        let (up_x, up_y) = (cand.x * 2, cand.y * 2);
        let Some((x0, y0, x1, y1)) = window_bounds(up_x, up_y, max_x, max_y) else {
            continue;
        };
        let Some(best) = best_in_window(src, integral, stats, x0, y0, x1, y1) else {
            continue;
        };
        if !refined.iter().any(|r| r.x == best.x && r.y == best.y) {
            refined.push(best);
        }
    }
    refined
}
