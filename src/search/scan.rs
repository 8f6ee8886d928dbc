//! Row-parallel anchor sweeps.
//!
//! The anchor rectangle is partitioned by rows. Score-map mode hands every
//! worker a disjoint strip of the output buffer, so no synchronization is
//! needed; argmax mode fuses the sweep with a reduction that applies the
//! candidate total order, making the winner independent of worker timing.

use rayon::prelude::*;

use crate::candidate::topk::{better, Candidate};
use crate::image::integral::IntegralPair;
use crate::image::GrayImage;
use crate::kernel::ncc_score;
use crate::template::TemplateStats;
use crate::trace::trace_span;

/// Dense NCC scores over the full anchor grid.
///
/// Cell `(x, y)` holds the score of the placement anchored there; flat
/// windows hold the `NEG_INFINITY` sentinel.
pub struct ScoreMap {
    scores: Vec<f64>,
    width: usize,
    height: usize,
}

impl ScoreMap {
    /// Evaluates every anchor, one output row strip per worker.
    pub fn compute(src: &GrayImage, integral: &IntegralPair, stats: &TemplateStats) -> Self {
        let width = src.width() - stats.width() + 1;
        let height = src.height() - stats.height() + 1;
        let _span = trace_span!("score_map", rows = height, cols = width).entered();

        let mut scores = vec![f64::NEG_INFINITY; width * height];
        scores
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, slot) in row.iter_mut().enumerate() {
                    *slot = ncc_score(src, integral, stats, x, y);
                }
            });

        Self {
            scores,
            width,
            height,
        }
    }

    /// Returns the number of anchor columns (`W - w + 1`).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of anchor rows (`H - h + 1`).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the score at anchor `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.scores[y * self.width + x]
    }

    /// Argmax under the deterministic order; `None` when every window is
    /// flat.
    pub fn best(&self) -> Option<Candidate> {
        self.scores
            .par_chunks(self.width)
            .enumerate()
            .filter_map(|(y, row)| best_in_row(row, y))
            .reduce_with(better)
    }

    /// Collects every anchor scoring at least `min_score`.
    ///
    /// Flat windows never qualify: the sentinel compares below any finite
    /// threshold.
    pub fn candidates_above(&self, min_score: f64) -> Vec<Candidate> {
        self.scores
            .par_chunks(self.width)
            .enumerate()
            .flat_map_iter(|(y, row)| {
                row.iter().enumerate().filter_map(move |(x, &score)| {
                    (score >= min_score).then_some(Candidate { x, y, score })
                })
            })
            .collect()
    }
}

#[inline]
fn best_in_row(row: &[f64], y: usize) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for (x, &score) in row.iter().enumerate() {
        if score == f64::NEG_INFINITY {
            continue;
        }
        let cand = Candidate { x, y, score };
        best = Some(match best {
            Some(prev) => better(prev, cand),
            None => cand,
        });
    }
    best
}

/// Argmax over the full anchor grid without materializing a score map.
///
/// Row-parallel like [`ScoreMap::compute`]; the per-row winners meet in a
/// reduction ordered by the candidate total order.
pub fn best_anchor(
    src: &GrayImage,
    integral: &IntegralPair,
    stats: &TemplateStats,
) -> Option<Candidate> {
    let max_x = src.width() - stats.width();
    let max_y = src.height() - stats.height();
    let _span = trace_span!("argmax_scan", rows = max_y + 1, cols = max_x + 1).entered();

    (0..=max_y)
        .into_par_iter()
        .filter_map(|y| {
            let mut best: Option<Candidate> = None;
            for x in 0..=max_x {
                let score = ncc_score(src, integral, stats, x, y);
                if score == f64::NEG_INFINITY {
                    continue;
                }
                let cand = Candidate { x, y, score };
                best = Some(match best {
                    Some(prev) => better(prev, cand),
                    None => cand,
                });
            }
            best
        })
        .reduce_with(better)
}

/// Best anchor inside the inclusive window `[x0, x1] x [y0, y1]`, serial.
///
/// Refinement windows are a handful of anchors, not worth forking for.
pub fn best_in_window(
    src: &GrayImage,
    integral: &IntegralPair,
    stats: &TemplateStats,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let score = ncc_score(src, integral, stats, x, y);
            if score == f64::NEG_INFINITY {
                continue;
            }
            let cand = Candidate { x, y, score };
            best = Some(match best {
                Some(prev) => better(prev, cand),
                None => cand,
            });
        }
    }
    best
}
