//! Non-maximum suppression for overlapping detections.

use crate::candidate::topk::{sort_desc, Candidate};

/// Suppression radius for a `w x h` template: half its smaller side.
///
/// For equal-size boxes the distance between top-left anchors equals the
/// distance between centers, so anchors stand in for centers everywhere.
pub(crate) fn template_radius(width: usize, height: usize) -> usize {
    width.min(height) / 2
}

/// Deduplicates candidates whose centers crowd a better one.
///
/// Candidates are ranked with the deterministic order, then greedily
/// accepted while their Chebyshev distance to every kept candidate is at
/// least `radius`. Stops after `max_count` acceptances.
pub fn suppress(cands: &mut [Candidate], radius: usize, max_count: usize) -> Vec<Candidate> {
    sort_desc(cands);

    let mut kept: Vec<Candidate> = Vec::new();
    'next: for cand in cands.iter().copied() {
        if kept.len() == max_count {
            break;
        }
        for prev in &kept {
            let dx = cand.x.abs_diff(prev.x);
            let dy = cand.y.abs_diff(prev.y);
            if dx.max(dy) < radius {
                continue 'next;
            }
        }
        kept.push(cand);
    }
    kept
}
