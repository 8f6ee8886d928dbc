//! Search orchestration: full-frame sweeps, coarse-to-fine pyramid
//! refinement, and result packaging.

pub(crate) mod refine;
pub mod scan;

use crate::candidate::nms::{suppress, template_radius};
use crate::candidate::topk::{sort_desc, Candidate};
use crate::image::integral::IntegralPair;
use crate::image::pyramid::Pyramid;
use crate::image::GrayImage;
use crate::template::TemplateStats;
use crate::trace::{trace_event, trace_span};
use crate::util::{PixMatchError, PixMatchResult};
use self::scan::{best_anchor, ScoreMap};

/// Default confidence threshold for accepting a match.
pub const DEFAULT_THRESHOLD: f64 = 0.8;
/// Default cap on the number of matches returned by [`match_all`].
pub const DEFAULT_MAX_COUNT: usize = 10;

/// Template side below which the pyramid costs more than it saves.
const PYRAMID_MIN_TPL_SIDE: usize = 64;
/// Source side below which the pyramid costs more than it saves.
const PYRAMID_MIN_IMG_SIDE: usize = 256;
/// Pyramid levels above the base, at most.
const PYRAMID_MAX_EXTRA_LEVELS: usize = 3;
/// Smallest template side tolerated at the coarsest level.
const PYRAMID_MIN_COARSE_SIDE: usize = 8;
/// Threshold slack granted at the coarsest level.
const COARSE_SLACK: f64 = 0.15;
/// Coarse candidates carried into single-target refinement.
const SINGLE_COARSE_KEEP: usize = 4;
/// Floor on coarse candidates carried into multi-target refinement.
const MULTI_COARSE_KEEP_MIN: usize = 16;

/// A located template occurrence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Column of the matched rectangle's top-left corner.
    pub x: u32,
    /// Row of the matched rectangle's top-left corner.
    pub y: u32,
    /// NCC score in `[-1, 1]`, at least the requested threshold.
    pub confidence: f64,
}

impl From<Candidate> for Match {
    fn from(cand: Candidate) -> Self {
        Self {
            x: cand.x as u32,
            y: cand.y as u32,
            confidence: cand.score,
        }
    }
}

#[derive(Clone, Copy)]
enum SearchMode {
    Single,
    Multi { max_count: usize },
}

impl SearchMode {
    fn coarse_keep(self) -> usize {
        match self {
            SearchMode::Single => SINGLE_COARSE_KEEP,
            SearchMode::Multi { max_count } => (2 * max_count).max(MULTI_COARSE_KEEP_MIN),
        }
    }
}

/// Finds the best occurrence of `template` inside `source`.
///
/// Returns `None` when no placement reaches `threshold`; that outcome is
/// not an error.
pub fn match_best(
    source: &GrayImage,
    template: &GrayImage,
    threshold: f64,
) -> PixMatchResult<Option<Match>> {
    validate(source, template, threshold, 1)?;
    let stats = TemplateStats::compute(template)?;

    let mut found = search(source, template, &stats, threshold, SearchMode::Single)?;
    sort_desc(&mut found);
    Ok(found
        .first()
        .copied()
        .filter(|cand| cand.score >= threshold)
        .map(Match::from))
}

/// Finds up to `max_count` non-overlapping occurrences, best first.
///
/// Results are ordered by descending confidence with `(y, x)` tie-breaks
/// and deduplicated so no two centers fall within half the smaller
/// template side of each other.
pub fn match_all(
    source: &GrayImage,
    template: &GrayImage,
    threshold: f64,
    max_count: usize,
) -> PixMatchResult<Vec<Match>> {
    validate(source, template, threshold, max_count)?;
    let stats = TemplateStats::compute(template)?;

    let mut found = search(
        source,
        template,
        &stats,
        threshold,
        SearchMode::Multi { max_count },
    )?;
    found.retain(|cand| cand.score >= threshold);

    let radius = template_radius(template.width(), template.height());
    let kept = suppress(&mut found, radius, max_count);
    trace_event!("matches", found = kept.len());
    Ok(kept.into_iter().map(Match::from).collect())
}

fn validate(
    source: &GrayImage,
    template: &GrayImage,
    threshold: f64,
    max_count: usize,
) -> PixMatchResult<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(PixMatchError::InvalidThreshold { value: threshold });
    }
    if max_count == 0 {
        return Err(PixMatchError::InvalidMaxCount { value: max_count });
    }
    if template.width() > source.width() || template.height() > source.height() {
        return Err(PixMatchError::TemplateLargerThanSource {
            tpl_width: template.width(),
            tpl_height: template.height(),
            img_width: source.width(),
            img_height: source.height(),
        });
    }
    Ok(())
}

/// Dispatches between the single-level sweep and the pyramid pipeline.
///
/// Returned candidates are refined to full resolution but not yet
/// threshold-filtered; callers apply the user threshold when packaging.
fn search(
    source: &GrayImage,
    template: &GrayImage,
    stats: &TemplateStats,
    threshold: f64,
    mode: SearchMode,
) -> PixMatchResult<Vec<Candidate>> {
    if pyramid_applies(source, template) {
        search_pyramid(source, template, stats, threshold, mode)
    } else {
        Ok(full_search(source, stats, threshold, mode))
    }
}

/// Pyramid acceleration pays off only for large templates on large images.
fn pyramid_applies(source: &GrayImage, template: &GrayImage) -> bool {
    template.width().min(template.height()) >= PYRAMID_MIN_TPL_SIDE
        && source.width().min(source.height()) >= PYRAMID_MIN_IMG_SIDE
}

/// Deepest level that keeps the downsampled template at a usable size.
fn pyramid_depth(tpl_width: usize, tpl_height: usize) -> usize {
    let mut depth = 0;
    while depth < PYRAMID_MAX_EXTRA_LEVELS
        && (tpl_width >> (depth + 1)).min(tpl_height >> (depth + 1)) >= PYRAMID_MIN_COARSE_SIDE
    {
        depth += 1;
    }
    depth
}

/// Single-level sweep over the full anchor rectangle.
fn full_search(
    source: &GrayImage,
    stats: &TemplateStats,
    min_score: f64,
    mode: SearchMode,
) -> Vec<Candidate> {
    let integral = IntegralPair::build(source);
    match mode {
        SearchMode::Single => best_anchor(source, &integral, stats).into_iter().collect(),
        SearchMode::Multi { .. } => {
            ScoreMap::compute(source, &integral, stats).candidates_above(min_score)
        }
    }
}

/// Coarse-to-fine search: full sweep at the coarsest level, then radius-2
/// window refinement through every finer level down to the base.
fn search_pyramid(
    source: &GrayImage,
    template: &GrayImage,
    base_stats: &TemplateStats,
    threshold: f64,
    mode: SearchMode,
) -> PixMatchResult<Vec<Candidate>> {
    let mut depth = pyramid_depth(template.width(), template.height());
    let src_pyramid = Pyramid::build(source, depth + 1)?;
    let tpl_pyramid = Pyramid::build(template, depth + 1)?;
    depth = depth
        .min(src_pyramid.len() - 1)
        .min(tpl_pyramid.len() - 1);

    // Stats for levels above the base. Downsampling can flatten a
    // low-contrast template; such levels are dropped from the top.
    let mut upper_stats: Vec<TemplateStats> = Vec::with_capacity(depth);
    for level in 1..=depth {
        let tpl_level = tpl_pyramid.level(level).expect("level within pyramid");
        match TemplateStats::compute(tpl_level) {
            Ok(stats) => upper_stats.push(stats),
            Err(PixMatchError::DegenerateTemplate { .. }) => {
                depth = level - 1;
                break;
            }
            Err(err) => return Err(err),
        }
    }
    if depth == 0 {
        return Ok(full_search(source, base_stats, threshold, mode));
    }
    let stats_at = |level: usize| -> &TemplateStats {
        if level == 0 {
            base_stats
        } else {
            &upper_stats[level - 1]
        }
    };

    // Coarse sweep with a relaxed threshold, pruned to the strongest
    // well-separated peaks before refinement fans out.
    let relaxed = (threshold - COARSE_SLACK).max(0.0);
    let coarse_src = src_pyramid.level(depth).expect("level within pyramid");
    let coarse_stats = stats_at(depth);
    let coarse_integral = IntegralPair::build(coarse_src);
    let map = {
        let _span = trace_span!("coarse_search", level = depth).entered();
        ScoreMap::compute(coarse_src, &coarse_integral, coarse_stats)
    };
    let mut coarse = map.candidates_above(relaxed);
    trace_event!("coarse_candidates", level = depth, count = coarse.len());
    if coarse.is_empty() {
        return Ok(Vec::new());
    }
    let coarse_radius = template_radius(coarse_stats.width(), coarse_stats.height());
    let mut current = suppress(&mut coarse, coarse_radius, mode.coarse_keep());

    for level in (0..depth).rev() {
        let src_level = src_pyramid.level(level).expect("level within pyramid");
        let level_stats = stats_at(level);
        let integral = IntegralPair::build(src_level);
        let _span = trace_span!("refine_level", level = level, candidates = current.len()).entered();
        current = refine::refine_level(src_level, &integral, level_stats, &current);
        if current.is_empty() {
            break;
        }
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::{pyramid_applies, pyramid_depth, SearchMode};
    use crate::image::GrayImage;

    fn blank(width: usize, height: usize) -> GrayImage {
        GrayImage::from_raw(vec![0u8; width * height], width, height).unwrap()
    }

    #[test]
    fn pyramid_trigger_needs_large_template_and_source() {
        assert!(pyramid_applies(&blank(256, 256), &blank(64, 64)));
        assert!(!pyramid_applies(&blank(256, 256), &blank(63, 64)));
        assert!(!pyramid_applies(&blank(256, 255), &blank(64, 64)));
        assert!(!pyramid_applies(&blank(1024, 200), &blank(128, 128)));
    }

    #[test]
    fn pyramid_depth_keeps_coarse_template_usable() {
        // 64 >> 3 = 8, exactly at the floor.
        assert_eq!(pyramid_depth(64, 64), 3);
        // 70 >> 3 = 8 as well.
        assert_eq!(pyramid_depth(70, 80), 3);
        // 60 >> 3 would leave the narrow side at 7.
        assert_eq!(pyramid_depth(60, 200), 2);
        assert_eq!(pyramid_depth(16, 16), 1);
        assert_eq!(pyramid_depth(8, 8), 0);
        // Depth never exceeds three levels above the base.
        assert_eq!(pyramid_depth(4096, 4096), 3);
    }

    #[test]
    fn coarse_keep_scales_with_max_count() {
        assert_eq!(SearchMode::Single.coarse_keep(), 4);
        assert_eq!(SearchMode::Multi { max_count: 3 }.coarse_keep(), 16);
        assert_eq!(SearchMode::Multi { max_count: 12 }.coarse_keep(), 24);
    }
}
