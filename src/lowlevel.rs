//! Low-level building blocks for custom matching pipelines.
//!
//! Most callers want [`match_best`](crate::match_best) and
//! [`match_all`](crate::match_all). These exports serve pipelines that
//! need direct access to integral tables, template statistics, or the
//! scan primitives, e.g. to score hand-picked anchors or reuse one
//! integral pair across many templates.

pub use crate::candidate::nms::suppress;
pub use crate::candidate::topk::{Candidate, TopK};
pub use crate::image::integral::IntegralPair;
pub use crate::image::pyramid::Pyramid;
pub use crate::kernel::{ncc_score, EPS};
pub use crate::search::scan::{best_anchor, best_in_window, ScoreMap};
pub use crate::template::TemplateStats;
