//! Candidate collection and pruning utilities.
//!
//! Includes the deterministic candidate order, Top-K retention, and spatial
//! non-maximum suppression.

pub(crate) mod nms;
pub(crate) mod topk;

pub use topk::{Candidate, TopK};
