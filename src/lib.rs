//! Pixmatch locates occurrences of a small template image inside a larger
//! source image with normalized cross-correlation (NCC).
//!
//! The engine consumes already-decoded 8-bit grayscale rasters and returns
//! integer anchor positions with confidence scores in `[-1, 1]`. NCC is
//! invariant to linear brightness and contrast changes, which makes the
//! engine a fit for UI automation and screen scraping. Dense sweeps run
//! row-parallel on a shared worker pool, and large templates over large
//! sources are accelerated with coarse-to-fine pyramid refinement.
//!
//! ```
//! use pixmatch::{match_best, GrayImage};
//!
//! # fn main() -> pixmatch::PixMatchResult<()> {
//! let mut pixels = Vec::new();
//! for y in 0..16u16 {
//!     for x in 0..16u16 {
//!         pixels.push((((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8);
//!     }
//! }
//! let source = GrayImage::from_raw(pixels.clone(), 16, 16)?;
//!
//! // The template is the 4x4 block of the source anchored at (5, 3).
//! let mut patch = Vec::new();
//! for y in 3..7 {
//!     for x in 5..9 {
//!         patch.push(pixels[y * 16 + x]);
//!     }
//! }
//! let template = GrayImage::from_raw(patch, 4, 4)?;
//!
//! let found = match_best(&source, &template, 0.95)?.expect("template is present");
//! assert_eq!((found.x, found.y), (5, 3));
//! # Ok(())
//! # }
//! ```

pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod pool;
pub mod search;
pub mod template;
pub mod util;

mod candidate;
mod trace;

pub use crate::image::GrayImage;
pub use crate::pool::set_threads;
pub use crate::search::{match_all, match_best, Match, DEFAULT_MAX_COUNT, DEFAULT_THRESHOLD};
pub use crate::util::{PixMatchError, PixMatchResult};
