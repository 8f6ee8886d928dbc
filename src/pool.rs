//! Process-wide worker pool configuration.
//!
//! All sweeps share one global rayon pool. When [`set_threads`] is never
//! called, rayon sizes and builds the pool lazily on the first parallel
//! sweep; concurrent first searches all observe the same pool.

use crate::util::{PixMatchError, PixMatchResult};

/// Sizes the global worker pool.
///
/// `threads == 0` auto-detects the logical core count, floored at one
/// worker. Call this before the first search: once any search has built
/// the pool, reconfiguration fails with [`PixMatchError::ThreadPool`] and
/// the existing pool stays in effect.
pub fn set_threads(threads: usize) -> PixMatchResult<()> {
    let workers = if threads == 0 {
        num_cpus::get().max(1)
    } else {
        threads
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()
        .map_err(|err| PixMatchError::ThreadPool {
            reason: err.to_string(),
        })
}
