//! Static split of the population across workers.

use std::ops::Range;

/// Split `0..population` into `workers` contiguous, disjoint ranges that
/// cover it exactly.
///
/// The first `population % workers` ranges hold one extra agent.  With more
/// workers than agents the trailing ranges are empty.
pub fn partition(population: usize, workers: usize) -> Vec<Range<usize>> {
    debug_assert!(workers > 0);
    let base  = population / workers;
    let extra = population % workers;

    let mut start = 0;
    (0..workers)
        .map(|w| {
            let len = base + usize::from(w < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}
