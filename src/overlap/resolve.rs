use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::interval::{Interval, STRIDE};
use crate::error::{ResolveError, Result};

/// Value written into a keep-mask cell for a surviving interval.
pub const KEEP: u8 = u8::MAX;
/// Value written into a keep-mask cell for a dropped interval.
pub const DROP: u8 = 0;

/// How the resolver chooses among overlapping intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Heaviest first, ties by lower index; accept whatever does not collide
    /// with an interval already accepted.
    #[default]
    Greedy,
    /// Maximum total weight over all non-overlapping subsets.
    Optimal,
}

/// Resolve one side's packed buffer into `mask` with the greedy strategy.
///
/// `buffer` holds `(lower, upper, weight)` triples; `mask` must hold one cell
/// per triple. On success every cell is written exactly once: [`KEEP`] for a
/// retained interval, [`DROP`] otherwise. On error `mask` is left untouched.
pub fn resolve(buffer: &[f64], mask: &mut [u8]) -> Result<()> {
    resolve_with(buffer, mask, Strategy::Greedy)
}

/// Like [`resolve`], with an explicit strategy.
pub fn resolve_with(buffer: &[f64], mask: &mut [u8], strategy: Strategy) -> Result<()> {
    if buffer.len() % STRIDE != 0 {
        return Err(ResolveError::BufferStride {
            len: buffer.len(),
            stride: STRIDE,
        });
    }
    let expected = buffer.len() / STRIDE;
    if mask.len() != expected {
        return Err(ResolveError::MaskLength {
            expected,
            actual: mask.len(),
        });
    }
    let intervals = read_intervals(buffer)?;

    let keep = match strategy {
        Strategy::Greedy => keep_heaviest_first(&intervals),
        Strategy::Optimal => keep_max_weight(&intervals),
    };

    let mut kept = 0usize;
    for (cell, retained) in mask.iter_mut().zip(&keep) {
        if *retained {
            kept += 1;
            *cell = KEEP;
        } else {
            *cell = DROP;
        }
    }
    debug!(
        "resolved {} label intervals ({:?}): kept {}, dropped {}",
        intervals.len(),
        strategy,
        kept,
        intervals.len() - kept
    );
    Ok(())
}

fn read_intervals(buffer: &[f64]) -> Result<Vec<Interval>> {
    buffer
        .chunks_exact(STRIDE)
        .enumerate()
        .map(|(index, slots)| Interval::from_slots(index, slots))
        .collect()
}

fn keep_heaviest_first(intervals: &[Interval]) -> Vec<bool> {
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by(|&a, &b| {
        intervals[b]
            .weight
            .total_cmp(&intervals[a].weight)
            .then_with(|| a.cmp(&b))
    });

    let mut keep = vec![false; intervals.len()];
    let mut accepted: Vec<Interval> = Vec::new();
    for idx in order {
        let candidate = &intervals[idx];
        if accepted.iter().any(|other| candidate.overlaps(other)) {
            trace!("drop interval {idx} (weight {})", candidate.weight);
            continue;
        }
        trace!("keep interval {idx} (weight {})", candidate.weight);
        accepted.push(*candidate);
        keep[idx] = true;
    }
    keep
}

// Weighted interval scheduling. Intervals are visited by upper bound (then
// lower bound, then index); `best[m]` is the heaviest compatible subset of the
// first `m` visited intervals. Ties prefer taking the interval.
fn keep_max_weight(intervals: &[Interval]) -> Vec<bool> {
    let n = intervals.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let (x, y) = (&intervals[a], &intervals[b]);
        x.upper
            .total_cmp(&y.upper)
            .then_with(|| x.lower.total_cmp(&y.lower))
            .then_with(|| a.cmp(&b))
    });

    let mut best = vec![0.0_f64; n + 1];
    let mut predecessor = vec![0usize; n];
    let mut take = vec![false; n];
    for m in 0..n {
        let current = &intervals[order[m]];
        let p = order[..m].partition_point(|&k| intervals[k].upper <= current.lower);
        predecessor[m] = p;
        let with_current = best[p] + current.weight;
        if with_current >= best[m] {
            best[m + 1] = with_current;
            take[m] = true;
        } else {
            best[m + 1] = best[m];
        }
    }

    let mut keep = vec![false; n];
    let mut m = n;
    while m > 0 {
        if take[m - 1] {
            keep[order[m - 1]] = true;
            m = predecessor[m - 1];
        } else {
            m -= 1;
        }
    }
    trace!("max-weight selection totals {}", best[n]);
    keep
}
