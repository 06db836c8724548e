//! Property-based invariants of the label overlap resolver.
//!
//! 1. Kept intervals never overlap each other (both strategies)
//! 2. Same buffer, same mask
//! 3. Greedy: every dropped interval overlaps a kept one at least as heavy
//! 4. Re-resolving the survivors keeps all of them
//! 5. The decoder keeps original order
//! 6. Intervals that only touch are all kept
//! 7. Optimal: kept weight equals the brute-force optimum on small inputs
//! 8. Domains never interfere with each other

use pie_labels::overlap::Strategy as Resolution;
use pie_labels::overlap::{
    Interval, LabelRemover, STRIDE, encode, filter, kept_indices, resolve_with,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn interval_strategy() -> impl Strategy<Value = Interval> {
    (0u32..200, 0u32..40, 0u32..100).prop_map(|(lower, len, weight)| {
        Interval::new(f64::from(lower), f64::from(lower + len), f64::from(weight))
    })
}

fn resolver_strategy() -> impl Strategy<Value = Resolution> {
    prop_oneof![Just(Resolution::Greedy), Just(Resolution::Optimal)]
}

fn mask_of(intervals: &[Interval], strategy: Resolution) -> Vec<u8> {
    let buffer = encode(intervals, |interval| *interval);
    let mut mask = buffer.new_mask();
    resolve_with(buffer.as_slice(), &mut mask, strategy).expect("valid buffer");
    mask
}

fn total_weight(intervals: &[Interval], indices: &[usize]) -> f64 {
    indices.iter().map(|idx| intervals[*idx].weight).sum()
}

fn brute_force_best(intervals: &[Interval]) -> f64 {
    let n = intervals.len();
    let mut best = 0.0_f64;
    for subset in 0u32..(1 << n) {
        let members: Vec<usize> = (0..n).filter(|i| subset & (1 << i) != 0).collect();
        let compatible = members.iter().enumerate().all(|(pos, a)| {
            members[pos + 1..]
                .iter()
                .all(|b| !intervals[*a].overlaps(&intervals[*b]))
        });
        if compatible {
            best = best.max(total_weight(intervals, &members));
        }
    }
    best
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn kept_intervals_never_overlap(
        intervals in prop::collection::vec(interval_strategy(), 0..60),
        strategy in resolver_strategy(),
    ) {
        let mask = mask_of(&intervals, strategy);
        let kept = kept_indices(&mask);
        for (pos, a) in kept.iter().enumerate() {
            for b in &kept[pos + 1..] {
                prop_assert!(
                    !intervals[*a].overlaps(&intervals[*b]),
                    "kept {} and {} overlap", a, b
                );
            }
        }
    }

    #[test]
    fn resolution_is_deterministic(
        intervals in prop::collection::vec(interval_strategy(), 0..60),
        strategy in resolver_strategy(),
    ) {
        prop_assert_eq!(mask_of(&intervals, strategy), mask_of(&intervals, strategy));
    }

    #[test]
    fn greedy_drops_only_for_heavier_neighbours(
        intervals in prop::collection::vec(interval_strategy(), 0..60),
    ) {
        let mask = mask_of(&intervals, Resolution::Greedy);
        let kept = kept_indices(&mask);
        for (idx, cell) in mask.iter().enumerate() {
            if *cell > 0 {
                continue;
            }
            let dropped = &intervals[idx];
            prop_assert!(
                kept.iter().any(|k| {
                    let other = &intervals[*k];
                    other.overlaps(dropped) && other.weight >= dropped.weight
                }),
                "interval {} dropped without a heavier overlapping survivor", idx
            );
        }
    }

    #[test]
    fn survivors_survive_again(
        intervals in prop::collection::vec(interval_strategy(), 0..60),
        strategy in resolver_strategy(),
    ) {
        let mask = mask_of(&intervals, strategy);
        let survivors: Vec<Interval> = filter(intervals.iter().copied(), &mask).unwrap();
        let again = mask_of(&survivors, strategy);
        prop_assert!(again.iter().all(|cell| *cell > 0));
    }

    #[test]
    fn decoder_preserves_order(
        intervals in prop::collection::vec(interval_strategy(), 0..60),
    ) {
        let tagged: Vec<(usize, Interval)> = intervals.iter().copied().enumerate().collect();
        let buffer = encode(&tagged, |(_, interval)| *interval);
        prop_assert_eq!(buffer.as_slice().len(), tagged.len() * STRIDE);
        let mut mask = buffer.new_mask();
        resolve_with(buffer.as_slice(), &mut mask, Resolution::Greedy).unwrap();
        let kept: Vec<usize> = filter(tagged.iter(), &mask)
            .unwrap()
            .into_iter()
            .map(|(idx, _)| *idx)
            .collect();
        prop_assert!(kept.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(kept, kept_indices(&mask));
    }

    #[test]
    fn touching_intervals_are_all_kept(
        weights in prop::collection::vec(0u32..100, 0..40),
        height in 1u32..50,
        strategy in resolver_strategy(),
    ) {
        let intervals: Vec<Interval> = weights
            .iter()
            .enumerate()
            .map(|(i, weight)| {
                let lower = f64::from(height) * i as f64;
                Interval::new(lower, lower + f64::from(height), f64::from(*weight))
            })
            .collect();
        let mask = mask_of(&intervals, strategy);
        prop_assert!(mask.iter().all(|cell| *cell > 0));
    }

    #[test]
    fn optimal_matches_brute_force(
        intervals in prop::collection::vec(interval_strategy(), 0..10),
    ) {
        let optimal = kept_indices(&mask_of(&intervals, Resolution::Optimal));
        let greedy = kept_indices(&mask_of(&intervals, Resolution::Greedy));
        let best = brute_force_best(&intervals);
        prop_assert_eq!(total_weight(&intervals, &optimal), best);
        prop_assert!(total_weight(&intervals, &greedy) <= best);
    }

    #[test]
    fn domains_are_independent(
        items in prop::collection::vec((0u8..3, interval_strategy()), 0..60),
        strategy in resolver_strategy(),
    ) {
        let remover = LabelRemover::new(strategy);
        let kept = remover
            .retain_by_domain(&items, |(domain, _)| *domain, |(_, interval)| *interval)
            .unwrap();

        let mut expected = Vec::new();
        for domain in 0u8..3 {
            let members: Vec<(u8, Interval)> =
                items.iter().copied().filter(|(d, _)| *d == domain).collect();
            let survivors = remover.retain(&members, |(_, interval)| *interval).unwrap();
            expected.extend(survivors.into_iter().copied());
        }
        let kept: Vec<(u8, Interval)> = kept.into_iter().copied().collect();
        prop_assert_eq!(kept, expected);
    }
}
