//! Interval arithmetic over byte-offset ranges.
//!
//! Scoring measures coverage in character-offset length over unioned
//! ranges. Union uses the classic sorted-interval merge and intersection a
//! two-pointer sweep, so overlapping chunks are never double-counted.

use std::ops::Range;

/// Merges ranges into a sorted list of disjoint ranges.
///
/// Touching ranges (`a.end == b.start`) merge; empty ranges are dropped.
///
/// # Examples
///
/// ```
/// use chunkbench::scoring::intervals::union;
///
/// let merged = union(&[10..20, 15..30, 40..50]);
/// assert_eq!(merged, vec![10..30, 40..50]);
/// ```
#[must_use]
pub fn union(intervals: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut sorted: Vec<Range<usize>> = intervals
        .iter()
        .filter(|r| r.start < r.end)
        .cloned()
        .collect();
    sorted.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Total length covered by a list of disjoint ranges.
#[must_use]
pub fn total_len(intervals: &[Range<usize>]) -> usize {
    intervals.iter().map(|r| r.end - r.start).sum()
}

/// Intersects two sorted disjoint range lists.
///
/// Both inputs must be outputs of [`union`]. The result is again sorted
/// and disjoint.
///
/// # Examples
///
/// ```
/// use chunkbench::scoring::intervals::{intersect, union};
///
/// let a = union(&[0..44]);
/// let b = union(&[10..25]);
/// assert_eq!(intersect(&a, &b), vec![10..25]);
/// ```
#[must_use]
pub fn intersect(a: &[Range<usize>], b: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let start = a[i].start.max(b[j].start);
        let end = a[i].end.min(b[j].end);
        if start < end {
            result.push(start..end);
        }
        // Advance whichever range ends first
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_union_empty() {
        assert!(union(&[]).is_empty());
    }

    #[test]
    fn test_union_disjoint_preserved() {
        let merged = union(&[0..10, 20..30]);
        assert_eq!(merged, vec![0..10, 20..30]);
    }

    #[test]
    fn test_union_overlapping_merged() {
        let merged = union(&[0..15, 10..20]);
        assert_eq!(merged, vec![0..20]);
    }

    #[test]
    fn test_union_touching_merged() {
        let merged = union(&[0..10, 10..20]);
        assert_eq!(merged, vec![0..20]);
    }

    #[test]
    fn test_union_contained_absorbed() {
        let merged = union(&[0..30, 10..20]);
        assert_eq!(merged, vec![0..30]);
    }

    #[test]
    fn test_union_unsorted_input() {
        let merged = union(&[40..50, 10..20, 15..30]);
        assert_eq!(merged, vec![10..30, 40..50]);
    }

    #[test]
    fn test_union_drops_empty_ranges() {
        let merged = union(&[5..5, 0..10]);
        assert_eq!(merged, vec![0..10]);
    }

    #[test]
    fn test_total_len() {
        assert_eq!(total_len(&[]), 0);
        assert_eq!(total_len(&[0..10, 20..25]), 15);
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = union(&[0..10]);
        let b = union(&[20..30]);
        assert!(intersect(&a, &b).is_empty());
    }

    #[test]
    fn test_intersect_partial_overlap() {
        let a = union(&[0..20]);
        let b = union(&[10..30]);
        assert_eq!(intersect(&a, &b), vec![10..20]);
    }

    #[test]
    fn test_intersect_multiple_segments() {
        let a = union(&[0..10, 20..30, 40..50]);
        let b = union(&[5..25, 45..60]);
        assert_eq!(intersect(&a, &b), vec![5..10, 20..25, 45..50]);
    }

    #[test]
    fn test_intersect_spec_scenario() {
        // R = (0,44), G = (10,25): intersection length 15
        let r = union(&[0..20, 20..44]);
        let g = union(&[10..25]);
        assert_eq!(r, vec![0..44]);
        let i = intersect(&r, &g);
        assert_eq!(total_len(&i), 15);
    }

    proptest! {
        #[test]
        fn prop_union_never_exceeds_input_sum(
            ranges in proptest::collection::vec((0usize..500, 0usize..100), 0..20)
        ) {
            let intervals: Vec<_> = ranges.iter().map(|&(s, l)| s..s + l).collect();
            let merged = union(&intervals);
            let input_sum: usize = intervals.iter().map(|r| r.end - r.start).sum();
            prop_assert!(total_len(&merged) <= input_sum);
        }

        #[test]
        fn prop_union_disjoint_and_sorted(
            ranges in proptest::collection::vec((0usize..500, 1usize..100), 0..20)
        ) {
            let intervals: Vec<_> = ranges.iter().map(|&(s, l)| s..s + l).collect();
            let merged = union(&intervals);
            for pair in merged.windows(2) {
                prop_assert!(pair[0].end < pair[1].start);
            }
        }

        #[test]
        fn prop_intersection_within_both(
            a in proptest::collection::vec((0usize..500, 1usize..100), 0..10),
            b in proptest::collection::vec((0usize..500, 1usize..100), 0..10)
        ) {
            let a: Vec<_> = a.iter().map(|&(s, l)| s..s + l).collect();
            let b: Vec<_> = b.iter().map(|&(s, l)| s..s + l).collect();
            let ua = union(&a);
            let ub = union(&b);
            let i = intersect(&ua, &ub);
            prop_assert!(total_len(&i) <= total_len(&ua));
            prop_assert!(total_len(&i) <= total_len(&ub));
        }

        #[test]
        fn prop_union_idempotent(
            ranges in proptest::collection::vec((0usize..500, 1usize..100), 0..20)
        ) {
            let intervals: Vec<_> = ranges.iter().map(|&(s, l)| s..s + l).collect();
            let once = union(&intervals);
            let twice = union(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
