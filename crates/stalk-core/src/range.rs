// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// A closed-open numeric interval `[lo, hi)` stored as an ordered pair.
///
/// Degenerate intervals with `lo == hi` are allowed and have length zero.
pub type Interval = [f64; 2];

/// Length of an interval.
pub fn length(range: Interval) -> f64 {
    range[1] - range[0]
}

/// Intersection of two intervals, or `None` when they do not overlap.
pub fn intersect(a: Interval, b: Interval) -> Option<Interval> {
    if a[0] > b[1] || a[1] < b[0] {
        return None;
    }
    Some([a[0].max(b[0]), a[1].min(b[1])])
}

/// Length of the intersection; zero when the intervals do not overlap.
pub fn intersect_length(a: Interval, b: Interval) -> f64 {
    intersect(a, b).map_or(0.0, length)
}
