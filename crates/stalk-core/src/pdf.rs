// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::kahan::{PrefixSums, neumaier_sum};
use crate::range::{self, Interval};

/// Piecewise-uniform probability density over unit-width integer bins of the
/// scaled-rate axis.
///
/// Bin `i` covers `[value_start + i, value_start + i + 1)` and `prob[i]` is
/// the mass inside it; mass is uniform within a bin. A density that has been
/// conditioned down to nothing is invalidated: both endpoints are zero and no
/// bins remain.
#[derive(Clone, Debug, PartialEq)]
pub struct RatePdf {
    value_start: i32,
    value_end: i32,
    prob: Vec<f64>,
}

impl RatePdf {
    /// Uniform density over `[a, b)`, discretized onto unit bins.
    ///
    /// Fractional endpoints get partial mass in their boundary bins. Callers
    /// must supply `a < b`.
    pub fn uniform(a: f64, b: f64) -> Self {
        debug_assert!(a < b, "uniform support must be non-empty; got [{a}, {b})");
        let value_start = a.floor() as i32;
        let value_end = b.ceil() as i32;
        let total_length = range::length([a, b]);
        let bins = (value_end - value_start).max(0) as usize;
        let mut prob = Vec::with_capacity(bins);
        for index in 0..bins {
            let bin = bin_interval(value_start, index);
            prob.push(range::intersect_length(bin, [a, b]) / total_length);
        }
        Self {
            value_start,
            value_end,
            prob,
        }
    }

    /// Smallest representable outcome.
    pub fn min_value(&self) -> f64 {
        f64::from(self.value_start)
    }

    /// Largest representable outcome.
    pub fn max_value(&self) -> f64 {
        f64::from(self.value_end)
    }

    /// False once every outcome has been conditioned away.
    pub fn is_valid(&self) -> bool {
        !self.prob.is_empty()
    }

    /// Total mass across all bins.
    pub fn total_mass(&self) -> f64 {
        neumaier_sum(self.prob.iter().copied())
    }

    /// Per-bin masses, first bin at `min_value()`.
    pub fn probabilities(&self) -> &[f64] {
        &self.prob
    }

    fn invalidate(&mut self) {
        self.value_start = 0;
        self.value_end = 0;
        self.prob.clear();
    }

    /// Conditions the density on `limit` and renormalizes.
    ///
    /// Returns the mass that lay inside `limit` under the prior density, or 0
    /// (invalidating the density) when the overlap is empty.
    pub fn range_limit(&mut self, limit: Interval) -> f64 {
        let start = limit[0].max(self.min_value());
        let end = limit[1].min(self.max_value());
        if start >= end {
            self.invalidate();
            return 0.0;
        }

        let start_bucket = start.floor() as i32;
        let end_bucket = end.ceil() as i32;
        let lo = (start_bucket - self.value_start) as usize;
        let hi = (end_bucket - self.value_start) as usize;
        for index in lo..hi {
            let bin = bin_interval(self.value_start, index);
            self.prob[index] *= range::intersect_length(bin, [start, end]);
        }
        self.prob.truncate(hi);
        self.prob.drain(..lo);
        self.value_start = start_bucket;
        self.value_end = end_bucket;

        let mass = self.total_mass();
        if mass <= 0.0 {
            self.invalidate();
            return 0.0;
        }
        for p in &mut self.prob {
            *p /= mass;
        }
        mass
    }

    /// Replaces the variable `X` with `X - U[min, max]`.
    ///
    /// `min` and `max` are rounded to the nearest bin edge. Each output bin is
    /// a window sum over the input bins with the window's two endpoint bins
    /// halved, evaluated in O(1) through compensated prefix sums. Mass is
    /// preserved by construction; no renormalization happens. A zero-width
    /// uniform is an exact translation.
    pub fn decay(&mut self, min: f64, max: f64) {
        if !self.is_valid() {
            return;
        }
        let min = min.round() as i32;
        let max = max.round() as i32;
        let width = max - min;
        if width <= 0 {
            self.value_start -= max;
            self.value_end -= min;
            return;
        }

        let max_x = self.prob.len();
        let max_y = width as usize;
        let prefix = PrefixSums::new(&self.prob);
        let mut next = Vec::with_capacity(max_x + max_y);
        for i in 0..max_x + max_y {
            let lo = i.saturating_sub(max_y);
            let hi = i.min(max_x - 1);
            let mut sum = prefix.range_sum(lo, hi + 1);
            if i >= max_y {
                sum -= self.prob[lo] / 2.0;
            }
            if i < max_x {
                sum -= self.prob[hi] / 2.0;
            }
            next.push(sum / f64::from(width));
        }
        self.value_start -= max;
        self.value_end -= min;
        self.prob = next;
    }
}

fn bin_interval(value_start: i32, index: usize) -> Interval {
    let lo = f64::from(value_start) + index as f64;
    [lo, lo + 1.0]
}
