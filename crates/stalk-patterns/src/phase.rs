// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use stalk_core::pdf::RatePdf;
use stalk_core::range::{self, Interval};
use stalk_core::series::{PriceBounds, PriceWeek, SLOT_COUNT};

use crate::rates::{RATE_MULTIPLIER, price_from_rate, rate_interval_for_price};

/// Per-scenario working state: the observed week, the fudge tolerance, and
/// the envelope committed so far. Phases own consecutive slots starting at
/// the current cursor; each phase call appends one [`PriceBounds`] per slot
/// and returns the conditional probability of its observations, or `None`
/// when an observation refutes the phase.
///
/// Observation handling is uniform across phases: an observation outside the
/// envelope widened by the fudge factor refutes the scenario; an accepted
/// observation is clamped into the envelope before its rate interval is
/// computed, but the committed bounds collapse to the raw observation.
#[derive(Clone, Debug)]
pub(crate) struct WeekSketch<'a> {
    observed: &'a PriceWeek,
    buy_price: i32,
    fudge: i32,
    bounds: Vec<PriceBounds>,
}

impl<'a> WeekSketch<'a> {
    /// Seeds slots 0 and 1 with the buy price. Returns `None` when the buy
    /// price is unobserved; the driver enumerates candidates in that case.
    pub(crate) fn new(observed: &'a PriceWeek, fudge: i32) -> Option<Self> {
        let buy_price = observed.buy_price()?;
        let mut bounds = Vec::with_capacity(SLOT_COUNT);
        bounds.push(PriceBounds::exact(buy_price));
        bounds.push(PriceBounds::exact(buy_price));
        Some(Self {
            observed,
            buy_price,
            fudge,
            bounds,
        })
    }

    /// Index of the next unowned slot.
    pub(crate) fn next_slot(&self) -> usize {
        self.bounds.len()
    }

    /// The committed envelope; callable only once all 14 slots are owned.
    pub(crate) fn into_bounds(self) -> [PriceBounds; SLOT_COUNT] {
        let slots = self.bounds.len();
        match <[PriceBounds; SLOT_COUNT]>::try_from(self.bounds) {
            Ok(bounds) => bounds,
            Err(_) => panic!("scenario must own all {SLOT_COUNT} slots; got {slots}"),
        }
    }

    fn accepts(&self, observed: i32, min_pred: i32, max_pred: i32) -> bool {
        observed >= min_pred - self.fudge && observed <= max_pred + self.fudge
    }

    /// A run of independent slots, each `ceil(U(rate_min, rate_max) · buy)`.
    pub(crate) fn individual_random(
        &mut self,
        length: usize,
        rate_min: f64,
        rate_max: f64,
    ) -> Option<f64> {
        let rate_min = rate_min * RATE_MULTIPLIER;
        let rate_max = rate_max * RATE_MULTIPLIER;
        let mut prob = 1.0;
        for _ in 0..length {
            let slot = self.next_slot();
            let min_pred = price_from_rate(rate_min, self.buy_price);
            let max_pred = price_from_rate(rate_max, self.buy_price);
            if let Some(observed) = self.observed.get(slot) {
                if !self.accepts(observed, min_pred, max_pred) {
                    return None;
                }
                let clamped = observed.clamp(min_pred, max_pred);
                let real_rate = rate_interval_for_price(clamped, self.buy_price);
                prob *= range::intersect_length([rate_min, rate_max], real_rate)
                    / (rate_max - rate_min);
                if prob == 0.0 {
                    return None;
                }
                self.bounds.push(PriceBounds::exact(observed));
            } else {
                self.bounds.push(PriceBounds {
                    min: min_pred,
                    max: max_pred,
                });
            }
        }
        Some(prob)
    }

    /// A run drawn once from `U(start_rate_min, start_rate_max)` and decayed
    /// by `U(decay_min, decay_max)` after every slot. The evolving rate
    /// distribution is tracked exactly as a [`RatePdf`], so an observation
    /// conditions every later slot's envelope.
    pub(crate) fn decreasing_random(
        &mut self,
        length: usize,
        start_rate_min: f64,
        start_rate_max: f64,
        decay_min: f64,
        decay_max: f64,
    ) -> Option<f64> {
        let mut rate_pdf = RatePdf::uniform(
            start_rate_min * RATE_MULTIPLIER,
            start_rate_max * RATE_MULTIPLIER,
        );
        let decay_min = decay_min * RATE_MULTIPLIER;
        let decay_max = decay_max * RATE_MULTIPLIER;
        let mut prob = 1.0;
        for _ in 0..length {
            let slot = self.next_slot();
            let min_pred = price_from_rate(rate_pdf.min_value(), self.buy_price);
            let max_pred = price_from_rate(rate_pdf.max_value(), self.buy_price);
            if let Some(observed) = self.observed.get(slot) {
                if !self.accepts(observed, min_pred, max_pred) {
                    return None;
                }
                let clamped = observed.clamp(min_pred, max_pred);
                prob *= rate_pdf.range_limit(rate_interval_for_price(clamped, self.buy_price));
                if prob == 0.0 {
                    return None;
                }
                self.bounds.push(PriceBounds::exact(observed));
            } else {
                self.bounds.push(PriceBounds {
                    min: min_pred,
                    max: max_pred,
                });
            }
            rate_pdf.decay(decay_min, decay_max);
        }
        Some(prob)
    }

    /// Three-slot nested-uniform peak with outer range
    /// `(rate_min, rate_max)`: the middle rate is drawn from the outer
    /// range, each neighbour from `U(rate_min, middle)` independently, and
    /// neighbour prices are emitted one unit under the draw.
    pub(crate) fn peak(&mut self, rate_min: f64, rate_max: f64) -> Option<f64> {
        let rate_min = rate_min * RATE_MULTIPLIER;
        let rate_max = rate_max * RATE_MULTIPLIER;
        let start = self.next_slot();
        let mut prob = 1.0;
        let mut rate_range = [rate_min, rate_max];

        // Probability first: the middle observation narrows the range the
        // neighbours are conditioned on.
        if let Some(observed) = self.observed.get(start + 1) {
            let min_pred = price_from_rate(rate_min, self.buy_price);
            let max_pred = price_from_rate(rate_max, self.buy_price);
            if !self.accepts(observed, min_pred, max_pred) {
                return None;
            }
            let clamped = observed.clamp(min_pred, max_pred);
            let real_rate = rate_interval_for_price(clamped, self.buy_price);
            prob *= range::intersect_length(rate_range, real_rate) / range::length(rate_range);
            if prob == 0.0 {
                return None;
            }
            rate_range = range::intersect(rate_range, real_rate)?;
        }

        for neighbour in [start, start + 2] {
            let Some(observed) = self.observed.get(neighbour) else {
                continue;
            };
            let min_pred = price_from_rate(rate_min, self.buy_price) - 1;
            let max_pred = price_from_rate(rate_max, self.buy_price) - 1;
            if !self.accepts(observed, min_pred, max_pred) {
                return None;
            }
            // +1 inverts the -1 applied when the neighbour price is emitted.
            let inverted = observed.clamp(min_pred, max_pred) + 1;
            let rate2_range = rate_interval_for_price(inverted, self.buy_price);
            prob *= neighbour_cdf(rate2_range[1], rate_range, rate_min)
                - neighbour_cdf(rate2_range[0], rate_range, rate_min);
            if prob == 0.0 {
                return None;
            }
        }

        // Emission in forward slot order.
        let mut min_pred = price_from_rate(rate_min, self.buy_price) - 1;
        let mut max_pred = price_from_rate(rate_max, self.buy_price) - 1;
        if let Some(observed) = self.observed.get(start) {
            min_pred = observed;
            max_pred = observed;
        }
        self.bounds.push(PriceBounds {
            min: min_pred,
            max: max_pred,
        });

        let mut min_pred = self.bounds[start].min;
        let mut max_pred = price_from_rate(rate_max, self.buy_price);
        if let Some(observed) = self.observed.get(start + 1) {
            min_pred = observed;
            max_pred = observed;
        }
        self.bounds.push(PriceBounds {
            min: min_pred,
            max: max_pred,
        });

        let mut min_pred = price_from_rate(rate_min, self.buy_price) - 1;
        let mut max_pred = self.bounds[start + 1].max - 1;
        if let Some(observed) = self.observed.get(start + 2) {
            min_pred = observed;
            max_pred = observed;
        }
        self.bounds.push(PriceBounds {
            min: min_pred,
            max: max_pred,
        });

        Some(prob)
    }
}

/// CDF of a neighbour's scaled rate.
///
/// With the middle rate `m ~ U(a, b)` over the surviving `rate_range` and the
/// neighbour `y ~ U(c, m)`, `P(y < t)` integrates to
/// `(F(t - c, b - c) - F(t - c, a - c)) / (b - a)` with
/// `F(t, z) = 0` for `t <= 0`, `z` for `z < t`, else `t - t·(ln t - ln z)`.
fn neighbour_cdf(t: f64, rate_range: Interval, rate_min: f64) -> f64 {
    let [a, b] = rate_range;
    let c = rate_min;
    let z1 = a - c;
    let z2 = b - c;
    (cdf_piece(t - c, z2) - cdf_piece(t - c, z1)) / (z2 - z1)
}

fn cdf_piece(t: f64, z: f64) -> f64 {
    if t <= 0.0 {
        0.0
    } else if z < t {
        z
    } else {
        t - t * (t.ln() - z.ln())
    }
}
