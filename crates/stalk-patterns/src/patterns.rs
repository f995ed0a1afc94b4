// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use stalk_core::series::{PriceBounds, PriceWeek, SLOT_COUNT};

use crate::pattern::Pattern;
use crate::phase::WeekSketch;

/// One fully specified hypothesis for the week: a regime, a hidden-parameter
/// assignment realized as a per-slot envelope, and its unnormalized mass.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub pattern: Pattern,
    pub bounds: [PriceBounds; SLOT_COUNT],
    pub probability: f64,
}

impl Scenario {
    fn from_sketch(pattern: Pattern, sketch: WeekSketch<'_>, probability: f64) -> Self {
        Self {
            pattern,
            bounds: sketch.into_bounds(),
            probability,
        }
    }

    /// This scenario with its mass scaled by `factor`.
    pub fn weighted(mut self, factor: f64) -> Self {
        self.probability *= factor;
        self
    }
}

/// Fluctuating: high1, dec1, high2, dec2, high3. Hidden parameters are the
/// two free high-phase lengths and the first decreasing-phase length,
/// enumerated lexicographically with a uniform prior.
pub fn fluctuating(week: &PriceWeek, fudge: i32) -> impl Iterator<Item = Scenario> + '_ {
    (2usize..4).flat_map(move |dec1_len| {
        (0usize..7).flat_map(move |high1_len| {
            (0usize..7 - high1_len).filter_map(move |high3_len| {
                let prior = 1.0 / 2.0 / 7.0 / (7 - high1_len) as f64;
                fluctuating_with_lengths(week, fudge, high1_len, dec1_len, high3_len)
                    .map(|scenario| scenario.weighted(prior))
            })
        })
    })
}

fn fluctuating_with_lengths(
    week: &PriceWeek,
    fudge: i32,
    high1_len: usize,
    dec1_len: usize,
    high3_len: usize,
) -> Option<Scenario> {
    let high2_len = 7 - high1_len - high3_len;
    let dec2_len = 5 - dec1_len;

    let mut sketch = WeekSketch::new(week, fudge)?;
    let mut probability = 1.0;
    probability *= sketch.individual_random(high1_len, 0.9, 1.4)?;
    probability *= sketch.decreasing_random(dec1_len, 0.6, 0.8, 0.04, 0.1)?;
    probability *= sketch.individual_random(high2_len, 0.9, 1.4)?;
    probability *= sketch.decreasing_random(dec2_len, 0.6, 0.8, 0.04, 0.1)?;
    probability *= sketch.individual_random(high3_len, 0.9, 1.4)?;
    assert_eq!(
        sketch.next_slot(),
        SLOT_COUNT,
        "fluctuating phase lengths must fill the week"
    );
    Some(Scenario::from_sketch(Pattern::Fluctuating, sketch, probability))
}

const SPIKE_RATE_MINS: [f64; 6] = [0.9, 1.4, 2.0, 1.4, 0.9, 0.4];
const SPIKE_RATE_MAXES: [f64; 6] = [1.4, 2.0, 6.0, 2.0, 1.4, 0.9];

/// Large spike: an early decay, five fixed spike bands, then a low tail.
/// The hidden parameter is the slot the spike starts on.
pub fn large_spike(week: &PriceWeek, fudge: i32) -> impl Iterator<Item = Scenario> + '_ {
    (3usize..10).filter_map(move |peak_start| {
        large_spike_with_peak(week, fudge, peak_start)
            .map(|scenario| scenario.weighted(1.0 / 7.0))
    })
}

fn large_spike_with_peak(week: &PriceWeek, fudge: i32, peak_start: usize) -> Option<Scenario> {
    let mut sketch = WeekSketch::new(week, fudge)?;
    let mut probability = 1.0;
    probability *= sketch.decreasing_random(peak_start - 2, 0.85, 0.9, 0.03, 0.05)?;
    for slot in peak_start..SLOT_COUNT {
        let band = (slot - peak_start).min(5);
        probability *=
            sketch.individual_random(1, SPIKE_RATE_MINS[band], SPIKE_RATE_MAXES[band])?;
    }
    Some(Scenario::from_sketch(Pattern::LargeSpike, sketch, probability))
}

/// Decreasing: a single decay across every sell slot; no hidden parameters.
pub fn decreasing(week: &PriceWeek, fudge: i32) -> impl Iterator<Item = Scenario> + '_ {
    std::iter::once(()).filter_map(move |()| {
        let mut sketch = WeekSketch::new(week, fudge)?;
        let probability = sketch.decreasing_random(SLOT_COUNT - 2, 0.85, 0.9, 0.03, 0.05)?;
        Some(Scenario::from_sketch(Pattern::Decreasing, sketch, probability))
    })
}

/// Small spike: a decay, two independent high slots, a nested-uniform peak,
/// then a trailing decay when slots remain. The hidden parameter is the slot
/// the spike starts on.
pub fn small_spike(week: &PriceWeek, fudge: i32) -> impl Iterator<Item = Scenario> + '_ {
    (2usize..10).filter_map(move |peak_start| {
        small_spike_with_peak(week, fudge, peak_start)
            .map(|scenario| scenario.weighted(1.0 / 8.0))
    })
}

fn small_spike_with_peak(week: &PriceWeek, fudge: i32, peak_start: usize) -> Option<Scenario> {
    let mut sketch = WeekSketch::new(week, fudge)?;
    let mut probability = 1.0;
    probability *= sketch.decreasing_random(peak_start - 2, 0.4, 0.9, 0.03, 0.05)?;
    probability *= sketch.individual_random(2, 0.9, 1.4)?;
    probability *= sketch.peak(1.4, 2.0)?;
    if peak_start + 5 < SLOT_COUNT {
        probability *=
            sketch.decreasing_random(SLOT_COUNT - (peak_start + 5), 0.4, 0.9, 0.03, 0.05)?;
    }
    Some(Scenario::from_sketch(Pattern::SmallSpike, sketch, probability))
}

/// All four regimes in pattern-index order, each branch weighted by the
/// matching entry of `priors`.
pub fn all_patterns(
    week: &PriceWeek,
    fudge: i32,
    priors: [f64; Pattern::COUNT],
) -> impl Iterator<Item = Scenario> + '_ {
    fluctuating(week, fudge)
        .map(move |scenario| scenario.weighted(priors[0]))
        .chain(large_spike(week, fudge).map(move |scenario| scenario.weighted(priors[1])))
        .chain(decreasing(week, fudge).map(move |scenario| scenario.weighted(priors[2])))
        .chain(small_spike(week, fudge).map(move |scenario| scenario.weighted(priors[3])))
}
