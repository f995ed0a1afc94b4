// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::time::Instant;

use stalk_core::ForecastError;
use stalk_core::neumaier_sum;
use stalk_core::series::{FIRST_SELL_SLOT, PriceBounds, PriceWeek, SLOT_COUNT};
use stalk_patterns::{Pattern, Scenario, all_patterns, small_spike, transition_prior};

use crate::diagnostics::Diagnostics;
use crate::result::{Analysis, PatternTag, PredictionResult};

/// Inclusive buy-price search range used when the buy price is unobserved.
pub const BUY_PRICE_RANGE: (i32, i32) = (90, 110);

/// Largest tolerated deviation between an observation and its envelope.
pub const MAX_FUDGE_FACTOR: u8 = 5;

/// Configuration for [`Analyzer`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Ceiling of the escalating observation tolerance.
    pub max_fudge: u8,
    /// Inclusive candidate range for an unobserved buy price.
    pub buy_price_range: (i32, i32),
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_fudge: MAX_FUDGE_FACTOR,
            buy_price_range: BUY_PRICE_RANGE,
        }
    }
}

impl AnalyzerConfig {
    fn validate(&self) -> Result<(), ForecastError> {
        let (lo, hi) = self.buy_price_range;
        if lo < 1 || hi < lo {
            return Err(ForecastError::invalid_input(format!(
                "buy price range must satisfy 1 <= lo <= hi; got ({lo}, {hi})"
            )));
        }
        Ok(())
    }

    fn buy_candidates(&self) -> usize {
        let (lo, hi) = self.buy_price_range;
        (hi - lo + 1) as usize
    }
}

/// Price-path inference driver.
///
/// A pure function of its inputs: enumerates every internally consistent
/// scenario across the four regimes, weighs each by its hidden-parameter
/// prior and the regime transition prior, normalizes, ranks, and prepends
/// the cross-regime aggregate row.
#[derive(Clone, Debug)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, ForecastError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Runs one inference.
    ///
    /// `first_buy` restricts generation to the small-spike regime over every
    /// candidate buy price and ignores `previous`. Otherwise `previous`
    /// selects the transition-matrix row; `None` uses the steady state.
    pub fn analyze(
        &self,
        week: &PriceWeek,
        first_buy: bool,
        previous: Option<Pattern>,
    ) -> Analysis {
        let started_at = Instant::now();
        let mut diagnostics = Diagnostics::default();

        let mut scenarios = Vec::new();
        for fudge in 0..=self.config.max_fudge {
            diagnostics.fudge_factor = fudge;
            scenarios = self.generate_possibilities(week, first_buy, previous, i32::from(fudge));
            if !scenarios.is_empty() {
                break;
            }
        }

        diagnostics.scenario_count = scenarios.len();
        diagnostics.buy_candidates = if first_buy || week.buy_price().is_none() {
            self.config.buy_candidates()
        } else {
            1
        };
        if scenarios.is_empty() {
            diagnostics
                .notes
                .push("every pattern refuted; returning the aggregate row only".to_string());
        } else if diagnostics.fudge_factor > 0 {
            diagnostics.notes.push(format!(
                "observations admitted at fudge factor {}",
                diagnostics.fudge_factor
            ));
        }

        let mut results = rank(scenarios);
        results.insert(0, aggregate_row(&results));

        diagnostics.runtime_ms =
            Some(u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX));
        Analysis {
            results,
            diagnostics,
        }
    }

    fn generate_possibilities(
        &self,
        week: &PriceWeek,
        first_buy: bool,
        previous: Option<Pattern>,
        fudge: i32,
    ) -> Vec<Scenario> {
        if first_buy || week.buy_price().is_none() {
            // Candidate buy prices carry equal prior, so no extra weight.
            let (lo, hi) = self.config.buy_price_range;
            let mut scenarios = Vec::new();
            for buy in lo..=hi {
                let candidate = week.with_buy(buy);
                if first_buy {
                    scenarios.extend(small_spike(&candidate, fudge));
                } else {
                    scenarios.extend(all_patterns(
                        &candidate,
                        fudge,
                        transition_prior(previous),
                    ));
                }
            }
            scenarios
        } else {
            all_patterns(week, fudge, transition_prior(previous)).collect()
        }
    }
}

/// Runs one inference with the default configuration.
pub fn analyze_possibilities(
    week: &PriceWeek,
    first_buy: bool,
    previous: Option<Pattern>,
) -> Analysis {
    let analyzer = Analyzer {
        config: AnalyzerConfig::default(),
    };
    analyzer.analyze(week, first_buy, previous)
}

/// Normalizes, stamps per-regime totals and week statistics, and sorts
/// descending by `(category_total_probability, probability)`.
fn rank(scenarios: Vec<Scenario>) -> Vec<PredictionResult> {
    let total = neumaier_sum(scenarios.iter().map(|s| s.probability));
    let mut results: Vec<PredictionResult> = scenarios
        .into_iter()
        .map(|scenario| {
            let (week_guaranteed_minimum, week_max) = week_extremes(&scenario.bounds);
            PredictionResult {
                pattern: PatternTag::from(scenario.pattern),
                prices: scenario.bounds,
                probability: scenario.probability / total,
                week_guaranteed_minimum,
                week_max,
                category_total_probability: 0.0,
            }
        })
        .collect();

    let mut category_totals = [0.0f64; Pattern::COUNT];
    for result in &results {
        category_totals[usize::from(result.pattern.number())] += result.probability;
    }
    for result in &mut results {
        result.category_total_probability = category_totals[usize::from(result.pattern.number())];
    }

    results.sort_by(|a, b| {
        b.category_total_probability
            .total_cmp(&a.category_total_probability)
            .then_with(|| b.probability.total_cmp(&a.probability))
    });
    results
}

/// Week statistics over the sell slots.
///
/// Collects `(min, max)` pairs from open (range) slots walking forward; a
/// pinned slot after any open ones marks the collected prefix stale and
/// restarts the collection. When nothing remains the final slot stands in.
/// The guaranteed minimum is the best collected minimum, the week maximum
/// the best collected maximum.
fn week_extremes(bounds: &[PriceBounds; SLOT_COUNT]) -> (i32, i32) {
    let mut mins = Vec::new();
    let mut maxes = Vec::new();
    for slot in &bounds[FIRST_SELL_SLOT..] {
        if slot.is_exact() {
            mins.clear();
            maxes.clear();
        } else {
            mins.push(slot.min);
            maxes.push(slot.max);
        }
    }
    if mins.is_empty() {
        let last = bounds[SLOT_COUNT - 1];
        mins.push(last.min);
        maxes.push(last.max);
    }
    let week_guaranteed_minimum = mins.iter().copied().max().unwrap_or(0);
    let week_max = maxes.iter().copied().max().unwrap_or(0);
    (week_guaranteed_minimum, week_max)
}

/// The synthetic across-regimes row prepended to the ranking.
fn aggregate_row(results: &[PredictionResult]) -> PredictionResult {
    if results.is_empty() {
        return PredictionResult {
            pattern: PatternTag::All,
            prices: [PriceBounds::exact(0); SLOT_COUNT],
            probability: 0.0,
            week_guaranteed_minimum: 0,
            week_max: 0,
            category_total_probability: 0.0,
        };
    }

    let mut prices = [PriceBounds { min: 999, max: 0 }; SLOT_COUNT];
    for result in results {
        for (slot, bounds) in result.prices.iter().enumerate() {
            prices[slot].min = prices[slot].min.min(bounds.min);
            prices[slot].max = prices[slot].max.max(bounds.max);
        }
    }
    let week_guaranteed_minimum = results
        .iter()
        .map(|result| result.week_guaranteed_minimum)
        .min()
        .unwrap_or(0);
    let week_max = results
        .iter()
        .map(|result| result.week_max)
        .max()
        .unwrap_or(0);
    PredictionResult {
        pattern: PatternTag::All,
        prices,
        probability: 0.0,
        week_guaranteed_minimum,
        week_max,
        category_total_probability: 0.0,
    }
}
