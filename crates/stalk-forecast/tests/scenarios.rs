// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use stalk_core::series::{PriceWeek, SLOT_COUNT};
use stalk_forecast::{Analysis, PatternTag, analyze_possibilities};
use stalk_patterns::{Pattern, STEADY_STATE};

const MISSING: f64 = f64::NAN;
const PROB_TOL: f64 = 1e-9;

fn week(values: [f64; SLOT_COUNT]) -> PriceWeek {
    PriceWeek::from_f64(&values).expect("fixture week must be valid")
}

fn open_sells(buy: f64) -> [f64; SLOT_COUNT] {
    let mut values = [MISSING; SLOT_COUNT];
    values[0] = buy;
    values[1] = buy;
    values
}

fn category_total(analysis: &Analysis, tag: PatternTag) -> f64 {
    analysis
        .results
        .iter()
        .filter(|result| result.pattern == tag)
        .map(|result| result.category_total_probability)
        .next()
        .unwrap_or(0.0)
}

fn patterns_present(analysis: &Analysis) -> Vec<PatternTag> {
    let mut present = vec![];
    for result in &analysis.results[1..] {
        if !present.contains(&result.pattern) {
            present.push(result.pattern);
        }
    }
    present
}

fn assert_well_formed(analysis: &Analysis) {
    let results = &analysis.results;
    assert!(!results.is_empty());
    assert_eq!(results[0].pattern, PatternTag::All);
    assert_eq!(results[0].probability, 0.0);
    assert_eq!(results[0].category_total_probability, 0.0);

    let scenarios = &results[1..];
    for result in scenarios {
        assert_ne!(result.pattern, PatternTag::All);
        for bounds in result.prices {
            assert!(bounds.min <= bounds.max);
        }
        assert_eq!(result.prices[0], result.prices[1]);
        assert!(result.week_guaranteed_minimum <= result.week_max);
    }
    if scenarios.is_empty() {
        return;
    }

    let total: f64 = scenarios.iter().map(|result| result.probability).sum();
    assert!((total - 1.0).abs() < PROB_TOL, "probabilities sum to {total}");

    // The aggregate row envelopes every scenario.
    for slot in 0..SLOT_COUNT {
        let min = scenarios.iter().map(|r| r.prices[slot].min).min();
        let max = scenarios.iter().map(|r| r.prices[slot].max).max();
        assert_eq!(Some(results[0].prices[slot].min), min);
        assert_eq!(Some(results[0].prices[slot].max), max);
    }

    // Ranking is non-increasing on (category total, probability).
    for pair in scenarios.windows(2) {
        let left = (
            pair[0].category_total_probability,
            pair[0].probability,
        );
        let right = (
            pair[1].category_total_probability,
            pair[1].probability,
        );
        assert!(left >= right, "ranking violated: {left:?} < {right:?}");
    }
}

#[test]
fn s1_first_buy_enumerates_buys_and_yields_small_spike_only() {
    let analysis = analyze_possibilities(&week([MISSING; SLOT_COUNT]), true, None);
    assert_well_formed(&analysis);
    assert_eq!(patterns_present(&analysis), vec![PatternTag::SmallSpike]);
    assert_eq!(analysis.diagnostics.buy_candidates, 21);
    assert_eq!(analysis.diagnostics.scenario_count, 21 * 8);
    assert!((category_total(&analysis, PatternTag::SmallSpike) - 1.0).abs() < PROB_TOL);
    // The aggregate row spans the whole candidate buy range.
    assert_eq!(analysis.results[0].prices[0].min, 90);
    assert_eq!(analysis.results[0].prices[0].max, 110);
}

#[test]
fn s2_known_previous_pattern_reproduces_the_transition_row() {
    let analysis = analyze_possibilities(
        &week(open_sells(100.0)),
        false,
        Some(Pattern::SmallSpike),
    );
    assert_well_formed(&analysis);
    assert_eq!(analysis.diagnostics.fudge_factor, 0);
    assert_eq!(patterns_present(&analysis).len(), 4);
    // Transition row for a small-spike week: (0.45, 0.25, 0.15, 0.15).
    assert!((category_total(&analysis, PatternTag::Fluctuating) - 0.45).abs() < PROB_TOL);
    assert!((category_total(&analysis, PatternTag::LargeSpike) - 0.25).abs() < PROB_TOL);
    assert!((category_total(&analysis, PatternTag::Decreasing) - 0.15).abs() < PROB_TOL);
    assert!((category_total(&analysis, PatternTag::SmallSpike) - 0.15).abs() < PROB_TOL);
}

#[test]
fn s3_first_buy_overrides_both_the_buy_price_and_the_previous_pattern() {
    let analysis = analyze_possibilities(
        &week(open_sells(97.0)),
        true,
        Some(Pattern::SmallSpike),
    );
    assert_well_formed(&analysis);
    assert_eq!(patterns_present(&analysis), vec![PatternTag::SmallSpike]);
    assert_eq!(analysis.diagnostics.buy_candidates, 21);
    // The observed 97 is ignored: candidates run over the full range.
    assert_eq!(analysis.results[0].prices[0].min, 90);
    assert_eq!(analysis.results[0].prices[0].max, 110);
}

#[test]
fn s4_a_high_early_sell_refutes_only_the_decreasing_pattern() {
    let mut values = open_sells(100.0);
    values[3] = 95.0;
    let analysis = analyze_possibilities(&week(values), false, None);
    assert_well_formed(&analysis);
    assert_eq!(analysis.diagnostics.fudge_factor, 0);
    let present = patterns_present(&analysis);
    assert!(present.contains(&PatternTag::Fluctuating));
    assert!(present.contains(&PatternTag::LargeSpike));
    assert!(present.contains(&PatternTag::SmallSpike));
    assert!(!present.contains(&PatternTag::Decreasing));
}

#[test]
fn s4_boundary_an_impossible_observation_refutes_everything() {
    let mut values = open_sells(100.0);
    values[2] = 200.0;
    let analysis = analyze_possibilities(&week(values), false, None);
    assert_eq!(analysis.results.len(), 1);
    assert_eq!(analysis.results[0].pattern, PatternTag::All);
    assert_eq!(analysis.diagnostics.fudge_factor, 5);
    assert_eq!(analysis.diagnostics.scenario_count, 0);
    assert!(analysis.results[0].week_guaranteed_minimum <= analysis.results[0].week_max);
    assert!(!analysis.diagnostics.notes.is_empty());
}

#[test]
fn s5_a_full_spike_run_pins_the_large_spike_pattern() {
    let values = [
        100.0, 100.0, 90.0, 140.0, 200.0, 600.0, 200.0, 140.0, MISSING, MISSING, MISSING,
        MISSING, MISSING, MISSING,
    ];
    let analysis = analyze_possibilities(&week(values), false, Some(Pattern::Fluctuating));
    assert_well_formed(&analysis);
    assert!(category_total(&analysis, PatternTag::LargeSpike) > 0.8);
    assert_eq!(patterns_present(&analysis), vec![PatternTag::LargeSpike]);
}

#[test]
fn s6_fudge_escalates_to_five_and_admits_only_the_decreasing_pattern() {
    // Tracks the decreasing midline except slot 4, which sits exactly five
    // above the conditioned envelope maximum of 83.
    let values = [
        100.0, 100.0, 88.0, 86.0, 88.0, 78.0, 74.0, 70.0, 66.0, 62.0, 58.0, 54.0, 50.0, 46.0,
    ];
    let analysis = analyze_possibilities(&week(values), false, None);
    assert_well_formed(&analysis);
    assert_eq!(analysis.diagnostics.fudge_factor, 5);
    assert_eq!(patterns_present(&analysis), vec![PatternTag::Decreasing]);
    assert!((category_total(&analysis, PatternTag::Decreasing) - 1.0).abs() < PROB_TOL);
}

#[test]
fn unknown_previous_pattern_uses_the_steady_state_prior() {
    let analysis = analyze_possibilities(&week(open_sells(100.0)), false, None);
    assert_well_formed(&analysis);
    let tags = [
        PatternTag::Fluctuating,
        PatternTag::LargeSpike,
        PatternTag::Decreasing,
        PatternTag::SmallSpike,
    ];
    for (tag, expected) in tags.iter().zip(STEADY_STATE) {
        let total = category_total(&analysis, *tag);
        assert!(
            (total - expected).abs() < PROB_TOL,
            "{tag:?}: {total} != {expected}"
        );
    }
    // The published four-digit prior, for the record.
    for (tag, rounded) in tags.iter().zip([0.3463, 0.2474, 0.1476, 0.2587]) {
        assert!((category_total(&analysis, *tag) - rounded).abs() < 1e-3);
    }
}

#[test]
fn a_missing_buy_price_triggers_candidate_enumeration() {
    let analysis = analyze_possibilities(&week([MISSING; SLOT_COUNT]), false, None);
    assert_well_formed(&analysis);
    assert_eq!(analysis.diagnostics.buy_candidates, 21);
    assert_eq!(analysis.diagnostics.scenario_count, 21 * (56 + 7 + 1 + 8));
    assert_eq!(analysis.results[0].prices[0].min, 90);
    assert_eq!(analysis.results[0].prices[0].max, 110);
    for (tag, expected) in [
        PatternTag::Fluctuating,
        PatternTag::LargeSpike,
        PatternTag::Decreasing,
        PatternTag::SmallSpike,
    ]
    .iter()
    .zip(STEADY_STATE)
    {
        assert!((category_total(&analysis, *tag) - expected).abs() < PROB_TOL);
    }
}

#[test]
fn observed_slots_collapse_to_the_observation_at_fudge_zero() {
    let mut values = open_sells(100.0);
    values[2] = 90.0;
    values[3] = 85.0;
    let analysis = analyze_possibilities(&week(values), false, None);
    assert_well_formed(&analysis);
    assert_eq!(analysis.diagnostics.fudge_factor, 0);
    for result in &analysis.results[1..] {
        assert_eq!(result.prices[2].min, 90);
        assert_eq!(result.prices[2].max, 90);
        assert_eq!(result.prices[3].min, 85);
        assert_eq!(result.prices[3].max, 85);
    }
}

#[test]
fn repeated_runs_are_bitwise_identical() {
    let values = [
        100.0, 100.0, 90.0, 140.0, 200.0, 600.0, 200.0, 140.0, MISSING, MISSING, MISSING,
        MISSING, MISSING, MISSING,
    ];
    let first = analyze_possibilities(&week(values), false, Some(Pattern::Fluctuating));
    let second = analyze_possibilities(&week(values), false, Some(Pattern::Fluctuating));
    assert_eq!(first.results, second.results);

    let first = analyze_possibilities(&week([MISSING; SLOT_COUNT]), true, None);
    let second = analyze_possibilities(&week([MISSING; SLOT_COUNT]), true, None);
    assert_eq!(first.results, second.results);
}

#[test]
fn category_totals_match_the_per_scenario_sums() {
    let analysis = analyze_possibilities(
        &week(open_sells(105.0)),
        false,
        Some(Pattern::LargeSpike),
    );
    let scenarios = &analysis.results[1..];
    let mut totals = [0.0f64; 4];
    for result in scenarios {
        totals[usize::from(result.pattern_number())] += result.probability;
    }
    for result in scenarios {
        let expected = totals[usize::from(result.pattern_number())];
        assert!((result.category_total_probability - expected).abs() < 1e-12);
    }
}
