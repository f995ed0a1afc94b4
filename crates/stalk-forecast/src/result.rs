// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use stalk_core::series::{PriceBounds, SLOT_COUNT};
use stalk_patterns::Pattern;

use crate::diagnostics::Diagnostics;

/// Tag carried by an output row: one concrete regime, or the synthetic
/// across-regimes aggregate prepended to the ranking.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum PatternTag {
    Fluctuating,
    LargeSpike,
    Decreasing,
    SmallSpike,
    All,
}

impl PatternTag {
    /// Stable numeric tag: 0..=3 for concrete regimes, 4 for the aggregate.
    pub fn number(self) -> u8 {
        match self {
            Self::Fluctuating => 0,
            Self::LargeSpike => 1,
            Self::Decreasing => 2,
            Self::SmallSpike => 3,
            Self::All => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fluctuating => "Fluctuating",
            Self::LargeSpike => "Large spike",
            Self::Decreasing => "Decreasing",
            Self::SmallSpike => "Small spike",
            Self::All => "All patterns",
        }
    }
}

impl From<Pattern> for PatternTag {
    fn from(pattern: Pattern) -> Self {
        match pattern {
            Pattern::Fluctuating => Self::Fluctuating,
            Pattern::LargeSpike => Self::LargeSpike,
            Pattern::Decreasing => Self::Decreasing,
            Pattern::SmallSpike => Self::SmallSpike,
        }
    }
}

/// One ranked hypothesis, or the aggregate row.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionResult {
    pub pattern: PatternTag,
    /// Per-slot envelope; observed slots collapse to the observation.
    pub prices: [PriceBounds; SLOT_COUNT],
    /// Posterior mass; zero on the aggregate row.
    pub probability: f64,
    /// Best sell price this scenario guarantees after the last observation.
    pub week_guaranteed_minimum: i32,
    /// Best sell price this scenario allows after the last observation.
    pub week_max: i32,
    /// Posterior mass of every scenario sharing this row's regime.
    pub category_total_probability: f64,
}

impl PredictionResult {
    pub fn pattern_number(&self) -> u8 {
        self.pattern.number()
    }

    pub fn pattern_name(&self) -> &'static str {
        self.pattern.name()
    }
}

/// Complete outcome of one inference call: the ranked rows (aggregate row
/// first) plus run diagnostics.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    pub results: Vec<PredictionResult>,
    pub diagnostics: Diagnostics,
}
