// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Weekly generative regime for sell prices.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Pattern {
    /// Alternating high and decreasing phases.
    Fluctuating,
    /// One steep spike after an early decay.
    LargeSpike,
    /// A single week-long decay.
    Decreasing,
    /// A modest spike built around a nested-uniform peak.
    SmallSpike,
}

impl Pattern {
    /// Number of concrete regimes.
    pub const COUNT: usize = 4;

    /// All regimes in index order.
    pub const ALL: [Pattern; Pattern::COUNT] = [
        Pattern::Fluctuating,
        Pattern::LargeSpike,
        Pattern::Decreasing,
        Pattern::SmallSpike,
    ];

    /// Stable numeric index of this regime.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Regime for a numeric index; `None` for anything outside 0..=3.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Fluctuating => "Fluctuating",
            Self::LargeSpike => "Large spike",
            Self::Decreasing => "Decreasing",
            Self::SmallSpike => "Small spike",
        }
    }
}

/// Row-stochastic prior over this week's regime given last week's regime.
pub const TRANSITION_MATRIX: [[f64; Pattern::COUNT]; Pattern::COUNT] = [
    [0.20, 0.30, 0.15, 0.35],
    [0.50, 0.05, 0.20, 0.25],
    [0.25, 0.45, 0.05, 0.25],
    [0.45, 0.25, 0.15, 0.15],
];

/// Stationary regime distribution, used when last week's regime is unknown.
pub const STEADY_STATE: [f64; Pattern::COUNT] = [
    4530.0 / 13082.0,
    3236.0 / 13082.0,
    1931.0 / 13082.0,
    3385.0 / 13082.0,
];

/// Prior over this week's regime: the matrix row for a known previous
/// regime, the steady state otherwise.
pub fn transition_prior(previous: Option<Pattern>) -> [f64; Pattern::COUNT] {
    match previous {
        Some(pattern) => TRANSITION_MATRIX[pattern.index()],
        None => STEADY_STATE,
    }
}
