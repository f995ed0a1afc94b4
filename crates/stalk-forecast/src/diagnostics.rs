// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Diagnostics schema version for analysis metadata.
pub const DIAGNOSTICS_SCHEMA_VERSION: u32 = 1;

/// Structured metadata captured from one analysis run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostics {
    pub schema_version: u32,
    /// Tolerance the surviving scenarios were admitted at.
    pub fudge_factor: u8,
    /// Scenarios surviving before ranking (the aggregate row excluded).
    pub scenario_count: usize,
    /// Buy prices tried: 1 when the buy price was observed, the full search
    /// range otherwise.
    pub buy_candidates: usize,
    pub runtime_ms: Option<u64>,
    pub notes: Vec<String>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            schema_version: DIAGNOSTICS_SCHEMA_VERSION,
            fudge_factor: 0,
            scenario_count: 0,
            buy_candidates: 0,
            runtime_ms: None,
            notes: vec![],
        }
    }
}
