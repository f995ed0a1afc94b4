// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod analyzer;
pub mod diagnostics;
pub mod result;

pub use analyzer::{
    Analyzer, AnalyzerConfig, BUY_PRICE_RANGE, MAX_FUDGE_FACTOR, analyze_possibilities,
};
pub use diagnostics::{DIAGNOSTICS_SCHEMA_VERSION, Diagnostics};
pub use result::{Analysis, PatternTag, PredictionResult};
