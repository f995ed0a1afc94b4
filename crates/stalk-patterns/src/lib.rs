// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod pattern;
pub mod patterns;
mod phase;
pub mod rates;

pub use pattern::{Pattern, STEADY_STATE, TRANSITION_MATRIX, transition_prior};
pub use patterns::{Scenario, all_patterns, decreasing, fluctuating, large_spike, small_spike};
pub use rates::{RATE_MULTIPLIER, int_ceil, price_from_rate, rate_interval_for_price};
