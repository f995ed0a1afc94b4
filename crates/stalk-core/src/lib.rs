// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod error;
pub mod kahan;
pub mod pdf;
pub mod range;
pub mod series;

pub use error::ForecastError;
pub use kahan::{CompensatedSum, PrefixSums, neumaier_sum};
pub use pdf::RatePdf;
pub use series::{FIRST_SELL_SLOT, PriceBounds, PriceWeek, SLOT_COUNT};
