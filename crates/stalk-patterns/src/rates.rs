// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use stalk_core::range::Interval;

/// Scale factor applied to rate multipliers so integer bins carry meaningful
/// resolution on the rate axis.
pub const RATE_MULTIPLIER: f64 = 10000.0;

/// Ceiling as the game's 32-bit float arithmetic computes it:
/// `trunc(x + 0.99999)`, deliberately not `ceil`.
pub fn int_ceil(value: f64) -> i32 {
    (value + 0.99999).trunc() as i32
}

/// Sell price produced by a scaled rate against the buy price.
pub fn price_from_rate(rate: f64, buy_price: i32) -> i32 {
    int_ceil(rate * f64::from(buy_price) / RATE_MULTIPLIER)
}

/// Scaled-rate interval that could have produced `price`.
///
/// The offsets undo the ceiling applied on emission: any rate in the
/// returned interval rounds up to `price`.
pub fn rate_interval_for_price(price: i32, buy_price: i32) -> Interval {
    let buy = f64::from(buy_price);
    [
        RATE_MULTIPLIER * (f64::from(price) - 0.99999) / buy,
        RATE_MULTIPLIER * (f64::from(price) + 0.00001) / buy,
    ]
}
