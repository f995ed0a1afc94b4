// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::error::ForecastError;

/// Number of half-day slots in one week: two buy slots, then twelve sells.
pub const SLOT_COUNT: usize = 14;

/// Index of the first sell slot.
pub const FIRST_SELL_SLOT: usize = 2;

/// Inclusive per-slot price envelope.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: i32,
    pub max: i32,
}

impl PriceBounds {
    /// An envelope pinned to a single price.
    pub fn exact(price: i32) -> Self {
        Self {
            min: price,
            max: price,
        }
    }

    /// True when the slot is pinned to a single price.
    pub fn is_exact(self) -> bool {
        self.min == self.max
    }
}

/// One week of half-day commodity price observations.
///
/// Slots 0 and 1 both carry the week's buy price; slots 2..13 carry sell
/// prices. A missing observation is `None`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceWeek {
    slots: [Option<i32>; SLOT_COUNT],
}

impl PriceWeek {
    /// Validates and wraps an observation vector.
    pub fn new(slots: [Option<i32>; SLOT_COUNT]) -> Result<Self, ForecastError> {
        for (index, slot) in slots.iter().enumerate() {
            if let Some(price) = slot {
                if *price < 1 {
                    return Err(ForecastError::invalid_input(format!(
                        "price at slot {index} must be >= 1; got {price}"
                    )));
                }
            }
        }
        if let (Some(first), Some(second)) = (slots[0], slots[1]) {
            if first != second {
                return Err(ForecastError::invalid_input(format!(
                    "slots 0 and 1 must both carry the buy price; got {first} and {second}"
                )));
            }
        }
        Ok(Self { slots })
    }

    /// Builds a week from the NaN-sentinel encoding used by external feeds.
    ///
    /// NaN marks a missing observation; every present value must be a whole
    /// positive number.
    pub fn from_f64(values: &[f64]) -> Result<Self, ForecastError> {
        if values.len() != SLOT_COUNT {
            return Err(ForecastError::invalid_input(format!(
                "price vector must have {SLOT_COUNT} slots; got {}",
                values.len()
            )));
        }
        let mut slots = [None; SLOT_COUNT];
        for (index, &value) in values.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            if !value.is_finite() {
                return Err(ForecastError::invalid_input(format!(
                    "price at slot {index} must be finite or NaN; got {value}"
                )));
            }
            if value.fract() != 0.0
                || value < f64::from(i32::MIN)
                || value > f64::from(i32::MAX)
            {
                return Err(ForecastError::invalid_input(format!(
                    "price at slot {index} must be a whole number; got {value}"
                )));
            }
            slots[index] = Some(value as i32);
        }
        Self::new(slots)
    }

    /// The week's buy price, when observed.
    pub fn buy_price(&self) -> Option<i32> {
        self.slots[0]
    }

    /// The observation at `slot`.
    pub fn get(&self, slot: usize) -> Option<i32> {
        self.slots[slot]
    }

    /// All 14 slots in order.
    pub fn slots(&self) -> &[Option<i32>; SLOT_COUNT] {
        &self.slots
    }

    /// A copy with slots 0 and 1 replaced by `buy`.
    pub fn with_buy(&self, buy: i32) -> Self {
        let mut slots = self.slots;
        slots[0] = Some(buy);
        slots[1] = Some(buy);
        Self { slots }
    }
}
