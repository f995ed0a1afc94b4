// SPDX-License-Identifier: MIT OR Apache-2.0

#![no_main]

use libfuzzer_sys::fuzz_target;
use stalk_core::series::{PriceWeek, SLOT_COUNT};
use stalk_forecast::analyze_possibilities;
use stalk_patterns::Pattern;

const SLOT_BYTES: usize = 2;
const HEADER_BYTES: usize = 2;

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER_BYTES + SLOT_COUNT * SLOT_BYTES {
        return;
    }

    let first_buy = data[0] & 1 == 1;
    let previous = Pattern::from_index(usize::from(data[1] % 8));

    // Two little-endian bytes per slot; zero encodes a missing observation.
    let mut slots = [None; SLOT_COUNT];
    for (index, slot) in slots.iter_mut().enumerate() {
        let offset = HEADER_BYTES + index * SLOT_BYTES;
        let raw = u16::from_le_bytes([data[offset], data[offset + 1]]);
        if raw != 0 {
            *slot = Some(i32::from(raw));
        }
    }

    // Mismatched buy slots are a validation error, not a panic.
    let Ok(week) = PriceWeek::new(slots) else {
        return;
    };

    let analysis = analyze_possibilities(&week, first_buy, previous);
    assert!(!analysis.results.is_empty());
});
