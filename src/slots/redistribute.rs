//! Window redistribution
//!
//! Merge one value into a window's occupants, then re-space
//! the whole run evenly so gaps are spread through the window
//! instead of piling up at its end.
//!
//! Example, window of 5 holding `[1, 5, _, _, _]`, inserting 2:
//!   merged run = [1, 2, 5], spacing = 1, remainder = 2
//!   result     = [1, _, 2, _, 5]

use super::{Slot, SlotArray};
use crate::LlaError;

/// Insert `x` into `[start, end]` and spread the window's occupants
///
/// Pure array transformation; tree counters are not consulted.
/// Returns the number of occupants now in the window.
///
/// A window that cannot hold its occupants plus `x` is refused
/// before anything is cleared.
pub fn insert_and_spread(
    slots: &mut SlotArray,
    start: usize,
    end: usize,
    x: i64,
) -> Result<usize, LlaError> {
    if start > end || end >= slots.capacity() {
        return Err(LlaError::Inconsistent(format!(
            "window [{start}, {end}] outside array of {} slots",
            slots.capacity()
        )));
    }

    let range_size = end - start + 1;
    let mut merged: Vec<i64> = Vec::new();
    merged
        .try_reserve_exact(range_size)
        .map_err(|_| LlaError::Allocation {
            what: "redistribution buffer",
            requested: range_size,
        })?;

    let mut x_inserted = false;
    for value in slots.occupants(start..=end) {
        if !x_inserted && x < value {
            merged.push(x);
            x_inserted = true;
        }
        merged.push(value);
    }
    if !x_inserted {
        merged.push(x);
    }

    let count = merged.len();
    if count > range_size {
        return Err(LlaError::Inconsistent(format!(
            "window [{start}, {end}] cannot hold {count} elements"
        )));
    }

    let window = slots.window_mut(start..=end);
    window.fill(None);
    spread(window, &merged);

    tracing::trace!(start, end, x, count, "window redistributed");
    Ok(count)
}

/// Lay `run` out over `window` with gaps distributed evenly
///
/// Caller guarantees `run.len() <= window.len()`.
fn spread(window: &mut [Slot], run: &[i64]) {
    let range_size = window.len();
    let count = run.len();
    if count == 0 {
        return;
    }

    let spacing = range_size / count;
    let remainder = range_size % count;
    let mut pos = 0;

    for (i, &value) in run.iter().enumerate() {
        window[pos] = Some(value);

        pos += if i < remainder { spacing + 1 } else { spacing };

        // Pack what is left against the tail so nothing lands outside.
        if pos >= range_size && i + 1 < count {
            pos = range_size - (count - 1 - i);
        }
    }
}
