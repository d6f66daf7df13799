//! Slot array: fixed-capacity storage with gaps
//!
//! Occupied slots hold the data in global sorted order.
//! Empty slots are the gaps that make local insertion possible.

mod redistribute;

pub use redistribute::insert_and_spread;

use std::ops::RangeInclusive;

use crate::LlaError;

/// A single array position: empty, or holding one value
pub type Slot = Option<i64>;

/// Fixed-length backing array
///
/// Never grows after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotArray {
    slots: Vec<Slot>,
}

impl SlotArray {
    /// Allocate `capacity` empty slots
    pub fn new(capacity: usize) -> Result<Self, LlaError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| LlaError::Allocation {
                what: "slot array",
                requested: capacity,
            })?;
        slots.resize(capacity, None);
        Ok(Self { slots })
    }

    /// Total number of slots (occupied + gaps)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Value at physical index `index`, if occupied
    #[inline]
    pub fn get(&self, index: usize) -> Slot {
        self.slots.get(index).copied().flatten()
    }

    /// Read-only view of every slot
    pub fn as_slice(&self) -> &[Slot] {
        &self.slots
    }

    pub(crate) fn window_mut(&mut self, window: RangeInclusive<usize>) -> &mut [Slot] {
        &mut self.slots[window]
    }

    /// Occupied values inside `window`, left to right
    pub fn occupants(&self, window: RangeInclusive<usize>) -> impl Iterator<Item = i64> + '_ {
        self.slots[window].iter().filter_map(|slot| *slot)
    }

    /// Number of occupied slots inside `window`
    pub fn occupied(&self, window: RangeInclusive<usize>) -> usize {
        self.slots[window].iter().filter(|slot| slot.is_some()).count()
    }

    /// Smallest and largest occupant inside `window`
    ///
    /// The array is sorted, so these are the first and last occupied slots.
    pub fn bounds(&self, window: RangeInclusive<usize>) -> Option<(i64, i64)> {
        let slice = &self.slots[window];
        let low = slice.iter().find_map(|slot| *slot)?;
        let high = slice.iter().rev().find_map(|slot| *slot)?;
        Some((low, high))
    }

    /// All occupied values, left to right
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    /// Whether occupied slots read left to right are non-decreasing
    pub fn is_sorted(&self) -> bool {
        let mut previous: Option<i64> = None;
        for value in self.values() {
            if previous.map_or(false, |p| p > value) {
                return false;
            }
            previous = Some(value);
        }
        true
    }
}
