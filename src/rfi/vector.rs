// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A growable, ordered collection of [`Rfi`] records.

use log::{debug, trace};

use super::{Detection, GridShape, Rfi, RfiError};
use crate::{bits::AllocationError, constants::NUM_RFI_VECT};

/// The outcome of [`RfiVector::record_detection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// The detection matched the record at this index, which was updated.
    Updated(usize),

    /// No record matched, so a new one was made at this index.
    Created(usize),
}

impl Upsert {
    /// The index of the record that was updated or created.
    pub fn index(self) -> usize {
        match self {
            Upsert::Updated(i) | Upsert::Created(i) => i,
        }
    }
}

/// An ordered collection of [`Rfi`]s on a fixed grid.
///
/// Storage is divided into *slots*. The first [`RfiVector::len`] slots hold
/// live records in insertion order; their indices never change unless the
/// collection is sorted or shrunk. The remaining slots are empty records
/// waiting to be populated.
///
/// Growing the collection allocates the bit arrays of every new slot up front
/// (zero-filled), so an empty slot is always a complete [`Rfi`] with zeroed
/// statistics. Existing records are moved into the new storage, never copied
/// or re-initialised.
#[derive(Debug, Clone, PartialEq)]
pub struct RfiVector {
    grid: GridShape,
    slots: Vec<Rfi>,
    num_rfi: usize,
}

impl RfiVector {
    /// Create an empty collection with no slots.
    pub fn new(grid: GridShape) -> RfiVector {
        RfiVector {
            grid,
            slots: vec![],
            num_rfi: 0,
        }
    }

    /// Create an empty collection with `num_slots` pre-allocated slots.
    pub fn with_slots(grid: GridShape, num_slots: usize) -> Result<RfiVector, AllocationError> {
        let mut v = RfiVector::new(grid);
        v.resize(num_slots)?;
        Ok(v)
    }

    pub fn grid(&self) -> GridShape {
        self.grid
    }

    /// The number of live records.
    pub fn len(&self) -> usize {
        self.num_rfi
    }

    pub fn is_empty(&self) -> bool {
        self.num_rfi == 0
    }

    /// The number of slots (live and empty).
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Get a live record.
    pub fn get(&self, index: usize) -> Option<&Rfi> {
        self.as_slice().get(index)
    }

    /// Get a live record mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Rfi> {
        self.slots[..self.num_rfi].get_mut(index)
    }

    /// Get any slot, including empty ones.
    pub fn slot(&self, index: usize) -> Option<&Rfi> {
        self.slots.get(index)
    }

    /// The live records.
    pub fn as_slice(&self) -> &[Rfi] {
        &self.slots[..self.num_rfi]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rfi> {
        self.as_slice().iter()
    }

    /// Consume the collection, keeping only the live records.
    pub fn into_vec(mut self) -> Vec<Rfi> {
        self.slots.truncate(self.num_rfi);
        self.slots
    }

    /// Change the number of slots.
    ///
    /// When growing, existing slots are untouched and every new slot is an
    /// empty [`Rfi`] with zero-filled bit arrays sized for this collection's
    /// grid. When shrinking, slots beyond `new_num_slots` are dropped (their
    /// bit arrays are freed with them) and the live count is clamped.
    ///
    /// If memory can't be obtained, an error is returned and the collection is
    /// exactly as it was before the call.
    pub fn resize(&mut self, new_num_slots: usize) -> Result<(), AllocationError> {
        let old_num_slots = self.slots.len();
        if new_num_slots <= old_num_slots {
            self.slots.truncate(new_num_slots);
            self.num_rfi = self.num_rfi.min(new_num_slots);
            debug!("Shrunk RFI vector from {old_num_slots} to {new_num_slots} slots");
            return Ok(());
        }

        // Build everything that's needed before touching `self`.
        let num_new = new_num_slots - old_num_slots;
        let slot_alloc_err = AllocationError {
            what: "RFI slots",
            num_bytes: num_new.saturating_mul(std::mem::size_of::<Rfi>()),
        };
        let mut new_slots = Vec::new();
        new_slots
            .try_reserve_exact(num_new)
            .map_err(|_| slot_alloc_err.clone())?;
        for _ in 0..num_new {
            new_slots.push(Rfi::try_new(self.grid)?);
        }
        self.slots
            .try_reserve_exact(num_new)
            .map_err(|_| slot_alloc_err)?;
        // Can't fail now; the capacity is reserved.
        self.slots.append(&mut new_slots);

        debug!("Grew RFI vector from {old_num_slots} to {new_num_slots} slots");
        Ok(())
    }

    /// Find the first live record whose average frequency is within
    /// `fract_error` (fractionally) of `freq`. See [`find_rfi`].
    pub fn find(&self, freq: f64, fract_error: f64) -> Option<usize> {
        find_rfi(self.as_slice(), freq, fract_error)
    }

    /// Fold a detection into the collection. The detection is validated
    /// against the grid, then the first record within `fract_error` of its
    /// frequency is updated. If there isn't one, the next empty slot is
    /// populated, growing the collection if there are no empty slots left.
    pub fn record_detection(
        &mut self,
        detection: &Detection,
        fract_error: f64,
    ) -> Result<Upsert, RfiError> {
        detection.validate(self.grid)?;
        let Detection {
            freq,
            sigma,
            channel,
            interval,
        } = *detection;

        if let Some(i) = self.find(freq, fract_error) {
            trace!("{freq} Hz matches RFI {i}");
            self.slots[i].update(freq, sigma, channel, interval);
            return Ok(Upsert::Updated(i));
        }

        let i = self.next_slot()?;
        self.slots[i].update(freq, sigma, channel, interval);
        trace!("{freq} Hz is new RFI {i}");
        Ok(Upsert::Created(i))
    }

    /// Append a fully-formed record. Its bit arrays must be sized for this
    /// collection's grid, and it must have at least one observation with a
    /// channel and an interval set.
    pub fn push(&mut self, rfi: Rfi) -> Result<usize, RfiError> {
        let rfi_grid = rfi.grid();
        if rfi_grid != self.grid {
            return Err(RfiError::GridMismatch {
                num_chan: rfi_grid.num_chan,
                num_int: rfi_grid.num_int,
                expected_num_chan: self.grid.num_chan,
                expected_num_int: self.grid.num_int,
            });
        }
        if rfi.is_empty() || !rfi.chans().any() || !rfi.times().any() {
            return Err(RfiError::EmptyRecord {
                numobs: rfi.numobs,
                num_chans: rfi.chans().count_ones(),
                num_times: rfi.times().count_ones(),
            });
        }
        let i = self.next_slot()?;
        self.slots[i] = rfi;
        Ok(i)
    }

    /// Sort the live records by average frequency. The sort is stable.
    pub fn sort_by_freq(&mut self) {
        self.slots[..self.num_rfi].sort_by(Rfi::compare);
    }

    /// Claim the next empty slot, growing if necessary, and return its index.
    pub(super) fn next_slot(&mut self) -> Result<usize, AllocationError> {
        if self.num_rfi == self.slots.len() {
            let new_num_slots = (self.slots.len() * 2).max(NUM_RFI_VECT);
            self.resize(new_num_slots)?;
        }
        let i = self.num_rfi;
        debug_assert!(self.slots[i].is_empty());
        self.num_rfi += 1;
        Ok(i)
    }

    pub(super) fn slot_mut(&mut self, index: usize) -> &mut Rfi {
        &mut self.slots[index]
    }
}

impl std::ops::Index<usize> for RfiVector {
    type Output = Rfi;

    /// # Panics
    ///
    /// Panics if `index` isn't a live record.
    fn index(&self, index: usize) -> &Rfi {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a RfiVector {
    type Item = &'a Rfi;
    type IntoIter = std::slice::Iter<'a, Rfi>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Find the first record in `rfis` whose average frequency is within
/// `fract_error` of `freq`, i.e. `|freq_avg - freq| / freq <= fract_error`.
///
/// Records are checked in order and the *first* match wins, even if a later
/// record is closer.
/// A `freq` of zero (or a non-finite `freq`) never matches anything.
pub fn find_rfi(rfis: &[Rfi], freq: f64, fract_error: f64) -> Option<usize> {
    if freq == 0.0 || !freq.is_finite() {
        return None;
    }
    rfis.iter()
        .position(|rfi| ((f64::from(rfi.freq_avg) - freq) / freq).abs() <= fract_error)
}
