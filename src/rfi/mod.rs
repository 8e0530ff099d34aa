// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Periodic radio-frequency interference ("birdies") detected over a grid of
//! frequency channels and time intervals.
//!
//! An [`Rfi`] accumulates the statistics of one interference frequency, as
//! well as which channels and intervals it was seen in. An [`RfiVector`] is
//! the ordered collection of these records for a whole observation.

mod detection;
mod error;
mod io;
mod shared;
mod vector;

pub use detection::{parse_detections, Detection, GridShape};
pub use error::*;
pub use io::{read_rfi_file, write_rfi_file};
pub use shared::SharedRfiVector;
pub use vector::{find_rfi, RfiVector, Upsert};

use std::cmp::Ordering;

use crate::bits::{AllocationError, BitArray};

/// The accumulated detections of a single interference frequency.
///
/// A newly-created [`Rfi`] is "empty": all statistics are zero and no bits are
/// set. Each [`Rfi::update`] folds in one detection.
///
/// The statistics fields are public so that records can be inspected and
/// built from other sources. Writing them directly bypasses the invariants
/// that `update` maintains: `numobs >= 1` with a channel and an interval set
/// for a live record, and a non-negative `freq_var`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rfi {
    /// The average frequency of the detections \[Hz\].
    pub freq_avg: f32,

    /// The (population) variance of the detected frequencies \[Hz^2\]. Never
    /// negative.
    pub freq_var: f32,

    /// The average significance of the detections.
    pub sigma_avg: f32,

    /// The number of detections folded into this record.
    pub numobs: u32,

    /// One bit per time interval; set where this RFI was seen.
    times: BitArray,

    /// One bit per channel; set where this RFI was seen.
    chans: BitArray,
}

impl Rfi {
    /// Create an empty [`Rfi`] for the given grid.
    ///
    /// # Panics
    ///
    /// Panics if the memory for the bit arrays couldn't be allocated. Use
    /// [`Rfi::try_new`] to handle that case.
    pub fn new(grid: GridShape) -> Rfi {
        Rfi {
            freq_avg: 0.0,
            freq_var: 0.0,
            sigma_avg: 0.0,
            numobs: 0,
            times: BitArray::new(grid.num_int),
            chans: BitArray::new(grid.num_chan),
        }
    }

    /// Create an empty [`Rfi`] for the given grid. Either both bit arrays are
    /// allocated or an error is returned; a partially-built record is never
    /// handed out.
    pub fn try_new(grid: GridShape) -> Result<Rfi, AllocationError> {
        Ok(Rfi {
            freq_avg: 0.0,
            freq_var: 0.0,
            sigma_avg: 0.0,
            numobs: 0,
            times: BitArray::try_new(grid.num_int)?,
            chans: BitArray::try_new(grid.num_chan)?,
        })
    }

    /// Create an [`Rfi`] from its first detection. The detection is validated
    /// against the grid first.
    pub fn from_detection(grid: GridShape, detection: &Detection) -> Result<Rfi, RfiError> {
        detection.validate(grid)?;
        let mut rfi = Rfi::try_new(grid)?;
        rfi.update(
            detection.freq,
            detection.sigma,
            detection.channel,
            detection.interval,
        );
        Ok(rfi)
    }

    /// Fold a new detection into this record. The running mean and population
    /// variance of the frequency are updated with Welford's method, the mean
    /// significance is updated in the same way as the mean frequency, and the
    /// `channel` and `interval` bits are set.
    ///
    /// The arithmetic is done in `f64`, but the stored mean is rounded to `f32`
    /// after every call, so the variance is only as precise as that `f32`
    /// mean. Once `delta / numobs` is below half an `f32` ulp of the mean, the
    /// mean stops moving and the gap to the true mean shows up as extra
    /// variance on long streams of near-identical frequencies.
    ///
    /// The indices are *not* validated here; use [`Detection::validate`] (or
    /// [`RfiVector::record_detection`], which does that) before calling this.
    /// An index beyond the bit array's storage panics, and an index in the
    /// padding bits of the last byte silently sets a bit outside the grid.
    pub fn update(&mut self, freq: f64, sigma: f64, channel: usize, interval: usize) {
        let n_old = f64::from(self.numobs);
        let n_new = n_old + 1.0;

        let mean_old = f64::from(self.freq_avg);
        let delta = freq - mean_old;
        let mean_new = mean_old + delta / n_new;
        let var_new = (n_old * f64::from(self.freq_var) + delta * (freq - mean_new)) / n_new;

        let sigma_old = f64::from(self.sigma_avg);
        let sigma_new = sigma_old + (sigma - sigma_old) / n_new;

        self.freq_avg = mean_new as f32;
        // Round-off can push the variance below zero for near-identical
        // frequencies.
        self.freq_var = var_new.max(0.0) as f32;
        self.sigma_avg = sigma_new as f32;
        self.numobs += 1;

        self.chans.set(channel);
        self.times.set(interval);
    }

    /// Order [`Rfi`]s by their average frequency (ascending). This is a total
    /// order, even when NaNs are present.
    pub fn compare(&self, other: &Rfi) -> Ordering {
        self.freq_avg.total_cmp(&other.freq_avg)
    }

    /// Has nothing been folded into this record yet?
    pub fn is_empty(&self) -> bool {
        self.numobs == 0
    }

    /// The standard deviation of the detected frequencies \[Hz\].
    pub fn freq_std(&self) -> f32 {
        self.freq_var.sqrt()
    }

    /// The channels this RFI has been seen in.
    pub fn chans(&self) -> &BitArray {
        &self.chans
    }

    /// The time intervals this RFI has been seen in.
    pub fn times(&self) -> &BitArray {
        &self.times
    }

    /// The grid that this record's bit arrays are sized for.
    pub fn grid(&self) -> GridShape {
        GridShape {
            num_chan: self.chans.num_bits(),
            num_int: self.times.num_bits(),
        }
    }

    /// The number of bytes one [`Rfi`] occupies when written with the given
    /// grid.
    pub fn num_bytes(grid: GridShape) -> usize {
        // freq_avg, freq_var, sigma_avg, numobs
        4 * 4
            + crate::bits::num_bytes_for(grid.num_chan)
            + crate::bits::num_bytes_for(grid.num_int)
    }
}
