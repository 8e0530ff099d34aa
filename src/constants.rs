// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Useful constants.
//!
//! The harmonic-summing values describe the search that produces the
//! detections fed into the tracker.

/// The number of harmonics summed when searching each channel/interval power
/// spectrum for periodic interference.
pub const RFI_NUMHARMSUM: usize = 4;

/// The number of interpolated Fourier bins per real bin used by the search.
pub const RFI_NUMBETWEEN: usize = 2;

/// The lowest Fourier bin searched for interference.
pub const RFI_LOBIN: usize = 5;

/// The default fractional error for two frequencies to be considered the same
/// interference source.
pub const RFI_FRACTERROR: f64 = 0.002;

/// The default number of slots allocated for a new [`crate::RfiVector`], and
/// the minimum amount it grows by.
pub const NUM_RFI_VECT: usize = 30;
