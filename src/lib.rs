// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Track periodic radio-frequency interference (RFI) detected over a grid of
frequency channels and time intervals.
 */

pub mod bits;
mod cli;
pub mod constants;
mod rfi;

// Re-exports.
pub use bits::{AllocationError, BitArray, BitMask};
pub use cli::{RfiTracker, RfiTrackerError};
pub use constants::*;
pub use rfi::*;
