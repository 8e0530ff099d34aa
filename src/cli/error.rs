// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all rfi-tracker-related errors. This should be the *only*
//! error enum that is publicly visible from the command-line interface.

use thiserror::Error;

use super::{collect::CollectArgsError, common::GridArgsError, summarise::SummariseArgsError};
use crate::{
    bits::AllocationError, DetectionParseError, RfiError, RfiReadError, RfiWriteError,
};

/// The *only* publicly visible error from rfi-tracker. Errors that belong to a
/// subcommand point at that subcommand's help.
#[derive(Error, Debug)]
pub enum RfiTrackerError {
    /// An error related to collect.
    #[error("{0}\n\nSee for more info: rfi-tracker collect --help")]
    Collect(String),

    /// An error related to summarise.
    #[error("{0}\n\nSee for more info: rfi-tracker summarise --help")]
    Summarise(String),

    /// Error reading an RFI file.
    #[error("{0}\n\nThe number of RFI and the grid shape must match those used when the file was written")]
    RfiRead(String),

    /// Error writing an RFI file.
    #[error("{0}")]
    RfiWrite(String),

    /// Error reading a detections file.
    #[error("{0}\n\nEach detection line needs: frequency [Hz], significance, channel index, interval index")]
    Detections(String),

    /// Error with the channel/interval grid.
    #[error("{0}")]
    Grid(String),

    /// Error with an argument file.
    #[error("{0}")]
    ArgFile(String),

    /// A generic error that can't be clarified further with documentation,
    /// e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<CollectArgsError> for RfiTrackerError {
    fn from(e: CollectArgsError) -> Self {
        let s = e.to_string();
        match e {
            CollectArgsError::NoDetections
            | CollectArgsError::NoOutput
            | CollectArgsError::BadFractError(_) => Self::Collect(s),
        }
    }
}

impl From<SummariseArgsError> for RfiTrackerError {
    fn from(e: SummariseArgsError) -> Self {
        let s = e.to_string();
        match e {
            SummariseArgsError::NoInput | SummariseArgsError::NoNumRfi => Self::Summarise(s),
        }
    }
}

impl From<GridArgsError> for RfiTrackerError {
    fn from(e: GridArgsError) -> Self {
        Self::Grid(e.to_string())
    }
}

impl From<RfiError> for RfiTrackerError {
    fn from(e: RfiError) -> Self {
        let s = e.to_string();
        match e {
            RfiError::Allocation(e) => Self::from(e),
            RfiError::ChannelOutOfRange { .. }
            | RfiError::IntervalOutOfRange { .. }
            | RfiError::GridMismatch { .. } => Self::Grid(s),
            RfiError::EmptyRecord { .. } => Self::Generic(s),
            RfiError::NonFinite { .. } => Self::Detections(s),
            RfiError::Poisoned => Self::Generic(s),
        }
    }
}

impl From<RfiReadError> for RfiTrackerError {
    fn from(e: RfiReadError) -> Self {
        let s = e.to_string();
        match e {
            RfiReadError::Truncated { .. } | RfiReadError::NegativeNumObs { .. } => {
                Self::RfiRead(s)
            }
            RfiReadError::Alloc(e) => Self::from(e),
            RfiReadError::IO(e) => Self::from(e),
        }
    }
}

impl From<RfiWriteError> for RfiTrackerError {
    fn from(e: RfiWriteError) -> Self {
        let s = e.to_string();
        match e {
            RfiWriteError::NumObsOverflow { .. } => Self::RfiWrite(s),
            RfiWriteError::IO(e) => Self::from(e),
        }
    }
}

impl From<DetectionParseError> for RfiTrackerError {
    fn from(e: DetectionParseError) -> Self {
        let s = e.to_string();
        match e {
            DetectionParseError::WrongNumColumns { .. } | DetectionParseError::BadValue { .. } => {
                Self::Detections(s)
            }
            DetectionParseError::IO(e) => Self::from(e),
        }
    }
}

impl From<AllocationError> for RfiTrackerError {
    fn from(e: AllocationError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<std::io::Error> for RfiTrackerError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<toml::ser::Error> for RfiTrackerError {
    fn from(e: toml::ser::Error) -> Self {
        Self::ArgFile(e.to_string())
    }
}
