// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with tracking, reading or writing RFI.

use thiserror::Error;

use crate::bits::AllocationError;

#[derive(Error, Debug)]
pub enum RfiError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Detection channel {channel} is outside the grid (num. channels: {num_chan})")]
    ChannelOutOfRange { channel: usize, num_chan: usize },

    #[error("Detection interval {interval} is outside the grid (num. intervals: {num_int})")]
    IntervalOutOfRange { interval: usize, num_int: usize },

    #[error("Detection has a non-finite {what} ({value})")]
    NonFinite { what: &'static str, value: f64 },

    /// The record's bit arrays don't match the collection's grid.
    #[error("RFI record has {num_chan} channels and {num_int} intervals, but the collection expects {expected_num_chan} and {expected_num_int}")]
    GridMismatch {
        num_chan: usize,
        num_int: usize,
        expected_num_chan: usize,
        expected_num_int: usize,
    },

    /// Live records must have been seen at least once.
    #[error("RFI record has no observations (numobs: {numobs}, channels set: {num_chans}, intervals set: {num_times})")]
    EmptyRecord {
        numobs: u32,
        num_chans: usize,
        num_times: usize,
    },

    #[error("Another thread panicked while holding the RFI collection lock")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum RfiReadError {
    /// The stream ended part way through the expected records.
    #[error("RFI data ended early while reading record {record} (expected {num_records} records)")]
    Truncated { record: usize, num_records: usize },

    #[error("RFI record {record} has a negative number of observations ({numobs})")]
    NegativeNumObs { record: usize, numobs: i32 },

    #[error(transparent)]
    Alloc(#[from] AllocationError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RfiWriteError {
    #[error("RFI record {record} has too many observations ({numobs}) to be written as a 32-bit signed integer")]
    NumObsOverflow { record: usize, numobs: u32 },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DetectionParseError {
    #[error("Line {line_num}: expected 4 columns (freq sigma channel interval), but found {num_cols}")]
    WrongNumColumns { line_num: usize, num_cols: usize },

    #[error("Line {line_num}: couldn't parse '{value}' as a {what}")]
    BadValue {
        line_num: usize,
        value: String,
        what: &'static str,
    },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
