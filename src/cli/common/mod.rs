// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. Both `collect` and
//! `summarise` need to know the shape of the channel/interval grid, so those
//! arguments are shared between them.

mod printers;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use clap::Args;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{constants::RFI_FRACTERROR, GridShape};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref FRACT_ERROR_HELP: String =
        format!("The maximum fractional difference between a detection's frequency and an RFI's average frequency for them to be considered the same interference. Default: {RFI_FRACTERROR}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(RfiTrackerError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(RfiTrackerError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(RfiTrackerError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// The shape of the channel/interval grid. This isn't stored in RFI files, so
/// it must be supplied whenever RFI is written or read.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct GridArgs {
    /// The number of frequency channels in the grid.
    #[clap(short = 'c', long, help_heading = "GRID")]
    pub(super) num_chan: Option<usize>,

    /// The number of time intervals in the grid.
    #[clap(short = 't', long, help_heading = "GRID")]
    pub(super) num_int: Option<usize>,
}

impl GridArgs {
    /// Prefer `self` (the CLI args) over `other` (the file args).
    pub(super) fn merge(self, other: Self) -> Self {
        GridArgs {
            num_chan: self.num_chan.or(other.num_chan),
            num_int: self.num_int.or(other.num_int),
        }
    }

    pub(super) fn parse(self) -> Result<GridShape, GridArgsError> {
        let num_chan = self.num_chan.ok_or(GridArgsError::NoNumChan)?;
        let num_int = self.num_int.ok_or(GridArgsError::NoNumInt)?;
        if num_chan == 0 || num_int == 0 {
            return Err(GridArgsError::Empty { num_chan, num_int });
        }
        Ok(GridShape { num_chan, num_int })
    }
}

impl From<GridShape> for GridArgs {
    fn from(grid: GridShape) -> Self {
        GridArgs {
            num_chan: Some(grid.num_chan),
            num_int: Some(grid.num_int),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum GridArgsError {
    #[error("The number of channels in the grid wasn't specified (--num-chan)")]
    NoNumChan,

    #[error("The number of intervals in the grid wasn't specified (--num-int)")]
    NoNumInt,

    #[error("The grid must have at least one channel and one interval (got {num_chan} channels and {num_int} intervals)")]
    Empty { num_chan: usize, num_int: usize },
}

/// Collapse sorted indices into a compact, human-readable list, e.g.
/// `0-3, 7, 9-10`.
pub(super) fn format_ranges<I: IntoIterator<Item = usize>>(indices: I) -> String {
    let mut ranges: Vec<(usize, usize)> = vec![];
    for i in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end + 1 == i => *end = i,
            _ => ranges.push((i, i)),
        }
    }
    if ranges.is_empty() {
        return "none".to_string();
    }
    ranges
        .into_iter()
        .map(|(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .join(", ")
}
