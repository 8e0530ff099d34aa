// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fold candidate detections into an RFI collection.


use std::{
    ffi::OsString,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::{
    common::{display_warnings, GridArgs, InfoPrinter, Warn, ARG_FILE_HELP, FRACT_ERROR_HELP},
    summarise::SummariseArgs,
    RfiTrackerError,
};
use crate::{
    constants::{NUM_RFI_VECT, RFI_FRACTERROR},
    parse_detections, write_rfi_file, GridShape, RfiError, RfiVector, Upsert,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct CollectArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Path to a text file of candidate detections. Each line has four
    /// columns: frequency [Hz], significance, channel index and interval
    /// index. Anything after a '#' is ignored.
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) detections: Option<PathBuf>,

    #[clap(short, long, help = FRACT_ERROR_HELP.as_str())]
    pub(super) fract_error: Option<f64>,

    /// The number of RFI slots to allocate before reading any detections. More
    /// are allocated as needed.
    #[clap(long)]
    pub(super) num_slots: Option<usize>,

    /// Sort the RFI by average frequency before writing them out. Otherwise
    /// they are written in the order they were first detected.
    #[clap(long)]
    #[serde(default)]
    pub(super) sort: bool,

    /// Path to the output RFI file. The grid shape and number of RFI are
    /// written alongside it to the same path with an extra ".toml" extension;
    /// that file can be given straight to "summarise".
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) grid: GridArgs,
}

impl CollectArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<CollectArgs, RfiTrackerError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let CollectArgs {
                args_file: _,
                detections,
                fract_error,
                num_slots,
                sort,
                output,
                grid,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(CollectArgs {
                args_file: None,
                detections: cli_args.detections.or(detections),
                fract_error: cli_args.fract_error.or(fract_error),
                num_slots: cli_args.num_slots.or(num_slots),
                sort: cli_args.sort || sort,
                output: cli_args.output.or(output),
                grid: cli_args.grid.merge(grid),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<CollectParams, RfiTrackerError> {
        debug!("{:#?}", self);

        let CollectArgs {
            args_file: _,
            detections,
            fract_error,
            num_slots,
            sort,
            output,
            grid,
        } = self;

        let detections = detections.ok_or(CollectArgsError::NoDetections)?;
        let output = output.ok_or(CollectArgsError::NoOutput)?;
        let fract_error = fract_error.unwrap_or(RFI_FRACTERROR);
        if !(fract_error.is_finite() && fract_error >= 0.0) {
            return Err(CollectArgsError::BadFractError(fract_error).into());
        }
        let grid = grid.parse()?;
        let num_slots = num_slots.unwrap_or(NUM_RFI_VECT);

        let mut printer = InfoPrinter::new("RFI collection".into());
        printer.push_line(format!("Reading detections from {}", detections.display()).into());
        printer.push_block(vec![
            format!(
                "Grid: {} channels x {} intervals",
                grid.num_chan, grid.num_int
            )
            .into(),
            format!("Fractional error: {fract_error}").into(),
            format!("Initial slots: {num_slots}").into(),
        ]);
        printer.push_line(format!("Writing RFI to {}", output.display()).into());
        printer.display();

        Ok(CollectParams {
            detections,
            grid,
            fract_error,
            num_slots,
            sort,
            output,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), RfiTrackerError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum CollectArgsError {
    #[error("No detections file was specified")]
    NoDetections,

    #[error("No output RFI file was specified")]
    NoOutput,

    #[error("The fractional error must be a non-negative number (got {0})")]
    BadFractError(f64),
}

struct CollectParams {
    detections: PathBuf,
    grid: GridShape,
    fract_error: f64,
    num_slots: usize,
    sort: bool,
    output: PathBuf,
}

impl CollectParams {
    fn run(self) -> Result<RfiVector, RfiTrackerError> {
        let detections = parse_detections(BufReader::new(File::open(&self.detections)?))?;
        info!("Read {} detections", detections.len());

        let mut rfis = RfiVector::with_slots(self.grid, self.num_slots)?;
        let mut num_updated = 0;
        let mut num_skipped = 0;
        for (i, detection) in detections.iter().enumerate() {
            match rfis.record_detection(detection, self.fract_error) {
                Ok(Upsert::Created(_)) => (),
                Ok(Upsert::Updated(_)) => num_updated += 1,
                // Skip detections that don't fit the grid.
                Err(
                    e @ (RfiError::ChannelOutOfRange { .. }
                    | RfiError::IntervalOutOfRange { .. }
                    | RfiError::NonFinite { .. }),
                ) => {
                    format!("Skipping detection {i}: {e}").warn();
                    num_skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
        display_warnings();
        info!(
            "{} detections made {} RFI ({num_updated} matched existing RFI, {num_skipped} skipped)",
            detections.len(),
            rfis.len(),
        );

        if self.sort {
            rfis.sort_by_freq();
        }
        write_rfi_file(&self.output, &rfis)?;
        info!("Wrote {}", self.output.display());

        // The RFI file doesn't describe itself; write what's needed to read it
        // back.
        let summary_file = {
            let mut s = OsString::from(self.output.as_os_str());
            s.push(".toml");
            PathBuf::from(s)
        };
        // summarise may be run from another directory.
        let input = std::fs::canonicalize(&self.output)?;
        let summary_args = SummariseArgs {
            args_file: None,
            input: Some(input),
            num_rfi: Some(rfis.len()),
            min_obs: None,
            sort: false,
            grid: GridArgs::from(self.grid),
        };
        let mut f = BufWriter::new(File::create(&summary_file)?);
        f.write_all(toml::to_string(&summary_args)?.as_bytes())?;
        f.flush()?;
        info!("Wrote {}", summary_file.display());

        Ok(rfis)
    }
}
