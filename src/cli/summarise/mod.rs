// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Print what's in an RFI file.


use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::{
    common::{format_ranges, GridArgs, InfoPrinter, ARG_FILE_HELP},
    RfiTrackerError,
};
use crate::{read_rfi_file, GridShape, Rfi, RfiVector};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SummariseArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Path to the RFI file to summarise.
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) input: Option<PathBuf>,

    /// The number of RFI records in the file.
    #[clap(short, long)]
    pub(super) num_rfi: Option<usize>,

    /// Only print RFI seen at least this many times.
    #[clap(long)]
    pub(super) min_obs: Option<u32>,

    /// Print the RFI in order of average frequency, rather than the order
    /// they appear in the file.
    #[clap(long)]
    #[serde(default)]
    pub(super) sort: bool,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) grid: GridArgs,
}

impl SummariseArgs {
    /// Prefer CLI parameters over those in the argument file.
    pub(super) fn merge(self) -> Result<SummariseArgs, RfiTrackerError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let SummariseArgs {
                args_file: _,
                input,
                num_rfi,
                min_obs,
                sort,
                grid,
            } = unpack_arg_file!(arg_file);

            Ok(SummariseArgs {
                args_file: None,
                input: cli_args.input.or(input),
                num_rfi: cli_args.num_rfi.or(num_rfi),
                min_obs: cli_args.min_obs.or(min_obs),
                sort: cli_args.sort || sort,
                grid: cli_args.grid.merge(grid),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<SummariseParams, RfiTrackerError> {
        debug!("{:#?}", self);

        let SummariseArgs {
            args_file: _,
            input,
            num_rfi,
            min_obs,
            sort,
            grid,
        } = self;

        let input = input.ok_or(SummariseArgsError::NoInput)?;
        let num_rfi = num_rfi.ok_or(SummariseArgsError::NoNumRfi)?;
        let grid = grid.parse()?;

        let mut printer = InfoPrinter::new("RFI summary".into());
        printer.push_line(format!("Reading {num_rfi} RFI from {}", input.display()).into());
        printer.push_line(
            format!(
                "Grid: {} channels x {} intervals",
                grid.num_chan, grid.num_int
            )
            .into(),
        );
        printer.display();

        Ok(SummariseParams {
            input,
            grid,
            num_rfi,
            min_obs: min_obs.unwrap_or(0),
            sort,
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
pub(super) enum SummariseArgsError {
    #[error("No input RFI file was specified")]
    NoInput,

    #[error("The number of RFI in the input file wasn't specified (--num-rfi)")]
    NoNumRfi,
}

struct SummariseParams {
    input: PathBuf,
    grid: GridShape,
    num_rfi: usize,
    min_obs: u32,
    sort: bool,
}

impl SummariseParams {
    fn run(self) -> Result<RfiVector, RfiTrackerError> {
        let mut rfis = read_rfi_file(&self.input, self.grid, self.num_rfi)?;
        if self.sort {
            rfis.sort_by_freq();
        }

        let mut printer = InfoPrinter::new(format!("{} RFI", rfis.len()).into());
        let mut num_hidden = 0;
        for (i, rfi) in rfis.iter().enumerate() {
            if rfi.numobs < self.min_obs {
                num_hidden += 1;
                continue;
            }
            printer.push_block(describe(i, rfi));
        }
        if num_hidden > 0 {
            printer.push_line(
                format!(
                    "{num_hidden} RFI seen fewer than {} times not shown",
                    self.min_obs
                )
                .into(),
            );
        }
        printer.display();

        Ok(rfis)
    }
}

fn describe(i: usize, rfi: &Rfi) -> Vec<std::borrow::Cow<'static, str>> {
    vec![
        format!(
            "#{i}: {:.6} ± {:.6} Hz, seen {} times, mean sigma {:.2}",
            rfi.freq_avg,
            rfi.freq_std(),
            rfi.numobs,
            rfi.sigma_avg
        )
        .into(),
        format!("channels:  {}", format_ranges(rfi.chans().iter_ones())).into(),
        format!("intervals: {}", format_ranges(rfi.times().iter_ones())).into(),
    ]
}
