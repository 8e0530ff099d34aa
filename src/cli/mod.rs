// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code. More specific options for `rfi-tracker`
//! subcommands are contained in modules.
//!
//! All booleans must have `#[serde(default)]` annotated, and anything that
//! isn't a boolean must be optional. This allows all arguments to be optional
//! *and* usable in an arguments file.
//!
//! Only 3 things should be public in this module: `RfiTracker`,
//! `RfiTracker::run`, and `RfiTrackerError`.

#[macro_use]
mod common;
mod collect;
mod error;
mod summarise;

pub use error::RfiTrackerError;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::info;

use common::InfoPrinter;

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    about = "Track periodic radio-frequency interference detected over a grid of channels and time intervals."
)]
#[clap(disable_help_subcommand = true)]
#[clap(infer_subcommands = true)]
#[clap(propagate_version = true)]
#[clap(infer_long_args = true)]
pub struct RfiTracker {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    #[clap(global = true)]
    verbosity: u8,

    /// Only verify that arguments were correctly ingested and print out
    /// high-level information.
    #[clap(long)]
    #[clap(global = true)]
    dry_run: bool,

    /// Save the input arguments into a new TOML file that can be used to
    /// reproduce this run.
    #[clap(long)]
    #[clap(global = true)]
    save_toml: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
#[clap(arg_required_else_help = true)]
enum Command {
    #[clap(
        about = "Fold candidate RFI detections into an RFI collection and write it out."
    )]
    Collect(collect::CollectArgs),

    #[clap(alias = "summarize")]
    #[clap(about = "Print a summary of the RFI in an RFI file.")]
    Summarise(summarise::SummariseArgs),
}

impl RfiTracker {
    pub fn run(self) -> Result<(), RfiTrackerError> {
        // Set up logging.
        let GlobalArgs {
            verbosity,
            dry_run,
            save_toml,
        } = self.global_opts;
        setup_logging(verbosity).expect("Failed to initialise logging.");

        let sub_command = match &self.command {
            Command::Collect(_) => "collect",
            Command::Summarise(_) => "summarise",
        };
        display_build_info(sub_command);

        macro_rules! merge_save_run {
            ($args:expr) => {{
                let args = $args.merge()?;
                if let Some(toml) = save_toml {
                    use std::{
                        fs::File,
                        io::{BufWriter, Write},
                    };

                    let mut f = BufWriter::new(File::create(&toml)?);
                    f.write_all(toml::to_string_pretty(&args)?.as_bytes())?;
                    f.flush()?;
                    info!("Saved arguments to {}", toml.display());
                }
                args.run(dry_run)?;
            }};
        }

        match self.command {
            Command::Collect(args) => merge_save_run!(args),
            Command::Summarise(args) => merge_save_run!(args),
        }

        info!("rfi-tracker {sub_command} complete.");
        Ok(())
    }
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Module paths and source
/// lines are displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    builder.filter_level(match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    });
    if verbosity >= 3 {
        builder.format(|buf, record| {
            use std::io::Write;

            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("?"),
                record.line().unwrap_or(0),
                record.args()
            )
        });
    }
    builder.try_init()
}

/// Report how this executable was compiled.
fn display_build_info(sub_command: &str) {
    let mut printer = InfoPrinter::new(
        format!("rfi-tracker {sub_command} {}", env!("CARGO_PKG_VERSION")).into(),
    );
    let dirty = if GIT_DIRTY == Some(true) {
        " (dirty)"
    } else {
        ""
    };
    let mut block = vec![match GIT_COMMIT_HASH_SHORT {
        Some(hash) => format!("git commit: {hash}{dirty}").into(),
        None => "git commit: <no git info>".into(),
    }];
    if let Some(head_ref) = GIT_HEAD_REF {
        block.push(format!("git head ref: {head_ref}").into());
    }
    block.push(format!("built: {BUILT_TIME_UTC}").into());
    block.push(format!("compiler: {RUSTC_VERSION}").into());
    printer.push_block(block);
    printer.display();
}
