//! Command-line surface shared by the `identity` and `mida` binaries
//! (§6). Argument parsing uses `clap`'s derive API, as the teacher
//! crate's `cli.rs` does, but the spec requires usage-and-exit-0 on
//! insufficient arguments rather than clap's default exit-2 behavior,
//! so parsing goes through `try_parse` with a hand-printed usage line.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::drive::Drive;
use crate::error::SimError;
use crate::json_output::JsonOutput;
use crate::policy::StreamPolicy;
use crate::trace::{TraceReader, TraceRecord};

const USAGE: &str =
    "usage: <prog> <max_lba> <ops_percent> <num_streams> <trace_path> [<trace_path> ...] [-v|--verbose] [--json]";

#[derive(Parser, Debug)]
#[command(name = "ftlsim", about = "Trace-driven flash FTL simulator", long_about = None, disable_help_flag = true)]
pub struct Args {
    /// Logical LBA size of the simulated drive.
    pub max_lba: usize,
    /// Over-provisioning percent applied to `max_lba`.
    pub ops_percent: f64,
    /// Number of streams the policy routes pages across.
    pub num_streams: usize,
    /// One or more trace files, executed in order against the same drive.
    #[arg(required = true, num_args = 1..)]
    pub trace_paths: Vec<PathBuf>,
    /// Print a WAF progress line on stderr every 100,000 virtual-time ticks.
    #[arg(short = 'v', long)]
    pub verbose: bool,
    /// Additionally emit a JSON summary after each trace's report.
    #[arg(long)]
    pub json: bool,
}

/// Parse `std::env::args`, printing usage and returning `None` on any
/// failure (missing/malformed arguments, `--help`) rather than clap's
/// default exit(2) — the spec requires exit code 0 in that case.
pub fn parse_args() -> Option<Args> {
    parse_args_from(std::env::args_os())
}

/// As [`parse_args`], but over an explicit argument list so the usage
/// path can be exercised from tests without touching the real process
/// arguments.
pub fn parse_args_from<I, T>(args: I) -> Option<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Args::try_parse_from(args) {
        Ok(args) => Some(args),
        Err(_) => {
            println!("{USAGE}");
            None
        }
    }
}

/// Adapts the `Result`-yielding `TraceReader` into the plain
/// `TraceRecord` iterator `Drive::run` expects, pulling one record at
/// a time rather than buffering a whole trace file up front (§2, §5:
/// "trace iterator adapter ... pulled one at a time"). The first
/// I/O/parse error encountered ends iteration early and is stashed for
/// [`FallibleRecords::into_result`] to surface once `run` returns.
struct FallibleRecords<I> {
    inner: I,
    error: Option<SimError>,
}

impl<I> FallibleRecords<I> {
    fn new(inner: I) -> Self {
        FallibleRecords { inner, error: None }
    }

    fn into_result(self) -> std::result::Result<(), SimError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<I: Iterator<Item = std::result::Result<TraceRecord, SimError>>> Iterator for FallibleRecords<I> {
    type Item = TraceRecord;

    fn next(&mut self) -> Option<TraceRecord> {
        match self.inner.next() {
            Some(Ok(record)) => Some(record),
            Some(Err(err)) => {
                self.error = Some(err);
                None
            }
            None => None,
        }
    }
}

/// Run every trace path in order against one drive, reporting and
/// resetting statistics between traces (§4.3, §6).
pub fn drive_main<P: StreamPolicy>(args: &Args, policy: P) -> Result<()> {
    let mut drive = Drive::new(args.max_lba, args.ops_percent, args.num_streams, policy);
    drive.set_verbose(args.verbose);

    for path in &args.trace_paths {
        let reader = TraceReader::open(path)?;
        let mut records = FallibleRecords::new(reader);
        drive.run(&mut records);
        records.into_result()?;

        drive.printstat();
        drive.printresult();
        if args.json {
            println!("{}", JsonOutput::summary(&drive));
        }
        drive.resetstat();
    }

    Ok(())
}
