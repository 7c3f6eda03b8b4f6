//! Leveled diagnostics, separate from the human-readable stdout report.
//!
//! Configuration-size warnings (§3) and GC/cursor-rebind activity (§4.6)
//! go through `log::{warn, debug}`; the counters and WAF report printed
//! by [`crate::drive::Drive::printresult`] stay on stdout untouched.

/// Initialize the global logger once, as the teacher crate's `main.rs`
/// does: `RUST_LOG` wins when set, otherwise fall back to `info`, or to
/// `debug` when `-v`/`--verbose` was passed on the command line.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
