//! Error types for the simulator's external collaborators.
//!
//! Core invariant violations (an unmapped page appearing mapped, a
//! non-writable cursor being written to, a victim that can't be found, a
//! policy returning an out-of-range stream id) are programmer errors and
//! abort the process via `assert!`/`panic!` rather than flowing through
//! this type — see §7 of the spec. `SimError` only covers the trace
//! reader and the command-line driver, both of which deal with untrusted
//! input.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to open trace file {path}: {source}")]
    TraceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read trace file {path}: {source}")]
    TraceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed trace header in {path}: expected '<length> <max_lba>'")]
    MalformedHeader { path: PathBuf },

    #[error("malformed trace record on line {line} of {path}: expected '<addr> <length> <stream>'")]
    MalformedRecord { path: PathBuf, line: usize },
}
