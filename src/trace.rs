//! Trace file reader — an external collaborator, not part of the core.
//!
//! Format (see spec §6): the first whitespace-separated line holds the
//! trace length and the maximum LBA referenced; every line after that is
//! a triple `<addr> <length> <stream>`, where a negative `stream` marks
//! a trim and a non-negative one is the stream hint for a write.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::SimError;
use crate::types::{Lba, StreamId};

/// One decoded trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    pub addr: Lba,
    pub length: usize,
    /// `None` for a trim record; `Some(hint)` for a write record.
    pub stream_hint: Option<StreamId>,
}

impl TraceRecord {
    pub fn is_trim(&self) -> bool {
        self.stream_hint.is_none()
    }
}

/// Streams `TraceRecord`s out of a trace file, to EOF.
pub struct TraceReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
    trace_length: u64,
    max_lba: Lba,
}

impl TraceReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| SimError::TraceOpen {
            path: path.clone(),
            source,
        })?;
        let mut lines = BufReader::new(file).lines();

        let header = lines
            .next()
            .ok_or_else(|| SimError::MalformedHeader { path: path.clone() })?
            .map_err(|source| SimError::TraceRead {
                path: path.clone(),
                source,
            })?;
        let mut tokens = header.split_whitespace();
        let trace_length: u64 = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| SimError::MalformedHeader { path: path.clone() })?;
        let max_lba: Lba = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| SimError::MalformedHeader { path: path.clone() })?;

        Ok(TraceReader {
            path,
            lines,
            line_no: 1,
            trace_length,
            max_lba,
        })
    }

    pub fn trace_length(&self) -> u64 {
        self.trace_length
    }

    pub fn max_lba(&self) -> Lba {
        self.max_lba
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for TraceReader {
    type Item = Result<TraceRecord, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(source) => {
                    return Some(Err(SimError::TraceRead {
                        path: self.path.clone(),
                        source,
                    }))
                }
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let record = (|| {
                let addr: Lba = tokens.next()?.parse().ok()?;
                let length: usize = tokens.next()?.parse().ok()?;
                let raw_stream: i64 = tokens.next()?.parse().ok()?;
                Some(TraceRecord {
                    addr,
                    length,
                    stream_hint: if raw_stream < 0 {
                        None
                    } else {
                        Some(raw_stream as StreamId)
                    },
                })
            })();

            return match record {
                Some(record) => Some(Ok(record)),
                None => Some(Err(SimError::MalformedRecord {
                    path: self.path.clone(),
                    line: self.line_no,
                })),
            };
        }
    }
}
