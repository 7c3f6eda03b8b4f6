//! Machine-readable trace summaries, emitted on stdout after the
//! human-readable report when `--json` is passed (§6).
//!
//! Grounded on the teacher crate's `JsonOutput` formatter: a small
//! struct of associated functions that build `serde_json::json!` values
//! rather than hand-rolled string concatenation.

use serde_json::{json, Value};

use crate::drive::Drive;
use crate::policy::StreamPolicy;
use crate::types::StreamId;

pub struct JsonOutput;

impl JsonOutput {
    /// One trace's counters, WAF, and per-stream lifetime summaries.
    pub fn summary<P: StreamPolicy>(drive: &Drive<P>) -> Value {
        let streams: Vec<Value> = (0..drive.num_streams())
            .map(|stream| Self::stream_summary(drive, stream))
            .collect();

        json!({
            "vtime": drive.vtime(),
            "writes": drive.writes(),
            "trims": drive.trims(),
            "pagescopied": drive.pagescopied(),
            "waf": drive.waf(),
            "streams": streams,
        })
    }

    fn stream_summary<P: StreamPolicy>(drive: &Drive<P>, stream: StreamId) -> Value {
        match drive.stream_summary(stream) {
            Some(summary) => json!({
                "stream": stream,
                "count": summary.count,
                "average": summary.average,
                "stdev": summary.stdev,
            }),
            None => json!({
                "stream": stream,
                "count": 0,
            }),
        }
    }
}
