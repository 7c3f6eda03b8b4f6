//! The drive core: page/block state, cursors, garbage collection, and
//! the host write/trim path.

use std::collections::VecDeque;

use log::{debug, warn};

use crate::block::Block;
use crate::config::Geometry;
use crate::page::PageEntry;
use crate::policy::StreamPolicy;
use crate::stats::{LifetimeStats, StatSummary};
use crate::trace::TraceRecord;
use crate::types::{BlockId, Count, Lba, StreamId, VTime, PPB};

/// Emit the progress line on stderr every this many virtual-time ticks.
const PROGRESS_INTERVAL: VTime = 100_000;

pub struct Drive<P: StreamPolicy> {
    geometry: Geometry,
    policy: P,
    verbose: bool,

    vtime_total: VTime,
    vtime: VTime,
    pagescopied: Count,
    writes: Count,
    trims: Count,

    pages: Vec<PageEntry>,
    blocks: Vec<Block>,
    cursors: Vec<Option<BlockId>>,
    empty_blocks: VecDeque<BlockId>,
    stats: Vec<LifetimeStats>,
}

impl<P: StreamPolicy> Drive<P> {
    /// Build a drive for `lba_size` logical pages at `ops_percent`
    /// over-provisioning with `policy` routing streams, and immediately
    /// run the initial sequential fill (spec §4.4).
    pub fn new(lba_size: Lba, ops_percent: f64, num_streams: StreamId, policy: P) -> Self {
        let geometry = Geometry::new(lba_size, ops_percent, num_streams);

        if !geometry.is_adequately_provisioned() {
            warn!(
                "over-provisioning too small: {} blocks cannot cover {} LBAs plus a {}-block GC reserve",
                geometry.num_blocks,
                lba_size.div_ceil(PPB),
                geometry.gc_threshold
            );
        }

        let blocks: Vec<Block> = (0..geometry.num_blocks).map(Block::new).collect();
        let empty_blocks: VecDeque<BlockId> = (0..geometry.num_blocks).collect();
        let pages = vec![PageEntry::new(); lba_size];
        let cursors = vec![None; num_streams];
        let stats = (0..num_streams).map(|_| LifetimeStats::new()).collect();

        println!(
            "logical device size: {:.3} GiB",
            lba_size as f64 / 262144.0
        );
        println!(
            "physical device size: {:.3} GiB",
            geometry.num_pages as f64 / 262144.0
        );
        println!("OPS: {:.2}%", geometry.actual_ops_percent());
        println!("number of streams: {}", num_streams);

        let mut drive = Drive {
            geometry,
            policy,
            verbose: false,
            vtime_total: 0,
            vtime: 0,
            pagescopied: 0,
            writes: 0,
            trims: 0,
            pages,
            blocks,
            cursors,
            empty_blocks,
            stats,
        };

        drive.write_all_sequential();
        println!("--------------------------------");
        drive
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    fn write_all_sequential(&mut self) {
        for addr in 0..self.geometry.lba_size {
            self.vtime_total += 1;
            self.vtime += 1;
            let stream = self.policy.new_stream(addr, 0);
            self.write(addr, stream);
        }
        self.resetstat();
    }

    /// Consume `trace` to exhaustion, trimming and writing each logical
    /// address per spec §4.5.
    pub fn run(&mut self, trace: impl Iterator<Item = TraceRecord>) {
        for record in trace {
            let end = (record.addr + record.length).min(self.geometry.lba_size);
            let mut addr = record.addr;
            while addr < end {
                self.vtime_total += 1;
                self.vtime += 1;

                self.trim(addr);

                match record.stream_hint {
                    Some(hint) => {
                        let stream = self.policy.new_stream(addr, hint);
                        self.write(addr, stream);
                    }
                    None => {
                        self.trims += 1;
                    }
                }

                if self.verbose && self.vtime % PROGRESS_INTERVAL == 0 {
                    eprint!("{}: WAF {:.3}          \r", self.vtime, self.waf());
                }

                addr += 1;
            }
        }
        if self.verbose {
            eprintln!();
        }
    }

    pub fn trim(&mut self, addr: Lba) {
        if addr >= self.geometry.lba_size {
            return;
        }
        let page = self.pages[addr];
        let Some(block_id) = page.block else {
            return;
        };
        let stream = page.stream.expect("mapped page missing stream");
        let written_time = page.written_time.expect("mapped page missing written_time");

        self.blocks[block_id].trim(addr);
        if self.blocks[block_id].empty() && !self.blocks[block_id].is_writing() {
            self.empty_blocks.push_back(block_id);
        }

        self.stats[stream].push(self.vtime_total, written_time);
        self.pages[addr].trim();
    }

    pub fn write(&mut self, addr: Lba, stream: StreamId) {
        if addr >= self.geometry.lba_size {
            return;
        }
        assert!(stream < self.cursors.len(), "policy returned an out-of-range stream id");

        self.writes += 1;

        let block_id = self.cursor_for(stream);
        self.blocks[block_id].write(addr, stream);
        self.pages[addr].write(block_id, stream, self.vtime_total);

        while self.empty_blocks.len() < self.geometry.gc_threshold {
            self.collect_garbage();
        }
    }

    /// Return the block currently open for `stream`, rebinding a fresh
    /// empty block from the free list if there is none, or the current
    /// one is full.
    fn cursor_for(&mut self, stream: StreamId) -> BlockId {
        if let Some(id) = self.cursors[stream] {
            if self.blocks[id].writable() {
                return id;
            }
        }
        let id = self.new_cursor();
        self.cursors[stream] = Some(id);
        id
    }

    fn new_cursor(&mut self) -> BlockId {
        let id = self
            .empty_blocks
            .pop_front()
            .expect("no empty blocks available: device is full");
        let block = &mut self.blocks[id];
        debug_assert!(block.empty() && block.invalid() == 0 && !block.is_writing());
        block.open_for_writing();
        id
    }

    fn move_page(&mut self, addr: Lba, stream: StreamId) {
        let block_id = self.cursor_for(stream);
        self.blocks[block_id].write(addr, stream);
        self.pages[addr].move_to(block_id, stream);
    }

    fn get_victim(&self) -> BlockId {
        let mut victim = None;
        let mut min_valid = PPB;
        for block in &self.blocks {
            if !block.is_writing() && !block.empty() && block.valid() < min_valid {
                min_valid = block.valid();
                victim = Some(block.id());
            }
        }
        victim.expect("no GC victim found: no non-writing, non-empty block exists")
    }

    fn collect_garbage(&mut self) {
        let victim_id = self.get_victim();
        let victim_valid = self.blocks[victim_id].valid();
        assert!(victim_valid < PPB, "GC victim is already full");

        self.pagescopied += victim_valid as Count;
        self.blocks[victim_id].record_gc();

        let addrs: Vec<Lba> = self.blocks[victim_id].addrs().iter().copied().collect();
        for addr in addrs {
            let old_stream = self.pages[addr].stream.expect("live page missing stream");
            let new_stream = self.policy.gc_stream(addr, old_stream);
            assert!(new_stream < self.cursors.len(), "gc_stream returned an out-of-range stream id");
            self.move_page(addr, new_stream);
        }

        self.blocks[victim_id].clear();
        self.empty_blocks.push_back(victim_id);
        debug!("gc: reclaimed block {} ({} pages copied)", victim_id, victim_valid);
    }

    pub fn waf(&self) -> f64 {
        if self.writes == 0 {
            0.0
        } else {
            self.pagescopied as f64 / self.writes as f64 + 1.0
        }
    }

    pub fn writes(&self) -> Count {
        self.writes
    }

    pub fn trims(&self) -> Count {
        self.trims
    }

    pub fn pagescopied(&self) -> Count {
        self.pagescopied
    }

    pub fn vtime(&self) -> VTime {
        self.vtime
    }

    pub fn stream_summary(&self, stream: StreamId) -> Option<StatSummary> {
        self.stats[stream].summary()
    }

    pub fn num_streams(&self) -> StreamId {
        self.stats.len()
    }

    pub fn printresult(&self) {
        println!("vtime: {}", self.vtime);
        println!("writes: {}", self.writes);
        println!("trims: {}", self.trims);
        println!("pagescopied: {}", self.pagescopied);
        println!("WAF: {}", self.waf());
        println!("--------------------------------");
    }

    pub fn printstat(&self) {
        for (stream, stat) in self.stats.iter().enumerate() {
            if let Some(summary) = stat.summary() {
                println!(
                    "stream {} average {} stdev {}",
                    stream, summary.average as i64, summary.stdev as i64
                );
            }
        }
    }

    /// Zero `vtime`, `pagescopied`, `writes`, and clear each stream's
    /// sample list, in place. `vtime_total`, `trims`, and per-block
    /// `gc_count`s are untouched.
    pub fn resetstat(&mut self) {
        self.vtime = 0;
        self.pagescopied = 0;
        self.writes = 0;
        for stat in self.stats.iter_mut() {
            stat.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{IdentityPolicy, MidaPolicy};

    fn records(lines: &[(Lba, usize, Option<StreamId>)]) -> Vec<TraceRecord> {
        lines
            .iter()
            .map(|&(addr, length, stream_hint)| TraceRecord {
                addr,
                length,
                stream_hint,
            })
            .collect()
    }

    /// S1 — no-GC baseline.
    #[test]
    fn s1_no_gc_baseline() {
        let mut drive = Drive::new(128, 100.0, 1, IdentityPolicy::new(1));
        assert_eq!(drive.writes(), 0);
        assert_eq!(drive.pagescopied(), 0);
        assert_eq!(drive.waf(), 0.0);

        drive.run(records(&[(0, 1, Some(0))]).into_iter());

        assert_eq!(drive.writes(), 1);
        assert_eq!(drive.pagescopied(), 0);
        assert_eq!(drive.waf(), 1.0);
    }

    /// S2 — overwriting everything with a tight device returns the
    /// fully-invalidated block straight to the empty queue without GC.
    #[test]
    fn s2_full_overwrite_skips_gc() {
        let mut drive = Drive::new(128, 100.0, 1, IdentityPolicy::new(1));
        let writes: Vec<_> = (0..128).map(|addr| (addr, 1, Some(0))).collect();
        drive.run(records(&writes).into_iter());

        assert_eq!(drive.pagescopied(), 0);
        assert_eq!(drive.waf(), 1.0);
    }

    /// S3 — forced GC with residual valid pages copies exactly the
    /// surviving pages and preserves their stream under identity policy.
    #[test]
    fn s3_forced_gc_copies_residual_valid_pages() {
        // Small device: tight enough that overwriting half a block's
        // worth of addresses (but not all of it) forces a GC cycle.
        let mut drive = Drive::new(256, 5.0, 1, IdentityPolicy::new(1));
        let before_copied = drive.pagescopied();

        // Overwrite every other address: each block ends up with half
        // its pages invalid, which is exactly the "residual valid"
        // shape GC needs to pick a victim from.
        let writes: Vec<_> = (0..256).step_by(2).map(|addr| (addr, 1, Some(0))).collect();
        drive.run(records(&writes).into_iter());

        assert!(
            drive.pagescopied() > before_copied,
            "a tight device under a half-invalidating workload should trigger at least one GC cycle"
        );
    }

    /// S4 — MiDA promotion: a page that survives three GC cycles ends
    /// at stream 3 (S=4) and stays there on further survival.
    #[test]
    fn s4_mida_promotes_and_clamps() {
        let policy = MidaPolicy::new(4);
        assert_eq!(policy.new_stream(0, 7), 0);
        let mut stream = 0;
        for expected in [1, 2, 3, 3] {
            stream = policy.gc_stream(0, stream);
            assert_eq!(stream, expected);
        }
    }

    /// S5 — a trim record with length 3 trims three addresses.
    #[test]
    fn s5_trim_record_trims_every_covered_address() {
        let mut drive = Drive::new(128, 100.0, 1, IdentityPolicy::new(1));
        drive.run(records(&[(5, 3, None)]).into_iter());
        assert_eq!(drive.trims(), 3);
    }

    /// S6 — out-of-range writes beyond L are silently dropped.
    #[test]
    fn s6_out_of_range_writes_are_ignored() {
        let mut drive = Drive::new(100, 50.0, 1, IdentityPolicy::new(1));
        drive.run(records(&[(95, 10, Some(0))]).into_iter());
        assert_eq!(drive.writes(), 5);
    }

    #[test]
    fn trim_of_unmapped_address_is_a_no_op() {
        let mut drive = Drive::new(128, 100.0, 1, IdentityPolicy::new(1));
        drive.trim(10);
        drive.trim(10);
    }

    #[test]
    fn resetstat_clears_stream_lists_in_place() {
        let mut drive = Drive::new(128, 100.0, 1, IdentityPolicy::new(1));
        drive.run(records(&[(5, 1, None)]).into_iter());
        assert!(drive.stream_summary(0).is_some());
        drive.resetstat();
        assert!(drive.stream_summary(0).is_none());
        assert_eq!(drive.writes(), 0);
        assert_eq!(drive.pagescopied(), 0);
    }

    #[test]
    fn resetstat_does_not_touch_total_vtime_or_trims() {
        let mut drive = Drive::new(128, 100.0, 1, IdentityPolicy::new(1));
        drive.run(records(&[(5, 1, None)]).into_iter());
        let trims_before = drive.trims();
        drive.resetstat();
        assert_eq!(drive.trims(), trims_before);
    }
}
