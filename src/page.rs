//! The per-logical-address mapping record.

use crate::types::{BlockId, StreamId, VTime};

/// Either all three fields are set (the address is mapped to a block,
/// on a stream, stamped with a write time) or all three are unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageEntry {
    pub block: Option<BlockId>,
    pub stream: Option<StreamId>,
    pub written_time: Option<VTime>,
}

impl PageEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mapped(&self) -> bool {
        self.block.is_some()
    }

    /// Stamp a fresh host write.
    pub fn write(&mut self, block: BlockId, stream: StreamId, vtime: VTime) {
        self.block = Some(block);
        self.stream = Some(stream);
        self.written_time = Some(vtime);
    }

    /// Relocate this page during GC. `written_time` is preserved so the
    /// lifetime sample taken at eventual trim still measures from the
    /// original write, not the copy.
    pub fn move_to(&mut self, block: BlockId, stream: StreamId) {
        debug_assert!(self.is_mapped(), "move_to on an unmapped page");
        self.block = Some(block);
        self.stream = Some(stream);
    }

    /// Unmap the page. Pre-condition: mapped.
    pub fn trim(&mut self) {
        assert!(self.block.is_some(), "trim of an unmapped page entry");
        assert!(self.stream.is_some(), "trim of an unmapped page entry");
        assert!(self.written_time.is_some(), "trim of an unmapped page entry");
        self.block = None;
        self.stream = None;
        self.written_time = None;
    }
}
