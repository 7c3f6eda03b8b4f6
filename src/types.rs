//! Scalar type aliases shared across the simulator.

/// A logical block address presented to the host, `0..L`.
pub type Lba = usize;

/// Index into the fixed block arena, `0..B`.
pub type BlockId = usize;

/// A stream identifier, `0..S`.
pub type StreamId = usize;

/// Virtual time: a monotone tick counter, one per logical address processed.
pub type VTime = u64;

/// A saturating counter (writes, trims, pages copied, ...).
pub type Count = u64;

/// Pages per block. Fixed by the device model, never configurable.
pub const PPB: usize = 128;
