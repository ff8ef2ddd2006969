use std::ops::RangeInclusive;

use crate::error::{Result, WaveformError};

use super::partition::ChunkPartition;

/// Skip/read budget for decoding a chunk sub-range from a forward-only
/// stream: bypass `frames_to_skip` frames, then decode exactly
/// `frames_to_read` frames, and the requested chunks are covered without
/// materializing anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPlan {
    pub frames_to_skip: u64,
    pub frames_to_read: u64,
    /// Big chunks intersecting the requested range; they are its lowest
    /// indices, so the aggregator counts them down first.
    pub(crate) big_chunks_in_range: u64,
}

impl ReadPlan {
    /// Closed-form plan for the chunks `lo..=hi` of `partition`: the big
    /// chunk set contributes `frames_per_chunk + 1` frames per chunk it
    /// intersects, every other chunk contributes `frames_per_chunk`.
    pub fn for_range(partition: &ChunkPartition, range: RangeInclusive<u32>) -> Result<Self> {
        let (lo, hi) = (*range.start(), *range.end());
        if lo > hi || hi >= partition.max_chunks() {
            return Err(WaveformError::invalid_partition(format!(
                "chunk range {}..={} outside of 0..{}",
                lo,
                hi,
                partition.max_chunks()
            )));
        }
        let fpc = partition.frames_per_chunk();
        let big = partition.big_chunk_count();

        let big_before = big.min(lo as u64);
        let frames_to_skip = big_before * (fpc + 1) + (lo as u64 - big_before) * fpc;

        let len = (hi - lo + 1) as u64;
        let big_in_range = big.min(hi as u64 + 1) - big_before;
        let frames_to_read = big_in_range * (fpc + 1) + (len - big_in_range) * fpc;

        Ok(Self {
            frames_to_skip,
            frames_to_read,
            big_chunks_in_range: big_in_range,
        })
    }
}
