//! Chunked waveform aggregation: partition arithmetic, skip/read planning,
//! and the single-pass statistics fold.

mod aggregator;
pub mod partition;
pub mod planner;


pub use partition::ChunkPartition;
pub use planner::ReadPlan;

use std::ops::RangeInclusive;

use tracing::debug;

use crate::audio::SampleSource;
use crate::error::Result;
use crate::types::{Aggregation, CancelToken};

use aggregator::ChunkAggregator;

/// Fold the chunks `chunk_range` of a `max_chunks`-wide partition into one
/// `AveragedSampleData` per channel.
///
/// Only the frames covering the requested range are decoded: the source is
/// positioned with a frame-exact skip, then read frame by frame. The
/// cancellation token is polled once per frame.
pub fn averaged_sample_data<S: SampleSource>(
    source: &mut S,
    max_chunks: u32,
    chunk_range: RangeInclusive<u32>,
    cancel: &CancelToken,
) -> Result<Aggregation> {
    let info = source.info();
    let partition = ChunkPartition::new(max_chunks, info.total_frames)?;
    let plan = ReadPlan::for_range(&partition, chunk_range.clone())?;
    debug!(
        frames_to_skip = plan.frames_to_skip,
        frames_to_read = plan.frames_to_read,
        max_chunks,
        "planned chunk range decode"
    );

    let start_chunk = *chunk_range.start();
    let chunk_count = (*chunk_range.end() - start_chunk + 1) as usize;
    source.skip_frames(plan.frames_to_skip)?;
    let aggregator = ChunkAggregator::new(
        &partition,
        &plan,
        info.channels as usize,
        start_chunk,
        chunk_count,
        info.bit_depth,
    );
    aggregator.run(source, plan.frames_to_read, cancel)
}
