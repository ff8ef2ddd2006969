use tracing::warn;

use crate::audio::SampleSource;
use crate::error::Result;
use crate::types::{Aggregation, AveragedSampleData, CancelToken, ChunkStats};

use super::partition::ChunkPartition;
use super::planner::ReadPlan;

/// Single-pass fold of an interleaved frame stream into per-channel,
/// per-chunk statistics.
///
/// All state is owned by one aggregation call: raw peak buffers sized for
/// the largest possible chunk, a frame-within-chunk counter, the output
/// chunk cursor, and the count of big chunks still expected. Concurrent
/// calls share nothing but the read-only cancellation token.
pub(crate) struct ChunkAggregator {
    data: Vec<AveragedSampleData>,
    peaks: Vec<Vec<i64>>,
    frames_per_chunk: u64,
    big_remaining: u64,
    frame_in_chunk: usize,
    chunk_cursor: usize,
}

impl ChunkAggregator {
    pub(crate) fn new(
        partition: &ChunkPartition,
        plan: &ReadPlan,
        channels: usize,
        start_chunk: u32,
        chunk_count: usize,
        bit_depth: u32,
    ) -> Self {
        let buffer_len = partition.frames_per_chunk() as usize + 1;
        Self {
            data: (0..channels)
                .map(|_| AveragedSampleData::new(chunk_count, start_chunk, bit_depth))
                .collect(),
            peaks: (0..channels).map(|_| vec![0i64; buffer_len]).collect(),
            frames_per_chunk: partition.frames_per_chunk(),
            big_remaining: plan.big_chunks_in_range,
            frame_in_chunk: 0,
            chunk_cursor: 0,
        }
    }

    /// Consume up to `frames_to_read` frames from `source`. The liveness
    /// flag is polled before every frame; a cancelled call discards all
    /// accumulated state. A source that ends early closes the in-progress
    /// chunk from the frames actually received.
    pub(crate) fn run<S: SampleSource>(
        mut self,
        source: &mut S,
        frames_to_read: u64,
        cancel: &CancelToken,
    ) -> Result<Aggregation> {
        let mut frame = vec![0i64; self.peaks.len()];
        let mut delivered = 0u64;
        while delivered < frames_to_read {
            if cancel.is_cancelled() {
                return Ok(Aggregation::Cancelled);
            }
            if !source.read_frame(&mut frame)? {
                warn!(
                    delivered,
                    expected = frames_to_read,
                    "sample source ended early; closing last chunk with the frames received"
                );
                break;
            }
            delivered += 1;
            self.push_frame(&frame);
        }
        self.finish();
        Ok(Aggregation::Complete(self.data))
    }

    fn push_frame(&mut self, frame: &[i64]) {
        for (channel, &value) in frame.iter().enumerate() {
            self.peaks[channel][self.frame_in_chunk] = value;
        }
        self.frame_in_chunk += 1;
        if self.frame_in_chunk as u64 == self.expected_chunk_size() {
            self.close_chunk();
        }
    }

    /// Size the current chunk must reach before it completes: big chunks
    /// come first in the requested range and hold one extra frame.
    fn expected_chunk_size(&self) -> u64 {
        if self.big_remaining > 0 {
            self.frames_per_chunk + 1
        } else {
            self.frames_per_chunk
        }
    }

    fn close_chunk(&mut self) {
        if self.big_remaining > 0 {
            self.big_remaining -= 1;
        }
        let filled = self.frame_in_chunk;
        for (channel, data) in self.data.iter_mut().enumerate() {
            data.set_chunk(self.chunk_cursor, reduce_chunk(&self.peaks[channel][..filled]));
        }
        self.chunk_cursor += 1;
        self.frame_in_chunk = 0;
    }

    fn finish(&mut self) {
        // A leftover partial chunk only exists when the stream was
        // truncated; its statistics use the collected frame count.
        if self.frame_in_chunk > 0 {
            self.close_chunk();
        }
    }
}

/// Reduce one chunk's buffered peak values into its four statistics.
///
/// The RMS is the root mean square of deviations from the chunk's own
/// average (float division, then truncation), matching the downstream
/// visual scaling. Not the quadratic mean of raw amplitudes.
fn reduce_chunk(values: &[i64]) -> ChunkStats {
    let n = values.len();
    let sum: i128 = values.iter().map(|&v| v as i128).sum();
    let average = (sum / n as i128) as i64;
    let mut highest = i64::MIN;
    let mut lowest = i64::MAX;
    for &v in values {
        highest = highest.max(v);
        lowest = lowest.min(v);
    }
    let deviation: i128 = values
        .iter()
        .map(|&v| {
            let d = v as i128 - average as i128;
            d * d
        })
        .sum();
    let root_mean_square = (deviation as f64 / n as f64).sqrt() as i64;
    ChunkStats {
        average,
        root_mean_square,
        highest_peak: highest,
        lowest_peak: lowest,
    }
}

#[cfg(test)]
mod tests {
    use super::reduce_chunk;

    #[test]
    fn reduce_matches_reference_values() {
        let stats = reduce_chunk(&[10, -10, 20, -20]);
        assert_eq!(stats.average, 0);
        assert_eq!(stats.highest_peak, 20);
        assert_eq!(stats.lowest_peak, -20);
        // floor(sqrt((100 + 100 + 400 + 400) / 4)) = floor(sqrt(250))
        assert_eq!(stats.root_mean_square, 15);
    }

    #[test]
    fn reduce_truncates_average_toward_zero() {
        let stats = reduce_chunk(&[-1, -1, 1]);
        assert_eq!(stats.average, 0);
    }

    #[test]
    fn reduce_single_value_has_zero_rms() {
        let stats = reduce_chunk(&[7]);
        assert_eq!(stats.average, 7);
        assert_eq!(stats.root_mean_square, 0);
        assert_eq!(stats.highest_peak, 7);
        assert_eq!(stats.lowest_peak, 7);
    }
}
