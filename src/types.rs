//! Core types for the waveform statistics pipeline.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Stream parameters reported by a decoder after probing a source.
#[derive(Debug, Clone, Copy)]
pub struct SourceInfo {
    /// Number of interleaved channels per frame.
    pub channels: u32,
    /// Total frame count of the track.
    pub total_frames: u64,
    /// Frames per second (e.g. 44100.0).
    pub frame_rate: f64,
    /// Source sample bit depth; carried through for display scaling.
    pub bit_depth: u32,
}

/// Per-chunk summary statistics computed by one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkStats {
    pub average: i64,
    pub root_mean_square: i64,
    pub highest_peak: i64,
    pub lowest_peak: i64,
}

/// Summary statistics for one channel over a contiguous range of chunks.
///
/// The four sequences are parallel: entry `i` describes chunk
/// `start_chunk_offset + i` of the global chunk index space. Instances are
/// created zero-filled, written once per chunk in increasing order while
/// aggregation runs, and never mutated after the call returns.
#[derive(Debug, Clone, Serialize)]
pub struct AveragedSampleData {
    chunk_count: usize,
    start_chunk_offset: u32,
    bit_depth: u32,
    average: Vec<i64>,
    root_mean_square: Vec<i64>,
    highest_peak: Vec<i64>,
    lowest_peak: Vec<i64>,
}

impl AveragedSampleData {
    pub(crate) fn new(chunk_count: usize, start_chunk_offset: u32, bit_depth: u32) -> Self {
        Self {
            chunk_count,
            start_chunk_offset,
            bit_depth,
            average: vec![0; chunk_count],
            root_mean_square: vec![0; chunk_count],
            highest_peak: vec![0; chunk_count],
            lowest_peak: vec![0; chunk_count],
        }
    }

    /// The only mutator; called exactly once per chunk index, in order.
    pub(crate) fn set_chunk(&mut self, chunk: usize, stats: ChunkStats) {
        self.average[chunk] = stats.average;
        self.root_mean_square[chunk] = stats.root_mean_square;
        self.highest_peak[chunk] = stats.highest_peak;
        self.lowest_peak[chunk] = stats.lowest_peak;
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Index of the first covered chunk in the global chunk index space.
    pub fn start_chunk_offset(&self) -> u32 {
        self.start_chunk_offset
    }

    pub fn bit_depth(&self) -> u32 {
        self.bit_depth
    }

    /// Full-scale peak magnitude for the source bit depth, used by
    /// consumers for display scaling. Not computed from samples.
    pub fn max_peak(&self) -> i64 {
        1i64 << (self.bit_depth - 1)
    }

    pub fn average(&self) -> &[i64] {
        &self.average
    }

    pub fn root_mean_square(&self) -> &[i64] {
        &self.root_mean_square
    }

    pub fn highest_peak(&self) -> &[i64] {
        &self.highest_peak
    }

    pub fn lowest_peak(&self) -> &[i64] {
        &self.lowest_peak
    }

    pub fn stats(&self, chunk: usize) -> ChunkStats {
        ChunkStats {
            average: self.average[chunk],
            root_mean_square: self.root_mean_square[chunk],
            highest_peak: self.highest_peak[chunk],
            lowest_peak: self.lowest_peak[chunk],
        }
    }
}

/// Outcome of one aggregation call.
///
/// Cancellation is a first-class result, not an error: a superseded call
/// reports `Cancelled` and its partial state is discarded.
#[derive(Debug)]
pub enum Aggregation {
    /// One entry per channel, in channel order.
    Complete(Vec<AveragedSampleData>),
    Cancelled,
}

impl Aggregation {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Aggregation::Cancelled)
    }

    /// The per-channel data, or `None` if the call was cancelled.
    pub fn into_channels(self) -> Option<Vec<AveragedSampleData>> {
        match self {
            Aggregation::Complete(channels) => Some(channels),
            Aggregation::Cancelled => None,
        }
    }
}

/// Cooperative cancellation flag, polled once per frame by the aggregator.
///
/// Clones share the flag; an aggregation call holds a read-only view while
/// the owner may flip it from another thread at any time.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
