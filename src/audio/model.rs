use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::chunking::{self, ChunkPartition};
use crate::error::Result;
use crate::types::{Aggregation, CancelToken, SourceInfo};

use super::decoder::AudioFileSource;
use super::SampleSource;

/// Probed facade over one audio file: duration math, the pure chunk query
/// API used for hit-testing, and the aggregation entry point.
///
/// The file is probed once at open. Each aggregation call reopens the
/// stream and owns its state in full, so a newer call superseding a stale
/// one needs no coordination beyond the cancellation tokens.
pub struct AudioModel {
    path: PathBuf,
    info: SourceInfo,
    ms_per_frame: f64,
    frames_per_ms: f64,
}

impl AudioModel {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let info = AudioFileSource::open(&path)?.info();
        Ok(Self {
            ms_per_frame: 1000.0 / info.frame_rate,
            frames_per_ms: info.frame_rate / 1000.0,
            path,
            info,
        })
    }

    pub fn info(&self) -> SourceInfo {
        self.info
    }

    pub fn total_frames(&self) -> u64 {
        self.info.total_frames
    }

    pub fn duration_ms(&self) -> f64 {
        self.info.total_frames as f64 * self.ms_per_frame
    }

    pub fn frame_to_ms(&self, frame: u64) -> f64 {
        frame as f64 * self.ms_per_frame
    }

    pub fn ms_to_frame(&self, ms: f64) -> u64 {
        (self.frames_per_ms * ms) as u64
    }

    /// Absolute index of the first frame of `chunk` in a `max_chunks`-wide
    /// partition of this track.
    pub fn start_frame(&self, max_chunks: u32, chunk: u32) -> Result<u64> {
        Ok(ChunkPartition::new(max_chunks, self.info.total_frames)?.start_frame(chunk))
    }

    /// Chunk containing `frame` in a `max_chunks`-wide partition of this
    /// track.
    pub fn chunk_at(&self, max_chunks: u32, frame: u64) -> Result<u32> {
        Ok(ChunkPartition::new(max_chunks, self.info.total_frames)?.chunk_at(frame))
    }

    /// Compute per-channel statistics for the chunks `chunk_range`,
    /// decoding only the frames that cover them.
    pub fn averaged_sample_data(
        &self,
        max_chunks: u32,
        chunk_range: RangeInclusive<u32>,
        cancel: &CancelToken,
    ) -> Result<Aggregation> {
        let mut source = AudioFileSource::open(&self.path)?;
        chunking::averaged_sample_data(&mut source, max_chunks, chunk_range, cancel)
    }
}
