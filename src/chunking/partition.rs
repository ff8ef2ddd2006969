use crate::error::{Result, WaveformError};

/// Exact partition of `total_frames` frames into `max_chunks` contiguous
/// chunks with no gaps, overlaps, or leftover frames.
///
/// The remainder of `total_frames / max_chunks` is absorbed by the first
/// `total_frames % max_chunks` chunks ("big" chunks), each one frame larger
/// than the rest. Callers normally keep `max_chunks <= total_frames`; when
/// they do not, trailing chunks are empty and report size 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPartition {
    total_frames: u64,
    max_chunks: u32,
    frames_per_chunk: u64,
    big_chunks: u64,
}

impl ChunkPartition {
    pub fn new(max_chunks: u32, total_frames: u64) -> Result<Self> {
        if max_chunks == 0 {
            return Err(WaveformError::invalid_partition(
                "chunk count must be positive",
            ));
        }
        Ok(Self {
            total_frames,
            max_chunks,
            frames_per_chunk: total_frames / max_chunks as u64,
            big_chunks: total_frames % max_chunks as u64,
        })
    }

    pub fn max_chunks(&self) -> u32 {
        self.max_chunks
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Base chunk size; big chunks hold one frame more.
    pub fn frames_per_chunk(&self) -> u64 {
        self.frames_per_chunk
    }

    /// Number of chunks holding `frames_per_chunk() + 1` frames. Big chunks
    /// occupy the lowest indices, `[0, big_chunk_count())`.
    pub fn big_chunk_count(&self) -> u64 {
        self.big_chunks
    }

    /// Frame count of the given chunk. Indices past `max_chunks` are empty.
    pub fn chunk_size(&self, chunk: u32) -> u64 {
        if (chunk as u64) < self.big_chunks {
            self.frames_per_chunk + 1
        } else if chunk < self.max_chunks {
            self.frames_per_chunk
        } else {
            0
        }
    }

    /// Absolute index of the first frame of the given chunk.
    pub fn start_frame(&self, chunk: u32) -> u64 {
        let chunk = chunk as u64;
        if chunk < self.big_chunks {
            chunk * (self.frames_per_chunk + 1)
        } else {
            chunk * self.frames_per_chunk + self.big_chunks
        }
    }

    /// Chunk containing the given absolute frame; the exact left-inverse of
    /// `start_frame` for every frame in `[0, total_frames)`. Frames past
    /// the end saturate to the last chunk, which suits hit-testing callers.
    pub fn chunk_at(&self, frame: u64) -> u32 {
        let big_region = self.big_chunks * (self.frames_per_chunk + 1);
        let chunk = if frame < big_region {
            frame / (self.frames_per_chunk + 1)
        } else if self.frames_per_chunk == 0 {
            // All frames live in the big region when chunks outnumber
            // frames, so this branch only sees out-of-range queries.
            self.max_chunks as u64
        } else {
            self.big_chunks + (frame - big_region) / self.frames_per_chunk
        };
        chunk.min(self.max_chunks as u64 - 1) as u32
    }
}
