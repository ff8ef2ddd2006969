//! Chunked waveform statistics for audio files.
//!
//! Summarizes a decoded sample stream into a fixed number of chunks, each
//! carrying four statistics per channel: average, deviation RMS, highest
//! and lowest peak. Callers may request any sub-range of chunks; only the
//! frames covering that range are decoded, and the computation can be
//! cancelled between any two frames.

pub mod audio;
pub mod chunking;
pub mod error;
pub mod types;

pub use audio::decoder::AudioFileSource;
pub use audio::model::AudioModel;
pub use audio::SampleSource;
pub use chunking::{averaged_sample_data, ChunkPartition, ReadPlan};
pub use error::{Result, WaveformError};
pub use types::{Aggregation, AveragedSampleData, CancelToken, ChunkStats, SourceInfo};
