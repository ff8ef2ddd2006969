use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wavescan::{Aggregation, AudioModel, AveragedSampleData, CancelToken};

/// Wavescan - chunked waveform statistics for audio files
///
/// Splits a track into a fixed number of chunks and reports, per chunk and
/// per channel, the average peak, deviation RMS, and highest/lowest peak.
#[derive(Parser, Debug)]
#[command(name = "wavescan")]
#[command(version)]
#[command(about = "Chunked waveform statistics for audio files", long_about = None)]
struct Args {
    /// Input audio file (WAV, FLAC, MP3, OGG, ...)
    #[arg(value_name = "INPUT")]
    input_file: PathBuf,

    /// Number of chunks to split the track into
    #[arg(long, default_value_t = 64)]
    chunks: u32,

    /// First chunk of the requested range (defaults to 0)
    #[arg(long, value_name = "CHUNK")]
    from: Option<u32>,

    /// Last chunk of the requested range (defaults to chunks - 1)
    #[arg(long, value_name = "CHUNK")]
    to: Option<u32>,

    /// Emit per-channel statistics as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Validate CLI arguments
    fn validate(&self) -> Result<()> {
        if !self.input_file.exists() {
            anyhow::bail!("Input file does not exist: {:?}", self.input_file);
        }
        if !self.input_file.is_file() {
            anyhow::bail!("Input path is not a file: {:?}", self.input_file);
        }
        ensure!(self.chunks > 0, "Chunk count must be positive");

        let range = self.chunk_range();
        ensure!(
            range.start() <= range.end(),
            "Range start ({}) must not exceed range end ({})",
            range.start(),
            range.end()
        );
        ensure!(
            *range.end() < self.chunks,
            "Range end ({}) must be below the chunk count ({})",
            range.end(),
            self.chunks
        );
        Ok(())
    }

    fn chunk_range(&self) -> RangeInclusive<u32> {
        self.from.unwrap_or(0)..=self.to.unwrap_or(self.chunks - 1)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    args.validate()
        .context("Failed to validate command-line arguments")?;

    let model = AudioModel::open(&args.input_file)
        .with_context(|| format!("Failed to open audio file {:?}", args.input_file))?;
    let info = model.info();
    if !args.json {
        println!("Input: {:?}", args.input_file);
        println!(
            "{} channel(s), {} frames at {} Hz, {}-bit ({:.3} s)",
            info.channels,
            info.total_frames,
            info.frame_rate,
            info.bit_depth,
            model.duration_ms() / 1000.0
        );
    }

    let cancel = CancelToken::new();
    let outcome = model
        .averaged_sample_data(args.chunks, args.chunk_range(), &cancel)
        .context("Failed to compute waveform statistics")?;
    let channels = match outcome {
        Aggregation::Complete(channels) => channels,
        Aggregation::Cancelled => {
            println!("Aggregation cancelled");
            return Ok(());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&channels)?);
    } else {
        print_channels(&channels);
    }
    Ok(())
}

fn print_channels(channels: &[AveragedSampleData]) {
    for (index, data) in channels.iter().enumerate() {
        println!(
            "\nChannel {} (chunks {}..{}, peak scale {}):",
            index,
            data.start_chunk_offset(),
            data.start_chunk_offset() as usize + data.chunk_count(),
            data.max_peak()
        );
        println!("{:>8} {:>12} {:>12} {:>12} {:>12}", "chunk", "average", "rms", "high", "low");
        for chunk in 0..data.chunk_count() {
            let stats = data.stats(chunk);
            println!(
                "{:>8} {:>12} {:>12} {:>12} {:>12}",
                data.start_chunk_offset() as usize + chunk,
                stats.average,
                stats.root_mean_square,
                stats.highest_peak,
                stats.lowest_peak
            );
        }
    }
}
