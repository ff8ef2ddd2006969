use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::{Result, WaveformError};
use crate::types::SourceInfo;

use super::SampleSource;

/// Assumed when the codec does not report a sample size.
const DEFAULT_BIT_DEPTH: u32 = 16;

/// Symphonia-backed `SampleSource` over an audio file.
///
/// Decoded samples surface as interleaved `i64` peak values scaled to the
/// source bit depth, so magnitudes reflect loudness at the original
/// resolution. Reading is strictly forward; positioning happens through
/// `skip_frames` only.
pub struct AudioFileSource {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    info: SourceInfo,
    scale: f32,
    /// Interleaved peaks decoded from the current packet. Packets carry
    /// whole frames, so a frame never straddles a refill.
    pending: Vec<i64>,
    cursor: usize,
}

impl AudioFileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (mut source, reported) = Self::probe_file(path)?;
        if let Some(frames) = reported {
            source.info.total_frames = frames;
            return Ok(source);
        }
        // Containers that do not report a frame count get a counting pass
        // over the whole stream, then a fresh reader.
        debug!(path = %path.display(), "no frame count reported; counting by decoding");
        let mut counted = 0u64;
        let mut frame = vec![0i64; source.info.channels as usize];
        while source.read_frame(&mut frame)? {
            counted += 1;
        }
        let (mut fresh, _) = Self::probe_file(path)?;
        fresh.info.total_frames = counted;
        Ok(fresh)
    }

    fn probe_file(path: &Path) -> Result<(Self, Option<u64>)> {
        let file = File::open(path).map_err(WaveformError::source)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(WaveformError::source)?;
        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| WaveformError::unsupported("no audio track in source"))?;
        let track_id = track.id;
        let params = track.codec_params.clone();

        let sample_rate = params
            .sample_rate
            .filter(|&rate| rate > 0)
            .ok_or_else(|| WaveformError::unsupported("sample rate not reported"))?;
        let channels = params
            .channels
            .map(|c| c.count())
            .filter(|&count| count > 0)
            .ok_or_else(|| WaveformError::unsupported("channel layout not reported"))?;
        let bit_depth = params.bits_per_sample.unwrap_or(DEFAULT_BIT_DEPTH);

        let decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(WaveformError::source)?;

        let info = SourceInfo {
            channels: channels as u32,
            total_frames: 0,
            frame_rate: sample_rate as f64,
            bit_depth,
        };
        let source = Self {
            format,
            decoder,
            track_id,
            info,
            scale: (1u64 << (bit_depth - 1)) as f32,
            pending: Vec::new(),
            cursor: 0,
        };
        Ok((source, params.n_frames))
    }

    /// Decode packets until interleaved samples are available again.
    /// `Ok(false)` means the stream ended.
    fn refill(&mut self) -> Result<bool> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(err))
                    if err.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(false);
                }
                Err(err) => return Err(WaveformError::source(err)),
            };
            if packet.track_id() != self.track_id {
                continue;
            }
            let decoded = self.decoder.decode(&packet).map_err(WaveformError::source)?;
            if decoded.frames() == 0 {
                continue;
            }
            let mut samples = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
            samples.copy_interleaved_ref(decoded);
            self.pending.clear();
            self.cursor = 0;
            let scale = self.scale;
            self.pending
                .extend(samples.samples().iter().map(|&s| (s * scale) as i64));
            return Ok(true);
        }
    }
}

impl SampleSource for AudioFileSource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn skip_frames(&mut self, frames: u64) -> Result<()> {
        let mut remaining = frames.saturating_mul(self.info.channels as u64);
        while remaining > 0 {
            let available = (self.pending.len() - self.cursor) as u64;
            if available == 0 {
                if !self.refill()? {
                    // Shorter stream than planned; read_frame will report
                    // exhaustion to the caller.
                    return Ok(());
                }
                continue;
            }
            let take = available.min(remaining);
            self.cursor += take as usize;
            remaining -= take;
        }
        Ok(())
    }

    fn read_frame(&mut self, out: &mut [i64]) -> Result<bool> {
        if self.cursor == self.pending.len() && !self.refill()? {
            return Ok(false);
        }
        let end = self.cursor + out.len();
        out.copy_from_slice(&self.pending[self.cursor..end]);
        self.cursor = end;
        Ok(true)
    }
}
