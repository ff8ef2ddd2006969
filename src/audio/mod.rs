pub mod decoder;
pub mod model;

use crate::error::Result;
use crate::types::SourceInfo;

/// Forward-only supplier of interleaved integer sample frames.
///
/// Any concrete decoder sits behind this seam: it probes the stream once
/// (`info`), positions itself with a frame-exact skip, then yields one
/// frame of per-channel peak values at a time. Frames arrive in strictly
/// increasing order; there is no rewind.
pub trait SampleSource {
    fn info(&self) -> SourceInfo;

    /// Advance past exactly `frames` frames without surfacing them. The
    /// skip must be frame-exact; chunk alignment depends on it.
    fn skip_frames(&mut self, frames: u64) -> Result<()>;

    /// Fill `out` (one value per channel) with the next frame. Returns
    /// `Ok(false)` once the stream is exhausted.
    fn read_frame(&mut self, out: &mut [i64]) -> Result<bool>;
}
