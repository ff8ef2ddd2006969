use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Convenient alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, WaveformError>;

/// Errors surfaced by the waveform engine.
///
/// Cancellation is deliberately not represented here: a cancelled
/// aggregation is a normal outcome (see `Aggregation::Cancelled`), not a
/// failure.
#[derive(Debug)]
pub enum WaveformError {
    /// Partition parameters cannot describe a valid chunk layout:
    /// zero chunk count, or a requested chunk range outside the partition.
    InvalidPartition(String),
    /// The source was opened but cannot be used (no audio track, missing
    /// sample rate).
    UnsupportedSource(String),
    /// The upstream decoder failed while opening or producing samples.
    /// Propagated unchanged; never retried here.
    Source(Box<dyn Error + Send + Sync>),
}

impl WaveformError {
    pub(crate) fn invalid_partition(message: impl Into<String>) -> Self {
        WaveformError::InvalidPartition(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        WaveformError::UnsupportedSource(message.into())
    }

    pub(crate) fn source(err: impl Error + Send + Sync + 'static) -> Self {
        WaveformError::Source(Box::new(err))
    }
}

impl Display for WaveformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WaveformError::InvalidPartition(msg) => write!(f, "invalid partition: {}", msg),
            WaveformError::UnsupportedSource(msg) => write!(f, "unsupported source: {}", msg),
            WaveformError::Source(err) => write!(f, "source failure: {}", err),
        }
    }
}

impl Error for WaveformError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WaveformError::Source(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
