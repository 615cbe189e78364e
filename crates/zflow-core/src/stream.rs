//! Stream state, flush modes, and configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{CompressionLevel, Format};
use crate::DEFAULT_BUFFER_SIZE_HINT;

/// Flush modes for streaming compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flush {
    /// No flush - buffer data for optimal compression.
    #[default]
    None,

    /// Sync flush - emit all pending output, remain compressible.
    /// Use for: handing a decodable prefix to a transport.
    Sync,

    /// Full flush - emit all pending output, reset state.
    Full,

    /// Finish - complete stream with trailer.
    Finish,
}

/// Wrapper state of a compression stream.
///
/// Distinct from any codec status: a codec reporting end-of-stream is a
/// [`CodecStatus`], a wrapper that has been finalized is `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// Accepting writes.
    #[default]
    Ready,
    /// A codec step failed.
    Error,
    /// `finish` has run.
    Finished,
}

impl StreamState {
    /// Check if stream is in a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, StreamState::Finished | StreamState::Error)
    }

    /// Check if stream can accept more input.
    pub fn can_write(self) -> bool {
        self == StreamState::Ready
    }
}

/// Status reported by a single codec step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecStatus {
    /// Progress was made; more calls may produce more output.
    Ok,
    /// All input was consumed and the trailer has been written.
    StreamEnd,
    /// No progress was possible with the given input and output.
    BufError,
}

/// Outcome of one codec step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub status: CodecStatus,
    /// Input bytes consumed.
    pub consumed: usize,
    /// Output bytes written.
    pub produced: usize,
}

impl Step {
    /// Create a step outcome.
    pub fn new(status: CodecStatus, consumed: usize, produced: usize) -> Self {
        Step {
            status,
            consumed,
            produced,
        }
    }

    /// True if the step moved any bytes.
    pub fn made_progress(&self) -> bool {
        self.consumed > 0 || self.produced > 0
    }
}

/// Configuration for a compression stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Initial spare capacity requested from the sink (default: 1 KB).
    pub initial_buffer_size: usize,

    /// Compression level.
    pub level: CompressionLevel,

    /// Container format wrapped around the compressed stream.
    pub format: Format,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            initial_buffer_size: DEFAULT_BUFFER_SIZE_HINT,
            level: CompressionLevel::Default,
            format: Format::Zlib,
        }
    }
}

impl StreamConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression level.
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the container format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the initial buffer size hint.
    pub fn with_initial_buffer_size(mut self, size: usize) -> Self {
        self.initial_buffer_size = size;
        self
    }

    /// Reject values a stream cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.initial_buffer_size == 0 {
            return Err(Error::InvalidConfig(
                "initial_buffer_size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(StreamState::Ready.can_write());
        assert!(!StreamState::Ready.is_terminal());
        assert!(StreamState::Error.is_terminal());
        assert!(StreamState::Finished.is_terminal());
        assert!(!StreamState::Finished.can_write());
    }

    #[test]
    fn test_step_progress() {
        assert!(Step::new(CodecStatus::Ok, 1, 0).made_progress());
        assert!(!Step::new(CodecStatus::BufError, 0, 0).made_progress());
    }

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.initial_buffer_size, 1024);
        assert_eq!(config.format, Format::Zlib);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = StreamConfig::new().with_initial_buffer_size(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_config_from_json() {
        let config: StreamConfig =
            serde_json::from_str(r#"{"format":"Gzip","level":"Best"}"#).unwrap();
        assert_eq!(config.format, Format::Gzip);
        assert_eq!(config.level, CompressionLevel::Best);
        assert_eq!(config.initial_buffer_size, 1024);

        let roundtrip: StreamConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(roundtrip, config);
    }
}
