//! Error types for streaming compression.

use std::sync::Arc;

use thiserror::Error;

use crate::stream::StreamState;

/// Result type alias for compression operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Compression error types.
///
/// Cloneable so a stream can retain its failure while also returning it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The codec could not be initialized.
    #[error("{algorithm} init failed: {message}")]
    CodecInit {
        algorithm: &'static str,
        message: String,
    },

    /// A codec step failed. The codec state is unusable afterwards.
    #[error("{algorithm} step failed: {message}")]
    CodecStep {
        algorithm: &'static str,
        message: String,
    },

    /// Releasing the codec reported a failure.
    #[error("{algorithm} end failed: {message}")]
    CodecEnd {
        algorithm: &'static str,
        message: String,
    },

    /// Operation attempted on a stream that already failed or finished.
    #[error("stream not ready: state is {state:?}")]
    NotReady { state: StreamState },

    /// Invalid compression level specified.
    #[error("invalid compression level {level}: must be in range [{min}, {max}]")]
    InvalidLevel { level: i32, min: i32, max: i32 },

    /// Rejected configuration value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Codec used outside its begin/end window.
    #[error("invalid state: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    /// I/O error from a downstream writer.
    #[error("I/O error: {0}")]
    Io(#[source] Arc<std::io::Error>),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Construction-time codec failure.
    CodecInitFailure,
    /// Non-recoverable failure while stepping the codec.
    CodecStepFailure,
    /// Failure while releasing the codec.
    CodecEndFailure,
    /// The stream is in `Error` or `Finished`.
    StreamNotReady,
    /// Bad configuration.
    Config,
    /// Downstream I/O.
    Io,
}

impl Error {
    /// Create a codec init error.
    pub fn codec_init(algorithm: &'static str, message: impl Into<String>) -> Self {
        Error::CodecInit {
            algorithm,
            message: message.into(),
        }
    }

    /// Create a codec step error.
    pub fn codec_step(algorithm: &'static str, message: impl Into<String>) -> Self {
        Error::CodecStep {
            algorithm,
            message: message.into(),
        }
    }

    /// Create a codec end error.
    pub fn codec_end(algorithm: &'static str, message: impl Into<String>) -> Self {
        Error::CodecEnd {
            algorithm,
            message: message.into(),
        }
    }

    /// Create a not-ready error for the given state.
    pub fn not_ready(state: StreamState) -> Self {
        Error::NotReady { state }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            // A bad level is only ever detected while bringing a codec up.
            Error::CodecInit { .. } | Error::InvalidLevel { .. } => ErrorKind::CodecInitFailure,
            Error::CodecStep { .. } | Error::InvalidState { .. } => ErrorKind::CodecStepFailure,
            Error::CodecEnd { .. } => ErrorKind::CodecEndFailure,
            Error::NotReady { .. } => ErrorKind::StreamNotReady,
            Error::InvalidConfig(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Check if error is recoverable (the stream may keep being used).
    ///
    /// Codec failures never are: the codec state is considered corrupted.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NotReady { .. })
    }

    /// Get error category for logs and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Error::CodecInit { .. } => "codec_init",
            Error::CodecStep { .. } => "codec_step",
            Error::CodecEnd { .. } => "codec_end",
            Error::NotReady { .. } => "not_ready",
            Error::InvalidLevel { .. } => "invalid_level",
            Error::InvalidConfig(_) => "invalid_config",
            Error::InvalidState { .. } => "invalid_state",
            Error::Io(_) => "io_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_step_display() {
        let err = Error::codec_step("zlib", "stream error");
        let msg = err.to_string();
        assert!(msg.contains("zlib"));
        assert!(msg.contains("stream error"));
        assert_eq!(err.kind(), ErrorKind::CodecStepFailure);
    }

    #[test]
    fn test_not_ready_display() {
        let err = Error::not_ready(StreamState::Finished);
        assert!(err.to_string().contains("Finished"));
        assert_eq!(err.kind(), ErrorKind::StreamNotReady);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invalid_level_is_init_failure() {
        let err = Error::InvalidLevel {
            level: 42,
            min: 0,
            max: 9,
        };
        assert_eq!(err.kind(), ErrorKind::CodecInitFailure);
        assert_eq!(err.category(), "invalid_level");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_io_from() {
        let err: Error = std::io::Error::other("broken pipe").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("broken pipe"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
