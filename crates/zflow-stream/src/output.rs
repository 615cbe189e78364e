//! Compression output stream.
//!
//! Drains caller bytes through a [`StreamCodec`] into a [`Sink`], growing
//! the spare capacity it requests from the sink as output demands.
//!
//! ```text
//! Ready --write ok--------------------> Ready
//! Ready --write codec error-----------> Error     (terminal)
//! Ready --finish ok or flush error----> Finished  (terminal)
//! Error | Finished --write | finish---> rejected, no side effect
//! ```

use tracing::{debug, warn};
use zflow_core::{
    Algorithm, CodecStatus, Error, Flush, Result, Sink, Step, StreamCodec, StreamConfig,
    StreamState, StreamStats, DEFAULT_BUFFER_SIZE_HINT,
};
use zflow_deflate::encoder_for;

/// Codec type built from a [`StreamConfig`].
pub type BoxedCodec = Box<dyn StreamCodec + Send>;

/// Incremental compressor writing into a caller-owned sink.
///
/// Pass `&mut buffer` to keep ownership of the sink with the caller, or an
/// owned sink and reach it through [`sink_mut`](Self::sink_mut).
///
/// Dropping a stream that is still `Ready` runs [`finish`](Self::finish)
/// and discards its error.
pub struct CompressionStream<C: StreamCodec, S: Sink> {
    sink: S,
    codec: Option<C>,
    algorithm: Algorithm,
    state: StreamState,
    buffer_size_hint: usize,
    last_error: Option<Error>,
    end_error: Option<Error>,
    stats: StreamStats,
}

impl<S: Sink> CompressionStream<BoxedCodec, S> {
    /// Create a stream whose codec is chosen by `config`.
    pub fn with_config(sink: S, config: &StreamConfig) -> Result<Self> {
        config.validate()?;
        let codec = encoder_for(config.format, config.level);
        Self::with_initial_buffer_size(sink, codec, config.initial_buffer_size)
    }
}

impl<C: StreamCodec, S: Sink> CompressionStream<C, S> {
    /// Create a stream bound to `sink`, beginning `codec`.
    pub fn new(sink: S, codec: C) -> Result<Self> {
        Self::with_initial_buffer_size(sink, codec, DEFAULT_BUFFER_SIZE_HINT)
    }

    /// Create a stream with a custom starting buffer size hint.
    pub fn with_initial_buffer_size(sink: S, mut codec: C, initial: usize) -> Result<Self> {
        if initial == 0 {
            return Err(Error::InvalidConfig(
                "initial buffer size must be non-zero".into(),
            ));
        }

        let algorithm = codec.algorithm();
        codec.begin().map_err(|err| match err {
            Error::CodecInit { .. } | Error::InvalidLevel { .. } => err,
            other => Error::codec_init(algorithm.name(), other.to_string()),
        })?;

        Ok(Self {
            sink,
            codec: Some(codec),
            algorithm,
            state: StreamState::Ready,
            buffer_size_hint: initial,
            last_error: None,
            end_error: None,
            stats: StreamStats::new(),
        })
    }

    /// Compress `data` into the sink.
    ///
    /// Fails without side effects unless the stream is `Ready`. A codec
    /// failure moves the stream to `Error`; bytes already committed stay.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_ready()?;
        // A no-flush step with nothing to consume cannot make progress.
        if data.is_empty() {
            return Ok(());
        }

        let mut offset = 0;
        while offset < data.len() {
            let step = match self.compress_step(&data[offset..], Flush::None) {
                Ok(step) => step,
                Err(err) => return Err(self.fail(err)),
            };
            if let Err(err) = self.check_progress(&step) {
                return Err(self.fail(err));
            }
            offset += step.consumed;
        }
        Ok(())
    }

    /// Emit all pending output so the sink holds a decodable prefix.
    ///
    /// The stream stays `Ready` and compression may continue afterwards.
    pub fn flush(&mut self) -> Result<()> {
        self.ensure_ready()?;

        loop {
            let step = match self.compress_step(&[], Flush::Sync) {
                Ok(step) => step,
                Err(err) => return Err(self.fail(err)),
            };
            // Spare room left over means the codec had nothing more to give.
            if step.status == CodecStatus::BufError || self.sink.writable_len() > 0 {
                break;
            }
        }
        Ok(())
    }

    /// Write the codec trailer and release the codec.
    ///
    /// The stream is `Finished` afterwards whatever the outcome. A flush
    /// failure is returned in preference to a release failure; the release
    /// outcome is always available from [`end_error`](Self::end_error).
    pub fn finish(&mut self) -> Result<()> {
        self.ensure_ready()?;

        let flushed = loop {
            match self.compress_step(&[], Flush::Finish) {
                Ok(step) if step.status == CodecStatus::StreamEnd => break Ok(()),
                Ok(step) => {
                    if let Err(err) = self.check_progress(&step) {
                        break Err(err);
                    }
                }
                Err(err) => break Err(err),
            }
        };

        // Taking the codec out guarantees `end` runs at most once.
        let ended = match self.codec.take() {
            Some(mut codec) => codec.end(),
            None => Ok(()),
        };
        self.state = StreamState::Finished;

        if let Err(err) = &ended {
            warn!(
                algorithm = self.algorithm.name(),
                error = %err,
                "codec release failed"
            );
            self.end_error = Some(err.clone());
        }

        match (flushed, ended) {
            (Ok(()), Ok(())) => {
                debug!(
                    algorithm = self.algorithm.name(),
                    stats = %self.stats.summary(),
                    "compression stream finished"
                );
                Ok(())
            }
            (Err(err), _) => {
                warn!(
                    algorithm = self.algorithm.name(),
                    error = %err,
                    "compression stream finish failed"
                );
                Err(err)
            }
            (Ok(()), Err(err)) => Err(err),
        }
    }

    /// Current wrapper state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// True while writes are accepted.
    pub fn is_ready(&self) -> bool {
        self.state.can_write()
    }

    /// Algorithm of the bound codec.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The failure that moved the stream to `Error`, if any.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Failure reported while releasing the codec during `finish`, if any.
    pub fn end_error(&self) -> Option<&Error> {
        self.end_error.as_ref()
    }

    /// Diagnostic text the codec kept from its last failure, while it is
    /// still bound to the stream.
    pub fn codec_message(&self) -> Option<&str> {
        self.codec.as_ref().and_then(|codec| codec.last_message())
    }

    /// Spare capacity requested from the sink before each codec step.
    pub fn buffer_size_hint(&self) -> usize {
        self.buffer_size_hint
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Get a reference to the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the sink, e.g. to drain it between calls.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.state.can_write() {
            Ok(())
        } else {
            Err(Error::not_ready(self.state))
        }
    }

    /// One codec step into the sink's spare region.
    fn compress_step(&mut self, input: &[u8], flush: Flush) -> Result<Step> {
        let codec = self.codec.as_mut().ok_or(Error::InvalidState {
            expected: "active",
            actual: "ended",
        })?;

        self.sink.ensure_writable(self.buffer_size_hint);
        let step = codec.step(input, self.sink.writable_region(), flush)?;
        self.sink.commit(step.produced);
        self.stats.record_step(step.consumed, step.produced);

        if self.sink.writable_len() == 0 {
            self.buffer_size_hint = self.buffer_size_hint.saturating_mul(2);
            self.stats.record_growth();
            debug!(
                algorithm = self.algorithm.name(),
                hint = self.buffer_size_hint,
                "output region exhausted, doubling buffer size hint"
            );
        }
        Ok(step)
    }

    fn check_progress(&self, step: &Step) -> Result<()> {
        if step.status == CodecStatus::BufError && !step.made_progress() {
            return Err(Error::codec_step(
                self.algorithm.name(),
                "no progress possible",
            ));
        }
        Ok(())
    }

    /// Move to `Error`, retaining `err`.
    fn fail(&mut self, err: Error) -> Error {
        warn!(
            algorithm = self.algorithm.name(),
            category = err.category(),
            codec_message = ?self.codec_message(),
            error = %err,
            "compression stream failed"
        );
        self.state = StreamState::Error;
        self.last_error = Some(err.clone());
        err
    }
}

impl<C: StreamCodec, S: Sink> Drop for CompressionStream<C, S> {
    fn drop(&mut self) {
        if self.state.can_write() {
            if let Err(err) = self.finish() {
                warn!(error = %err, "finish on drop failed");
            }
        }
    }
}

impl<C: StreamCodec, S: Sink> std::fmt::Debug for CompressionStream<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressionStream")
            .field("algorithm", &self.algorithm)
            .field("state", &self.state)
            .field("buffer_size_hint", &self.buffer_size_hint)
            .field("last_error", &self.last_error)
            .field("stats", &self.stats)
            .finish()
    }
}
