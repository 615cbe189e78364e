//! Incremental DEFLATE and Zlib encoder.

use flate2::{Compress, Compression, FlushCompress, Status};
use tracing::debug;
use zflow_core::{
    Algorithm, CodecStatus, CompressionLevel, Error, Flush, Format, Result, Step, StreamCodec,
};

/// Lowest DEFLATE level.
const MIN_LEVEL: i32 = 0;

/// Highest DEFLATE level.
const MAX_LEVEL: i32 = 9;

/// Lifecycle of an encoder's engine.
#[derive(Debug)]
enum Engine {
    Idle,
    Active(Box<Compress>),
    Ended,
}

impl Engine {
    fn name(&self) -> &'static str {
        match self {
            Engine::Idle => "idle",
            Engine::Active(_) => "active",
            Engine::Ended => "ended",
        }
    }
}

/// Streaming DEFLATE encoder, raw or zlib-wrapped.
///
/// The engine is created by [`StreamCodec::begin`] and released by
/// [`StreamCodec::end`]; stepping outside that window is an
/// [`Error::InvalidState`].
#[derive(Debug)]
pub struct DeflateEncoder {
    level: CompressionLevel,
    zlib_header: bool,
    engine: Engine,
    last_message: Option<String>,
}

impl DeflateEncoder {
    /// Create a zlib encoder with default level.
    pub fn new() -> Self {
        Self::with_level(CompressionLevel::Default)
    }

    /// Create a zlib encoder with compression level.
    pub fn with_level(level: CompressionLevel) -> Self {
        Self {
            level,
            zlib_header: true,
            engine: Engine::Idle,
            last_message: None,
        }
    }

    /// Create a raw DEFLATE encoder (no header or trailer).
    pub fn raw(level: CompressionLevel) -> Self {
        Self {
            zlib_header: false,
            ..Self::with_level(level)
        }
    }

    /// Get the configured compression level.
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Container format produced by this encoder.
    pub fn format(&self) -> Format {
        if self.zlib_header {
            Format::Zlib
        } else {
            Format::Deflate
        }
    }

    /// True between `begin` and `end`.
    pub fn is_active(&self) -> bool {
        matches!(self.engine, Engine::Active(_))
    }

    /// Total input bytes consumed since `begin`.
    pub fn total_in(&self) -> u64 {
        match &self.engine {
            Engine::Active(engine) => engine.total_in(),
            _ => 0,
        }
    }
}

impl Default for DeflateEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a level preset onto flate2's 0-9 scale.
pub(crate) fn compression_for(level: CompressionLevel) -> Result<Compression> {
    let numeric = level.to_level();
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&numeric) {
        return Err(Error::InvalidLevel {
            level: numeric,
            min: MIN_LEVEL,
            max: MAX_LEVEL,
        });
    }
    Ok(Compression::new(numeric as u32))
}

fn flush_mode(flush: Flush) -> FlushCompress {
    match flush {
        Flush::None => FlushCompress::None,
        Flush::Sync => FlushCompress::Sync,
        Flush::Full => FlushCompress::Full,
        Flush::Finish => FlushCompress::Finish,
    }
}

impl StreamCodec for DeflateEncoder {
    fn algorithm(&self) -> Algorithm {
        self.format().algorithm()
    }

    fn begin(&mut self) -> Result<()> {
        if !matches!(self.engine, Engine::Idle) {
            return Err(Error::InvalidState {
                expected: "idle",
                actual: self.engine.name(),
            });
        }

        let compression = compression_for(self.level)?;
        debug!(
            algorithm = self.algorithm().name(),
            level = compression.level(),
            "deflate encoder started"
        );
        self.engine = Engine::Active(Box::new(Compress::new(compression, self.zlib_header)));
        self.last_message = None;
        Ok(())
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step> {
        let algorithm = self.algorithm().name();
        let engine = match &mut self.engine {
            Engine::Active(engine) => engine,
            other => {
                return Err(Error::InvalidState {
                    expected: "active",
                    actual: other.name(),
                })
            }
        };

        let before_in = engine.total_in();
        let before_out = engine.total_out();
        let status = match engine.compress(input, output, flush_mode(flush)) {
            Ok(status) => status,
            Err(err) => {
                let message = err.message().unwrap_or("stream error").to_string();
                self.last_message = Some(message.clone());
                return Err(Error::codec_step(algorithm, message));
            }
        };
        let consumed = (engine.total_in() - before_in) as usize;
        let produced = (engine.total_out() - before_out) as usize;

        let status = match status {
            Status::Ok => CodecStatus::Ok,
            Status::StreamEnd => CodecStatus::StreamEnd,
            Status::BufError => CodecStatus::BufError,
        };
        Ok(Step::new(status, consumed, produced))
    }

    fn end(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.engine, Engine::Ended) {
            // Dropping the engine frees its state.
            Engine::Active(_) => Ok(()),
            previous => {
                let actual = previous.name();
                self.engine = previous;
                Err(Error::InvalidState {
                    expected: "active",
                    actual,
                })
            }
        }
    }

    fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }
}
