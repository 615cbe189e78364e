//! # Zflow Core
//!
//! Core traits, types, and errors for incremental output-side compression.
//!
//! A compression stream sits between two capabilities:
//!
//! - a [`Sink`], an append-only byte buffer that can grow its spare
//!   capacity on demand, and
//! - a [`StreamCodec`], an incremental compressor that consumes raw bytes
//!   and writes compressed bytes into a caller-supplied region.
//!
//! The concrete stream lives in `zflow-stream`; concrete codecs live in
//! `zflow-deflate`.
//!
//! ## Example
//!
//! ```ignore
//! use zflow_core::{Flush, StreamCodec};
//! use zflow_deflate::DeflateEncoder;
//!
//! let mut codec = DeflateEncoder::new();
//! codec.begin()?;
//! let mut out = [0u8; 256];
//! let step = codec.step(b"hello", &mut out, Flush::Finish)?;
//! codec.end()?;
//! ```

pub mod error;
pub mod stats;
pub mod stream;
pub mod traits;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use stats::StreamStats;
pub use stream::{CodecStatus, Flush, Step, StreamConfig, StreamState};
pub use traits::{Sink, StreamCodec};
pub use types::{Algorithm, CompressionLevel, CompressionRatio, Format};

/// Initial spare capacity requested from the sink before each codec step.
pub const DEFAULT_BUFFER_SIZE_HINT: usize = 1024;
