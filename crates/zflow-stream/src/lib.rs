//! # Zflow Stream
//!
//! Streaming compression output for transport layers.
//!
//! [`CompressionStream`] feeds arbitrary byte chunks into an incremental
//! codec and accumulates the compressed result in a growable
//! [`StreamBuffer`], which the owner drains between calls.
//!
//! ## Features
//!
//! - **Amortized growth**: the spare capacity requested per codec step
//!   doubles whenever the codec fills it
//! - **Terminal states**: a failed or finished stream rejects further use
//! - **I/O Integration**: [`CompressWriter`] implements `std::io::Write`
//!
//! ## Example
//!
//! ```ignore
//! use zflow_deflate::DeflateEncoder;
//! use zflow_stream::{CompressionStream, StreamBuffer};
//!
//! let mut buffer = StreamBuffer::new();
//! let mut stream = CompressionStream::new(&mut buffer, DeflateEncoder::new())?;
//! stream.write(b"Hello, compression!")?;
//! stream.finish()?;
//! ```

mod buffer;
mod output;
mod writer;

pub use buffer::StreamBuffer;
pub use output::{BoxedCodec, CompressionStream};
pub use writer::CompressWriter;

pub use zflow_core::{Error, ErrorKind, Result, Sink, StreamCodec, StreamConfig, StreamState};
