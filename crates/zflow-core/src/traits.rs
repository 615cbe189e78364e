//! Capability traits consumed by a compression stream.
//!
//! ```text
//! caller bytes ──► StreamCodec::step ──► Sink::writable_region
//!                                          │
//!                                          ▼
//!                                     Sink::commit
//! ```

use crate::error::Result;
use crate::stream::{Flush, Step};
use crate::types::Algorithm;

/// Append-only growable byte buffer that compressed output lands in.
///
/// The owner may read and drain committed bytes between stream calls;
/// while a call is in progress the stream is the only writer.
pub trait Sink {
    /// Guarantee at least `n` spare bytes after the write cursor.
    fn ensure_writable(&mut self, n: usize);

    /// Mutable view of the spare region after the write cursor.
    fn writable_region(&mut self) -> &mut [u8];

    /// Advance the content length by `n` bytes of the spare region.
    fn commit(&mut self, n: usize);

    /// Number of spare bytes after the write cursor.
    fn writable_len(&mut self) -> usize {
        self.writable_region().len()
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn ensure_writable(&mut self, n: usize) {
        (**self).ensure_writable(n)
    }

    fn writable_region(&mut self) -> &mut [u8] {
        (**self).writable_region()
    }

    fn commit(&mut self, n: usize) {
        (**self).commit(n)
    }

    fn writable_len(&mut self) -> usize {
        (**self).writable_len()
    }
}

/// Incremental compressor with an explicit begin/end lifecycle.
///
/// `step` is only valid between a successful `begin` and `end`; `end`
/// is called at most once.
pub trait StreamCodec {
    /// Get the compression algorithm.
    fn algorithm(&self) -> Algorithm;

    /// Begin a new compression stream.
    fn begin(&mut self) -> Result<()>;

    /// Compress as much of `input` into `output` as possible.
    ///
    /// # Arguments
    /// * `input` - Data chunk to compress
    /// * `output` - Region for compressed output
    /// * `flush` - Flush mode
    ///
    /// # Returns
    /// Status plus bytes consumed from `input` and written to `output`.
    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step>;

    /// Release the codec state.
    fn end(&mut self) -> Result<()>;

    /// Human-readable message from the last failure, if any.
    fn last_message(&self) -> Option<&str> {
        None
    }
}

impl<C: StreamCodec + ?Sized> StreamCodec for Box<C> {
    fn algorithm(&self) -> Algorithm {
        (**self).algorithm()
    }

    fn begin(&mut self) -> Result<()> {
        (**self).begin()
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step> {
        (**self).step(input, output, flush)
    }

    fn end(&mut self) -> Result<()> {
        (**self).end()
    }

    fn last_message(&self) -> Option<&str> {
        (**self).last_message()
    }
}
