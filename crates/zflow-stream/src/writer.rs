//! Write adapter for streaming compression.

use std::io::{self, Write};

use tracing::warn;
use zflow_core::{Error, StreamCodec};

use crate::{CompressionStream, StreamBuffer};

/// A writer that compresses data before writing to the inner writer.
///
/// Compressed bytes are staged in a [`StreamBuffer`] and drained to the
/// inner writer after every call.
pub struct CompressWriter<W: Write, C: StreamCodec> {
    inner: Option<W>,
    stream: CompressionStream<C, StreamBuffer>,
}

impl<W: Write, C: StreamCodec> CompressWriter<W, C> {
    /// Create a new compressing writer.
    pub fn new(inner: W, codec: C) -> io::Result<Self> {
        let stream = CompressionStream::new(StreamBuffer::new(), codec).map_err(to_io)?;
        Ok(Self {
            inner: Some(inner),
            stream,
        })
    }

    /// Get a reference to the inner writer.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    /// Get a mutable reference to the inner writer.
    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.inner.as_mut()
    }

    /// Get a reference to the compression stream.
    pub fn stream(&self) -> &CompressionStream<C, StreamBuffer> {
        &self.stream
    }

    /// Finish compression and flush all remaining data.
    pub fn finish(mut self) -> io::Result<W> {
        self.do_finish()?;
        self.inner
            .take()
            .ok_or_else(|| io::Error::other("writer already finished"))
    }

    fn do_finish(&mut self) -> io::Result<()> {
        if self.stream.is_ready() {
            self.stream.finish().map_err(to_io)?;
        }
        self.drain()
    }

    /// Move staged compressed bytes to the inner writer.
    ///
    /// Bytes accepted by the inner writer are consumed as they go, so a
    /// failed drain leaves only the unsent suffix staged.
    fn drain(&mut self) -> io::Result<()> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(());
        };
        let staged = self.stream.sink_mut();
        while !staged.is_empty() {
            match inner.write(staged.readable()) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => staged.consume(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

fn to_io(err: Error) -> io::Error {
    match err {
        Error::Io(source) => io::Error::new(source.kind(), source.to_string()),
        other => io::Error::other(other),
    }
}

impl<W: Write, C: StreamCodec> Write for CompressWriter<W, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.drain()?;
        self.stream.write(buf).map_err(to_io)?;
        // `buf` is already compressed; a drain error stays staged and
        // surfaces on the next call.
        if let Err(err) = self.drain() {
            if err.kind() != io::ErrorKind::WouldBlock {
                warn!(error = %err, "deferred drain of compressed output");
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush().map_err(to_io)?;
        self.drain()?;
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write, C: StreamCodec> Drop for CompressWriter<W, C> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            if let Err(err) = self.do_finish() {
                warn!(error = %err, "finish on drop failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use zflow_core::CompressionLevel;
    use zflow_deflate::{DeflateEncoder, GzipEncoder};

    use super::*;

    #[test]
    fn test_compress_writer() {
        let mut writer = CompressWriter::new(Vec::new(), DeflateEncoder::new()).unwrap();
        writer.write_all(b"Hello").unwrap();
        let output = writer.finish().unwrap();

        let mut out = Vec::new();
        flate2::read::ZlibDecoder::new(&output[..])
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"Hello");
    }

    #[test]
    fn test_compress_writer_drop_finishes() {
        let mut output = Vec::new();
        {
            let mut writer =
                CompressWriter::new(&mut output, GzipEncoder::with_level(CompressionLevel::Fast))
                    .unwrap();
            writer.write_all(b"dropped without finish").unwrap();
        }

        let mut out = Vec::new();
        flate2::read::GzDecoder::new(&output[..])
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"dropped without finish");
    }

    #[test]
    fn test_write_after_finish_fails() {
        let mut writer = CompressWriter::new(Vec::new(), DeflateEncoder::new()).unwrap();
        writer.write_all(b"payload").unwrap();
        writer.do_finish().unwrap();

        let err = writer.write(b"late").unwrap_err();
        assert!(err.to_string().contains("not ready"));
    }

    #[test]
    fn test_invalid_level_fails_construction() {
        let codec = DeflateEncoder::with_level(CompressionLevel::Custom(10));
        let result = CompressWriter::new(Vec::new(), codec);
        assert!(result.is_err());
    }

    /// Writer whose inner sink rejects every write.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Accepts `budget` bytes, then refuses once with `WouldBlock`.
    struct ThrottledWriter {
        written: Vec<u8>,
        budget: usize,
        blocked: bool,
    }

    impl Write for ThrottledWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.blocked {
                if self.written.len() >= self.budget {
                    self.blocked = true;
                    return Err(io::ErrorKind::WouldBlock.into());
                }
                let n = buf.len().min(self.budget - self.written.len());
                self.written.extend_from_slice(&buf[..n]);
                return Ok(n);
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_partial_inner_write_not_repeated() {
        let inner = ThrottledWriter {
            written: Vec::new(),
            budget: 4,
            blocked: false,
        };
        let mut writer = CompressWriter::new(inner, DeflateEncoder::new()).unwrap();
        writer.write_all(b"hello hello hello").unwrap();
        if let Err(err) = writer.flush() {
            assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
        }
        let inner = writer.finish().unwrap();
        assert!(inner.blocked);

        let mut out = Vec::new();
        flate2::read::ZlibDecoder::new(&inner.written[..])
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"hello hello hello");
    }

    #[test]
    fn test_drop_with_failing_inner_does_not_panic() {
        let mut writer = CompressWriter::new(BrokenPipe, DeflateEncoder::new()).unwrap();
        writer.write_all(b"never delivered").unwrap();
        drop(writer);
    }

    #[test]
    fn test_inner_error_propagates() {
        let mut writer = CompressWriter::new(BrokenPipe, DeflateEncoder::new()).unwrap();
        let err = writer
            .write_all(b"data")
            .and_then(|_| writer.flush())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
