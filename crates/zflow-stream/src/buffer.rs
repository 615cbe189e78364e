//! Growable output buffer for streaming compression.

use bytes::Bytes;
use zflow_core::Sink;

/// An append-only byte buffer with read and write cursors.
///
/// Compressed output is committed after the write cursor; the owner reads
/// and consumes from the read cursor between stream calls.
#[derive(Debug, Default)]
pub struct StreamBuffer {
    /// Internal buffer storage.
    data: Vec<u8>,
    /// Current read position.
    read_pos: usize,
    /// Current write position (end of valid data).
    write_pos: usize,
}

impl StreamBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new buffer with specified spare capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity],
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// Get the buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes available to read.
    #[inline]
    pub fn available(&self) -> usize {
        self.write_pos - self.read_pos
    }

    /// Get the number of bytes that can be written without growing.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.write_pos
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read_pos >= self.write_pos
    }

    /// Get a slice of readable data.
    #[inline]
    pub fn readable(&self) -> &[u8] {
        &self.data[self.read_pos..self.write_pos]
    }

    /// Consume `n` bytes from the read position.
    #[inline]
    pub fn consume(&mut self, n: usize) {
        self.read_pos = (self.read_pos + n).min(self.write_pos);
        if self.read_pos == self.write_pos {
            self.read_pos = 0;
            self.write_pos = 0;
        }
    }

    /// Take every readable byte, leaving the buffer empty.
    pub fn take_readable(&mut self) -> Bytes {
        let out = Bytes::copy_from_slice(self.readable());
        self.clear();
        out
    }

    /// Reset buffer to empty state.
    #[inline]
    pub fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
    }

    /// Compact the buffer by moving unread data to the beginning.
    pub fn compact(&mut self) {
        if self.read_pos > 0 {
            let available = self.available();
            if available > 0 {
                self.data.copy_within(self.read_pos..self.write_pos, 0);
            }
            self.read_pos = 0;
            self.write_pos = available;
        }
    }
}

impl Sink for StreamBuffer {
    fn ensure_writable(&mut self, n: usize) {
        if self.remaining() >= n {
            return;
        }
        // Reclaim consumed prefix space before growing.
        if self.read_pos + self.remaining() >= n {
            self.compact();
        } else {
            self.data.resize(self.write_pos + n, 0);
        }
    }

    fn writable_region(&mut self) -> &mut [u8] {
        &mut self.data[self.write_pos..]
    }

    fn commit(&mut self, n: usize) {
        self.write_pos = (self.write_pos + n).min(self.data.len());
    }

    fn writable_len(&mut self) -> usize {
        self.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Append through the sink interface, as a codec would.
    fn fill(buf: &mut StreamBuffer, data: &[u8]) {
        buf.ensure_writable(data.len());
        buf.writable_region()[..data.len()].copy_from_slice(data);
        buf.commit(data.len());
    }

    #[test]
    fn test_new_buffer() {
        let buf = StreamBuffer::new();
        assert_eq!(buf.capacity(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_ensure_writable_grows() {
        let mut buf = StreamBuffer::new();
        buf.ensure_writable(1024);
        assert_eq!(buf.remaining(), 1024);
        assert_eq!(buf.writable_region().len(), 1024);

        buf.writable_region()[..5].copy_from_slice(b"Hello");
        buf.commit(5);
        assert_eq!(buf.readable(), b"Hello");

        buf.ensure_writable(2048);
        assert!(buf.remaining() >= 2048);
        assert_eq!(buf.readable(), b"Hello");
    }

    #[test]
    fn test_ensure_writable_compacts_first() {
        let mut buf = StreamBuffer::with_capacity(32);
        fill(&mut buf, b"Hello, World! Hello, World!");
        buf.consume(14);

        let capacity = buf.capacity();
        buf.ensure_writable(16);
        assert_eq!(buf.capacity(), capacity);
        assert_eq!(buf.readable(), b"Hello, World!");
        assert!(buf.remaining() >= 16);
    }

    #[test]
    fn test_commit_clamped() {
        let mut buf = StreamBuffer::with_capacity(8);
        buf.commit(100);
        assert_eq!(buf.available(), 8);
        assert_eq!(buf.writable_len(), 0);
    }

    #[test]
    fn test_take_readable() {
        let mut buf = StreamBuffer::new();
        fill(&mut buf, b"compressed");
        buf.consume(3);

        let taken = buf.take_readable();
        assert_eq!(&taken[..], b"pressed");
        assert!(buf.is_empty());
        assert_eq!(buf.available(), 0);
    }

    #[test]
    fn test_compact() {
        let mut buf = StreamBuffer::with_capacity(32);

        fill(&mut buf, b"Hello, World!");
        buf.consume(7); // consume "Hello, "

        assert_eq!(buf.readable(), b"World!");
        assert_eq!(buf.read_pos, 7);

        buf.compact();
        assert_eq!(buf.read_pos, 0);
        assert_eq!(buf.write_pos, 6);
        assert_eq!(buf.readable(), b"World!");
    }
}
