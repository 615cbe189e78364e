//! Gzip framing (RFC 1952) around a streaming raw DEFLATE encoder.
//!
//! The header is emitted before the first compressed byte and the
//! CRC-32/ISIZE trailer after the DEFLATE stream ends. Either may be split
//! across steps when the output region is small.

use crc32fast::Hasher;
use zflow_core::{Algorithm, CodecStatus, CompressionLevel, Flush, Result, Step, StreamCodec};

use crate::codec::DeflateEncoder;

/// Gzip magic number.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression method: DEFLATE.
const CM_DEFLATE: u8 = 8;

/// OS identifier: Unix.
const OS_UNIX: u8 = 3;

const HEADER_LEN: usize = 10;
const TRAILER_LEN: usize = 8;

/// Streaming gzip encoder.
pub struct GzipEncoder {
    inner: DeflateEncoder,
    crc: Hasher,
    isize: u32,
    header: [u8; HEADER_LEN],
    header_pos: usize,
    trailer: Option<[u8; TRAILER_LEN]>,
    trailer_pos: usize,
}

impl GzipEncoder {
    /// Create a gzip encoder with default level.
    pub fn new() -> Self {
        Self::with_level(CompressionLevel::Default)
    }

    /// Create with compression level.
    pub fn with_level(level: CompressionLevel) -> Self {
        Self {
            inner: DeflateEncoder::raw(level),
            crc: Hasher::new(),
            isize: 0,
            header: build_header(level),
            header_pos: 0,
            trailer: None,
            trailer_pos: 0,
        }
    }

    /// Get the configured compression level.
    pub fn level(&self) -> CompressionLevel {
        self.inner.level()
    }

    fn build_trailer(&self) -> [u8; TRAILER_LEN] {
        let crc = self.crc.clone().finalize();
        let mut trailer = [0u8; TRAILER_LEN];
        trailer[..4].copy_from_slice(&crc.to_le_bytes());
        trailer[4..].copy_from_slice(&self.isize.to_le_bytes());
        trailer
    }
}

impl std::fmt::Debug for GzipEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GzipEncoder")
            .field("inner", &self.inner)
            .field("isize", &self.isize)
            .field("header_pos", &self.header_pos)
            .field("trailer_pos", &self.trailer_pos)
            .finish()
    }
}

impl Default for GzipEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn build_header(level: CompressionLevel) -> [u8; HEADER_LEN] {
    let xfl = match level {
        CompressionLevel::Best => 2,
        CompressionLevel::Fast => 4,
        _ => 0,
    };

    // Flags and modification time are left zero.
    let mut header = [0u8; HEADER_LEN];
    header[..2].copy_from_slice(&GZIP_MAGIC);
    header[2] = CM_DEFLATE;
    header[8] = xfl;
    header[9] = OS_UNIX;
    header
}

/// Copy as much of `src[*pos..]` into `dst` as fits; returns bytes copied.
fn emit(src: &[u8], pos: &mut usize, dst: &mut [u8]) -> usize {
    let n = (src.len() - *pos).min(dst.len());
    dst[..n].copy_from_slice(&src[*pos..*pos + n]);
    *pos += n;
    n
}

impl StreamCodec for GzipEncoder {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Gzip
    }

    fn begin(&mut self) -> Result<()> {
        self.inner.begin()?;
        self.crc = Hasher::new();
        self.isize = 0;
        self.header_pos = 0;
        self.trailer = None;
        self.trailer_pos = 0;
        Ok(())
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step> {
        if !self.inner.is_active() {
            // Reports the lifecycle error without emitting framing.
            return self.inner.step(input, output, flush);
        }

        let mut produced = 0;

        if self.header_pos < HEADER_LEN {
            produced += emit(&self.header, &mut self.header_pos, output);
            if self.header_pos < HEADER_LEN {
                let status = if produced > 0 {
                    CodecStatus::Ok
                } else {
                    CodecStatus::BufError
                };
                return Ok(Step::new(status, 0, produced));
            }
        }

        let mut consumed = 0;
        if self.trailer.is_none() {
            let step = self.inner.step(input, &mut output[produced..], flush)?;
            self.crc.update(&input[..step.consumed]);
            self.isize = self.isize.wrapping_add(step.consumed as u32);
            consumed = step.consumed;
            produced += step.produced;

            if step.status != CodecStatus::StreamEnd {
                let status = if step.status == CodecStatus::BufError && produced > 0 {
                    CodecStatus::Ok
                } else {
                    step.status
                };
                return Ok(Step::new(status, consumed, produced));
            }
            self.trailer = Some(self.build_trailer());
        }

        let Some(trailer) = self.trailer else {
            return Ok(Step::new(CodecStatus::BufError, consumed, produced));
        };
        produced += emit(&trailer, &mut self.trailer_pos, &mut output[produced..]);

        let status = if self.trailer_pos == TRAILER_LEN {
            CodecStatus::StreamEnd
        } else if produced > 0 || consumed > 0 {
            CodecStatus::Ok
        } else {
            CodecStatus::BufError
        };
        Ok(Step::new(status, consumed, produced))
    }

    fn end(&mut self) -> Result<()> {
        self.inner.end()
    }

    fn last_message(&self) -> Option<&str> {
        self.inner.last_message()
    }
}
