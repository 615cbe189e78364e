//! # Zflow Deflate
//!
//! Incremental DEFLATE, Zlib, and Gzip encoders.
//!
//! These are the codecs a compression stream drives one step at a time.
//! The DEFLATE engine itself is `flate2`; this crate adds the begin/end
//! lifecycle, status mapping, and gzip framing.
//!
//! ## Formats
//!
//! - **Deflate**: Raw DEFLATE (RFC 1951)
//! - **Zlib**: DEFLATE with Zlib wrapper (RFC 1950)
//! - **Gzip**: DEFLATE with Gzip wrapper (RFC 1952)
//!
//! ## Example
//!
//! ```ignore
//! use zflow_core::{CompressionLevel, Format};
//! use zflow_deflate::{encoder_for, DeflateEncoder, GzipEncoder};
//!
//! let zlib = DeflateEncoder::new();
//! let gzip = GzipEncoder::with_level(CompressionLevel::Best);
//! let boxed = encoder_for(Format::Deflate, CompressionLevel::Fast);
//! ```

pub mod codec;
pub mod gzip;

pub use codec::DeflateEncoder;
pub use gzip::GzipEncoder;

use zflow_core::{CompressionLevel, Format, StreamCodec};

/// Build an encoder for the given container format.
pub fn encoder_for(format: Format, level: CompressionLevel) -> Box<dyn StreamCodec + Send> {
    match format {
        Format::Deflate => Box::new(DeflateEncoder::raw(level)),
        Format::Zlib => Box::new(DeflateEncoder::with_level(level)),
        Format::Gzip => Box::new(GzipEncoder::with_level(level)),
    }
}


#[cfg(test)]
mod tests {
    use std::io::Read;

    use zflow_core::Algorithm;

    use super::*;

    #[test]
    fn test_encoder_for_formats() {
        let input = b"encoder_for picks the right framing for each format";

        for format in [Format::Deflate, Format::Zlib, Format::Gzip] {
            let mut codec = encoder_for(format, CompressionLevel::Default);
            assert_eq!(codec.algorithm(), format.algorithm());
            codec.begin().unwrap();
            let compressed = test_util::drive(&mut codec, input, 64);
            codec.end().unwrap();

            let mut out = Vec::new();
            match codec.algorithm() {
                Algorithm::Deflate => {
                    flate2::read::DeflateDecoder::new(&compressed[..])
                        .read_to_end(&mut out)
                        .unwrap();
                }
                Algorithm::Zlib => {
                    flate2::read::ZlibDecoder::new(&compressed[..])
                        .read_to_end(&mut out)
                        .unwrap();
                }
                Algorithm::Gzip => {
                    flate2::read::GzDecoder::new(&compressed[..])
                        .read_to_end(&mut out)
                        .unwrap();
                }
            }
            assert_eq!(out.as_slice(), input);
        }
    }
}
