//! Core type definitions for compression operations.

use serde::{Deserialize, Serialize};

/// Compression level presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompressionLevel {
    /// No compression, just framing (fastest).
    None,

    /// Optimized for speed over ratio.
    Fast,

    /// Balanced speed and ratio (default).
    #[default]
    Default,

    /// Optimized for ratio over speed.
    Best,

    /// Custom level (algorithm-specific range).
    Custom(i32),
}

impl CompressionLevel {
    /// Convert to numeric level for algorithms.
    pub fn to_level(self) -> i32 {
        match self {
            CompressionLevel::None => 0,
            CompressionLevel::Fast => 1,
            CompressionLevel::Default => 6,
            CompressionLevel::Best => 9,
            CompressionLevel::Custom(level) => level,
        }
    }
}

/// Compression algorithms a codec may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Deflate - Raw stream (RFC 1951).
    Deflate,
    /// Zlib - Deflate with 2-byte header and Adler-32 (RFC 1950).
    Zlib,
    /// Gzip - Deflate with header and CRC-32 (RFC 1952).
    Gzip,
}

impl Algorithm {
    /// Get algorithm name as string.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Deflate => "deflate",
            Algorithm::Zlib => "zlib",
            Algorithm::Gzip => "gzip",
        }
    }
}

/// Container format wrapped around a single DEFLATE stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Format {
    /// Raw DEFLATE, no header or trailer.
    Deflate,
    /// Zlib wrapper.
    #[default]
    Zlib,
    /// Gzip wrapper.
    Gzip,
}

impl Format {
    /// Algorithm reported by codecs producing this format.
    pub fn algorithm(self) -> Algorithm {
        match self {
            Format::Deflate => Algorithm::Deflate,
            Format::Zlib => Algorithm::Zlib,
            Format::Gzip => Algorithm::Gzip,
        }
    }
}

/// Compression ratio metrics.
#[derive(Debug, Clone, Copy)]
pub struct CompressionRatio {
    /// Original uncompressed size in bytes.
    pub original_size: usize,
    /// Compressed size in bytes.
    pub compressed_size: usize,
}

impl CompressionRatio {
    /// Create new ratio from sizes.
    pub fn new(original: usize, compressed: usize) -> Self {
        CompressionRatio {
            original_size: original,
            compressed_size: compressed,
        }
    }

    /// Calculate ratio (original / compressed).
    /// Higher is better (more compression).
    pub fn ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.compressed_size as f64
    }

    /// Calculate space savings as percentage (0-100).
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - (self.compressed_size as f64 / self.original_size as f64)) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(CompressionLevel::None.to_level(), 0);
        assert_eq!(CompressionLevel::Fast.to_level(), 1);
        assert_eq!(CompressionLevel::default().to_level(), 6);
        assert_eq!(CompressionLevel::Best.to_level(), 9);
        assert_eq!(CompressionLevel::Custom(4).to_level(), 4);
    }

    #[test]
    fn test_format_algorithm() {
        assert_eq!(Format::default().algorithm(), Algorithm::Zlib);
        assert_eq!(Format::Gzip.algorithm().name(), "gzip");
    }

    #[test]
    fn test_ratio() {
        let ratio = CompressionRatio::new(1000, 250);
        assert_eq!(ratio.ratio(), 4.0);
        assert_eq!(ratio.savings_percent(), 75.0);
        assert_eq!(CompressionRatio::new(0, 20).savings_percent(), 0.0);
        assert_eq!(CompressionRatio::new(10, 0).ratio(), 0.0);
    }
}
