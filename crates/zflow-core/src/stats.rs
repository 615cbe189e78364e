//! Statistics for a compression stream.

use crate::types::CompressionRatio;

/// Counters accumulated over a stream's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Raw bytes accepted by the codec.
    pub bytes_in: u64,

    /// Compressed bytes committed to the sink.
    pub bytes_out: u64,

    /// Codec steps invoked.
    pub steps: u64,

    /// Times the buffer size hint doubled.
    pub growth_events: u32,
}

impl StreamStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one codec step.
    pub fn record_step(&mut self, consumed: usize, produced: usize) {
        self.steps += 1;
        self.bytes_in += consumed as u64;
        self.bytes_out += produced as u64;
    }

    /// Record a hint doubling.
    pub fn record_growth(&mut self) {
        self.growth_events += 1;
    }

    /// Get compression ratio.
    pub fn ratio(&self) -> CompressionRatio {
        CompressionRatio::new(self.bytes_in as usize, self.bytes_out as usize)
    }

    /// Get metrics summary as string.
    pub fn summary(&self) -> String {
        format!(
            "Bytes: {} -> {} (ratio: {:.2}x, saved: {:.1}%), Steps: {}, Growth events: {}",
            self.bytes_in,
            self.bytes_out,
            self.ratio().ratio(),
            self.ratio().savings_percent(),
            self.steps,
            self.growth_events,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record() {
        let mut stats = StreamStats::new();
        stats.record_step(100, 0);
        stats.record_step(0, 20);
        stats.record_growth();

        assert_eq!(stats.steps, 2);
        assert_eq!(stats.bytes_in, 100);
        assert_eq!(stats.bytes_out, 20);
        assert_eq!(stats.growth_events, 1);
        assert_eq!(stats.ratio().ratio(), 5.0);
        assert!(stats.summary().contains("100 -> 20"));
        assert!(stats.summary().contains("saved: 80.0%"));
    }
}
