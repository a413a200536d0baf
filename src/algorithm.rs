//! Algorithm identifiers.
//!
//! # Identity rules
//! An algorithm is identified by a single byte.  That byte is written as the
//! first byte of every block, so an assigned value is permanent: it is never
//! reused for a different encoding, even if the codec is retired.
//!
//! Id `0` is reserved for the identity ("none") algorithm.  Every registry
//! carries it, so uncompressed blocks are decodable by every build.

use std::fmt;

/// One-byte algorithm tag stored at offset 0 of every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlgorithmId(pub u8);

// ── Assigned ids ─────────────────────────────────────────────────────────────
//
// Ids 0..=2 keep the historical none/snappy/lz4 numbering so blocks written by
// older caches stay readable.

impl AlgorithmId {
    /// No compression — payload stored verbatim.  Always registered.
    pub const NONE:   AlgorithmId = AlgorithmId(0);
    /// Snappy raw block format.
    pub const SNAPPY: AlgorithmId = AlgorithmId(1);
    /// LZ4 block with a little-endian `u32` size prefix.
    pub const LZ4:    AlgorithmId = AlgorithmId(2);
    /// Zstandard, one frame per block.
    pub const ZSTD:   AlgorithmId = AlgorithmId(3);
    /// Brotli stream.
    pub const BROTLI: AlgorithmId = AlgorithmId(4);
    /// LZMA "alone" format.
    pub const LZMA:   AlgorithmId = AlgorithmId(5);

    /// Every id assigned by this crate, in ascending order.
    pub const ASSIGNED: [AlgorithmId; 6] = [
        Self::NONE, Self::SNAPPY, Self::LZ4, Self::ZSTD, Self::BROTLI, Self::LZMA,
    ];

    #[inline]
    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// Human-readable name (for diagnostics and configuration).
    /// Returns `None` for ids this crate has not assigned.
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::NONE   => Some("none"),
            Self::SNAPPY => Some("snappy"),
            Self::LZ4    => Some("lz4"),
            Self::ZSTD   => Some("zstd"),
            Self::BROTLI => Some("brotli"),
            Self::LZMA   => Some("lzma"),
            _            => None,
        }
    }

    /// Parse from a configuration or CLI string, case-insensitively.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none"   => Some(Self::NONE),
            "snappy" => Some(Self::SNAPPY),
            "lz4"    => Some(Self::LZ4),
            "zstd"   => Some(Self::ZSTD),
            "brotli" => Some(Self::BROTLI),
            "lzma"   => Some(Self::LZMA),
            _        => None,
        }
    }
}

impl From<u8> for AlgorithmId {
    fn from(v: u8) -> Self {
        AlgorithmId(v)
    }
}

impl From<AlgorithmId> for u8 {
    fn from(id: AlgorithmId) -> Self {
        id.0
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None       => write!(f, "#{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_for_assigned_ids() {
        for id in AlgorithmId::ASSIGNED {
            let name = id.name().expect("assigned id has a name");
            assert_eq!(AlgorithmId::from_name(name), Some(id));
        }
    }

    #[test]
    fn from_name_ignores_case_and_whitespace() {
        assert_eq!(AlgorithmId::from_name(" LZ4 "), Some(AlgorithmId::LZ4));
        assert_eq!(AlgorithmId::from_name("Snappy"), Some(AlgorithmId::SNAPPY));
        assert_eq!(AlgorithmId::from_name("gzip"), None);
    }

    #[test]
    fn historical_numbering_is_stable() {
        assert_eq!(AlgorithmId::NONE.as_u8(), 0);
        assert_eq!(AlgorithmId::SNAPPY.as_u8(), 1);
        assert_eq!(AlgorithmId::LZ4.as_u8(), 2);
    }

    #[test]
    fn display_unassigned() {
        assert_eq!(AlgorithmId(99).to_string(), "#99");
        assert_eq!(AlgorithmId::ZSTD.to_string(), "zstd (3)");
    }
}
