//! Codecs: the encode/decode pairs behind each algorithm id.
//!
//! Built-in codecs form a closed set of [`Codec`] variants and are dispatched
//! with a plain `match`.  Each optional codec is compiled in through a cargo
//! feature of the same name; [`Codec::Identity`] is always present.
//!
//! Codecs the crate does not ship can be plugged in through the
//! [`BlockCodec`] trait and registered as [`Codec::Custom`].
//!
//! # Thread safety
//! Every codec is stateless.  `encode` and `decode` may be called from any
//! number of threads at once on different buffers.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Default zstd level used by [`Codec::zstd_default`] and the config layer.
pub const DEFAULT_ZSTD_LEVEL: i32 = 3;
/// Default brotli quality (0..=11) used by the config layer.
pub const DEFAULT_BROTLI_QUALITY: u32 = 5;

// ── Error type ───────────────────────────────────────────────────────────────

/// Failure reported by a codec library, tagged with the codec's name.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{codec} compression error: {message}")]
    Compression { codec: &'static str, message: String },
    #[error("{codec} decompression error: {message}")]
    Decompression { codec: &'static str, message: String },
}

impl CodecError {
    pub fn compression(codec: &'static str, err: impl fmt::Display) -> Self {
        CodecError::Compression { codec, message: err.to_string() }
    }

    pub fn decompression(codec: &'static str, err: impl fmt::Display) -> Self {
        CodecError::Decompression { codec, message: err.to_string() }
    }
}

// ── Extension trait ──────────────────────────────────────────────────────────

/// A codec supplied by the embedding application.
///
/// Implementations must be stateless (or internally synchronised) and must
/// decode exactly what they encode.  `decode` must fail, not guess, when the
/// payload is not a valid encoding.
pub trait BlockCodec: Send + Sync {
    fn name(&self) -> &'static str;
    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, payload: &[u8]) -> Result<Vec<u8>, CodecError>;
}

// ── Codec ────────────────────────────────────────────────────────────────────

/// One algorithm's encode/decode pair.
#[derive(Clone)]
pub enum Codec {
    /// Stores the payload verbatim.
    Identity,
    #[cfg(feature = "snappy")]
    Snappy,
    #[cfg(feature = "lz4")]
    Lz4,
    #[cfg(feature = "zstd")]
    Zstd { level: i32 },
    #[cfg(feature = "brotli")]
    Brotli { quality: u32 },
    #[cfg(feature = "lzma")]
    Lzma,
    Custom(Arc<dyn BlockCodec>),
}

impl Codec {
    #[cfg(feature = "zstd")]
    pub fn zstd_default() -> Self {
        Codec::Zstd { level: DEFAULT_ZSTD_LEVEL }
    }

    /// Wrap an application codec.
    pub fn custom(codec: impl BlockCodec + 'static) -> Self {
        Codec::Custom(Arc::new(codec))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Codec::Identity => "none",
            #[cfg(feature = "snappy")]
            Codec::Snappy => "snappy",
            #[cfg(feature = "lz4")]
            Codec::Lz4 => "lz4",
            #[cfg(feature = "zstd")]
            Codec::Zstd { .. } => "zstd",
            #[cfg(feature = "brotli")]
            Codec::Brotli { .. } => "brotli",
            #[cfg(feature = "lzma")]
            Codec::Lzma => "lzma",
            Codec::Custom(c) => c.name(),
        }
    }

    /// Compress `raw` into a fresh buffer.
    ///
    /// The identity, snappy and lz4 encoders cannot fail on in-memory input
    /// short of snappy's ~4 GiB input ceiling.
    pub fn encode(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            Codec::Identity => Ok(raw.to_vec()),
            #[cfg(feature = "snappy")]
            Codec::Snappy => snap::raw::Encoder::new()
                .compress_vec(raw)
                .map_err(|e| CodecError::compression("snappy", e)),
            #[cfg(feature = "lz4")]
            Codec::Lz4 => Ok(lz4_flex::compress_prepend_size(raw)),
            #[cfg(feature = "zstd")]
            Codec::Zstd { level } => zstd::bulk::compress(raw, *level)
                .map_err(|e| CodecError::compression("zstd", e)),
            #[cfg(feature = "brotli")]
            Codec::Brotli { quality } => {
                use std::io::Write;
                let mut out = Vec::new();
                {
                    let mut w = brotli::CompressorWriter::new(&mut out, 4096, (*quality).min(11), 22);
                    w.write_all(raw).map_err(|e| CodecError::compression("brotli", e))?;
                    w.flush().map_err(|e| CodecError::compression("brotli", e))?;
                }
                Ok(out)
            }
            #[cfg(feature = "lzma")]
            Codec::Lzma => {
                let mut out = Vec::new();
                lzma_rs::lzma_compress(&mut std::io::Cursor::new(raw), &mut out)
                    .map_err(|e| CodecError::compression("lzma", e))?;
                Ok(out)
            }
            Codec::Custom(c) => c.encode(raw),
        }
    }

    /// Decompress `payload`.
    ///
    /// The identity codec returns the input slice itself (`Cow::Borrowed`):
    /// no copy is made, and the result aliases the caller's buffer read-only.
    /// Every other codec returns an owned buffer.
    pub fn decode<'a>(&self, payload: &'a [u8]) -> Result<Cow<'a, [u8]>, CodecError> {
        match self {
            Codec::Identity => Ok(Cow::Borrowed(payload)),
            #[cfg(feature = "snappy")]
            Codec::Snappy => snap::raw::Decoder::new()
                .decompress_vec(payload)
                .map(Cow::Owned)
                .map_err(|e| CodecError::decompression("snappy", e)),
            #[cfg(feature = "lz4")]
            Codec::Lz4 => decode_lz4(payload).map(Cow::Owned),
            #[cfg(feature = "zstd")]
            Codec::Zstd { .. } => {
                // Every zstd encoding, even of empty input, is a non-empty frame.
                if payload.is_empty() {
                    return Err(CodecError::decompression("zstd", "empty payload"));
                }
                zstd::decode_all(payload)
                    .map(Cow::Owned)
                    .map_err(|e| CodecError::decompression("zstd", e))
            }
            #[cfg(feature = "brotli")]
            Codec::Brotli { .. } => decode_brotli(payload).map(Cow::Owned),
            #[cfg(feature = "lzma")]
            Codec::Lzma => {
                let mut out = Vec::new();
                lzma_rs::lzma_decompress(&mut std::io::Cursor::new(payload), &mut out)
                    .map_err(|e| CodecError::decompression("lzma", e))?;
                Ok(Cow::Owned(out))
            }
            Codec::Custom(c) => c.decode(payload).map(Cow::Owned),
        }
    }
}

/// LZ4 block with a little-endian `u32` size prefix.
///
/// The decoder only uses the prefix as a capacity hint, so the decoded
/// length is checked against it here: a block cut at a sequence boundary
/// otherwise decodes to a silently shorter buffer.
#[cfg(feature = "lz4")]
fn decode_lz4(payload: &[u8]) -> Result<Vec<u8>, CodecError> {
    let declared = match payload.get(..4) {
        Some(prefix) => u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize,
        None => return Err(CodecError::decompression("lz4", "missing size prefix")),
    };
    let out = lz4_flex::decompress_size_prepended(payload)
        .map_err(|e| CodecError::decompression("lz4", e))?;
    if out.len() != declared {
        return Err(CodecError::decompression(
            "lz4",
            format!("decoded {} bytes but size prefix declares {}", out.len(), declared),
        ));
    }
    Ok(out)
}

/// Brotli stream that must span the whole payload.
///
/// `brotli::Decompressor` stops at the end-of-stream marker and ignores what
/// follows, so the stream is driven directly and leftover input rejected.
#[cfg(feature = "brotli")]
fn decode_brotli(payload: &[u8]) -> Result<Vec<u8>, CodecError> {
    use brotli::enc::StandardAlloc;
    use brotli::{BrotliDecompressStream, BrotliResult, BrotliState};

    let mut state = BrotliState::new(
        StandardAlloc::default(),
        StandardAlloc::default(),
        StandardAlloc::default(),
    );
    let mut out = Vec::new();
    let mut chunk = vec![0u8; 4096];
    let mut available_in = payload.len();
    let mut input_offset = 0;
    let mut total_out = 0;

    loop {
        let mut available_out = chunk.len();
        let mut output_offset = 0;
        let result = BrotliDecompressStream(
            &mut available_in,
            &mut input_offset,
            payload,
            &mut available_out,
            &mut output_offset,
            &mut chunk[..],
            &mut total_out,
            &mut state,
        );
        out.extend_from_slice(&chunk[..output_offset]);
        match result {
            BrotliResult::ResultSuccess => break,
            BrotliResult::NeedsMoreOutput => continue,
            BrotliResult::NeedsMoreInput => {
                return Err(CodecError::decompression("brotli", "truncated stream"));
            }
            BrotliResult::ResultFailure => {
                return Err(CodecError::decompression("brotli", "invalid stream"));
            }
        }
    }

    if available_in != 0 {
        return Err(CodecError::decompression(
            "brotli",
            format!("{} trailing byte(s) after end of stream", available_in),
        ));
    }
    Ok(out)
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Codec").field(&self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut data = b"cache block ".repeat(200);
        data.extend((0u8..=255).cycle().take(3000));
        data
    }

    fn builtins() -> Vec<Codec> {
        #[allow(unused_mut)]
        let mut v = vec![Codec::Identity];
        #[cfg(feature = "snappy")]
        v.push(Codec::Snappy);
        #[cfg(feature = "lz4")]
        v.push(Codec::Lz4);
        #[cfg(feature = "zstd")]
        v.push(Codec::zstd_default());
        #[cfg(feature = "brotli")]
        v.push(Codec::Brotli { quality: DEFAULT_BROTLI_QUALITY });
        #[cfg(feature = "lzma")]
        v.push(Codec::Lzma);
        v
    }

    #[test]
    fn every_builtin_roundtrips() {
        let data = sample();
        for codec in builtins() {
            let enc = codec.encode(&data).unwrap();
            let dec = codec.decode(&enc).unwrap();
            assert_eq!(dec.as_ref(), &data[..], "codec {}", codec.name());
        }
    }

    #[test]
    fn every_builtin_roundtrips_empty() {
        for codec in builtins() {
            let enc = codec.encode(&[]).unwrap();
            let dec = codec.decode(&enc).unwrap();
            assert!(dec.is_empty(), "codec {}", codec.name());
        }
    }

    #[test]
    fn identity_decode_borrows() {
        let payload = b"verbatim";
        match Codec::Identity.decode(payload).unwrap() {
            Cow::Borrowed(b) => assert_eq!(b.as_ptr(), payload.as_ptr()),
            Cow::Owned(_) => panic!("identity decode must not copy"),
        }
    }

    #[cfg(feature = "snappy")]
    #[test]
    fn snappy_rejects_garbage() {
        let err = Codec::Snappy.decode(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, CodecError::Decompression { codec: "snappy", .. }));
    }

    #[cfg(feature = "lz4")]
    #[test]
    fn lz4_rejects_every_truncation() {
        let data = sample();
        let enc = Codec::Lz4.encode(&data).unwrap();
        for cut in 0..enc.len() {
            let err = Codec::Lz4.decode(&enc[..cut]).unwrap_err();
            assert!(matches!(err, CodecError::Decompression { codec: "lz4", .. }), "cut {}", cut);
        }
    }

    #[cfg(feature = "lz4")]
    #[test]
    fn lz4_rejects_short_output_for_declared_size() {
        // Prefix declares 100 bytes; the body is one literal 'A'.
        let err = Codec::Lz4.decode(&[100, 0, 0, 0, 0x10, 0x41]).unwrap_err();
        assert!(matches!(err, CodecError::Decompression { codec: "lz4", .. }));
    }

    #[cfg(feature = "zstd")]
    #[test]
    fn zstd_rejects_empty_payload() {
        assert!(Codec::zstd_default().decode(&[]).is_err());
    }

    #[cfg(feature = "brotli")]
    #[test]
    fn brotli_rejects_trailing_bytes() {
        let codec = Codec::Brotli { quality: DEFAULT_BROTLI_QUALITY };
        let mut enc = codec.encode(&sample()).unwrap();
        enc.extend_from_slice(b"JUNKJUNK");
        let err = codec.decode(&enc).unwrap_err();
        assert!(matches!(err, CodecError::Decompression { codec: "brotli", .. }));
    }

    #[cfg(feature = "brotli")]
    #[test]
    fn brotli_rejects_truncation() {
        let codec = Codec::Brotli { quality: DEFAULT_BROTLI_QUALITY };
        let enc = codec.encode(&sample()).unwrap();
        assert!(codec.decode(&enc[..enc.len() / 2]).is_err());
    }

    #[cfg(feature = "zstd")]
    #[test]
    fn zstd_rejects_garbage() {
        assert!(Codec::zstd_default().decode(b"definitely not a zstd frame").is_err());
    }

    struct Reverse;
    impl BlockCodec for Reverse {
        fn name(&self) -> &'static str { "reverse" }
        fn encode(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
            Ok(raw.iter().rev().copied().collect())
        }
        fn decode(&self, payload: &[u8]) -> Result<Vec<u8>, CodecError> {
            Ok(payload.iter().rev().copied().collect())
        }
    }

    #[test]
    fn custom_codec_dispatch() {
        let codec = Codec::custom(Reverse);
        assert_eq!(codec.name(), "reverse");
        let enc = codec.encode(b"abc").unwrap();
        assert_eq!(enc, b"cba");
        assert_eq!(codec.decode(&enc).unwrap().as_ref(), b"abc");
        assert_eq!(format!("{:?}", codec), "Codec(\"reverse\")");
    }
}
