use std::io;
use thiserror::Error;

use crate::algorithm::AlgorithmId;
use crate::codec::CodecError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the registry, the block envelope and the config layer.
///
/// None of these are retried here.  A block that fails with
/// [`Error::UnknownAlgorithm`], [`Error::MalformedBlock`] or
/// [`Error::CorruptPayload`] can only be recovered by the caller (for example
/// from a redundant copy).
#[derive(Error, Debug)]
pub enum Error {
    /// The id is not registered in this build.  Decoding MUST NOT fall back
    /// to any other algorithm.
    #[error("unknown compression algorithm {0}")]
    UnknownAlgorithm(AlgorithmId),

    /// Two codecs were registered under the same id.
    #[error("compression algorithm {0} registered twice")]
    DuplicateAlgorithm(AlgorithmId),

    /// Block too short to carry its algorithm tag.
    #[error("malformed block: {len} byte(s) is shorter than the block header")]
    MalformedBlock { len: usize },

    /// The payload is not a valid encoding for the algorithm it is tagged with.
    #[error("corrupt payload for algorithm {algorithm}: {source}")]
    CorruptPayload {
        algorithm: AlgorithmId,
        #[source]
        source: CodecError,
    },

    #[error("encoding with algorithm {algorithm} failed: {source}")]
    EncodeFailed {
        algorithm: AlgorithmId,
        #[source]
        source: CodecError,
    },

    #[error("unknown compression algorithm name '{0}'")]
    UnknownAlgorithmName(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
