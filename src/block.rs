//! Self-describing blocks.
//!
//! ```text
//! offset 0       : 1 byte  — AlgorithmId
//! offset 1..end  : payload — codec-specific encoded bytes
//! ```
//!
//! There is no length prefix.  Callers storing several blocks in one stream
//! must frame them themselves.
//!
//! Because every block carries its own algorithm id, the default algorithm
//! of a long-lived store can change without rewriting old blocks.

use std::borrow::Cow;

use log::{trace, warn};

use crate::algorithm::AlgorithmId;
use crate::error::{Error, Result};
use crate::registry::Registry;

/// Size of the block header in bytes.
pub const HEADER_SIZE: usize = 1;

/// Borrowed view over an encoded block.  Parsing does not decode anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    algorithm: AlgorithmId,
    payload:   &'a [u8],
}

impl<'a> Block<'a> {
    /// Split `bytes` into header and payload.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        match bytes.split_first() {
            Some((&tag, payload)) => Ok(Self { algorithm: AlgorithmId(tag), payload }),
            None => Err(Error::MalformedBlock { len: bytes.len() }),
        }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Total encoded size including the header.
    pub fn len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Always `false`: a parsed block holds at least its header byte.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Wraps raw bytes into blocks and back, using a shared [`Registry`].
///
/// `Envelope` is `Copy` and holds only a reference, so one registry can back
/// any number of envelopes across threads.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'r> {
    registry: &'r Registry,
}

impl<'r> Envelope<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Compress `raw` with algorithm `id` and prepend the id byte.
    ///
    /// The id is resolved before any encoding work is done.
    pub fn wrap(&self, id: AlgorithmId, raw: &[u8]) -> Result<Vec<u8>> {
        let codec = self.registry.resolve(id)?;
        let payload = codec
            .encode(raw)
            .map_err(|source| Error::EncodeFailed { algorithm: id, source })?;

        let mut block = Vec::with_capacity(HEADER_SIZE + payload.len());
        block.push(id.0);
        block.extend_from_slice(&payload);
        trace!("wrapped {} -> {} bytes with {}", raw.len(), block.len(), id);
        Ok(block)
    }

    /// Decode a block produced by [`Envelope::wrap`].
    ///
    /// For the identity algorithm the result borrows directly from `block`
    /// (no copy).  All other algorithms return an owned buffer.
    pub fn unwrap<'b>(&self, block: &'b [u8]) -> Result<Cow<'b, [u8]>> {
        let block = Block::parse(block)?;
        let id = block.algorithm();
        let codec = self.registry.resolve(id).map_err(|e| {
            warn!("block tagged with unregistered algorithm {}", id);
            e
        })?;
        let raw = codec.decode(block.payload()).map_err(|source| {
            warn!("corrupt {} byte block payload for {}: {}", block.len(), id, source);
            Error::CorruptPayload { algorithm: id, source }
        })?;
        trace!("unwrapped {} -> {} bytes with {}", block.len(), raw.len(), id);
        Ok(raw)
    }

    /// [`Envelope::unwrap`] into an owned buffer.
    pub fn unwrap_owned(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.unwrap(block).map(Cow::into_owned)
    }
}
