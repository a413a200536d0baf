//! Algorithm registry: the immutable id → codec table.
//!
//! A [`Registry`] is built once at start-up through [`RegistryBuilder`] and
//! then shared read-only (`&Registry` or `Arc<Registry>`) with everything that
//! reads or writes blocks.  There is no global instance.
//!
//! Lookups index a 256-slot table directly, so [`Registry::resolve`] is O(1)
//! and never allocates.

use log::debug;

use crate::algorithm::AlgorithmId;
use crate::codec::{Codec, DEFAULT_BROTLI_QUALITY, DEFAULT_ZSTD_LEVEL};
use crate::error::{Error, Result};

const SLOTS: usize = u8::MAX as usize + 1;

/// Immutable mapping from [`AlgorithmId`] to [`Codec`].
///
/// The identity codec is always present under [`AlgorithmId::NONE`].
#[derive(Debug, Clone)]
pub struct Registry {
    slots: Box<[Option<Codec>]>,
}

/// Collects registrations before freezing them into a [`Registry`].
#[derive(Debug)]
pub struct RegistryBuilder {
    slots: Vec<Option<Codec>>,
}

impl RegistryBuilder {
    /// An empty builder.  Only the identity codec is pre-registered.
    pub fn new() -> Self {
        let mut slots = vec![None; SLOTS];
        slots[AlgorithmId::NONE.0 as usize] = Some(Codec::Identity);
        Self { slots }
    }

    /// Register `codec` under `id`.
    ///
    /// Fails with [`Error::DuplicateAlgorithm`] if `id` is already taken,
    /// including the reserved identity id.
    pub fn register(mut self, id: AlgorithmId, codec: Codec) -> Result<Self> {
        let slot = &mut self.slots[id.0 as usize];
        if slot.is_some() {
            return Err(Error::DuplicateAlgorithm(id));
        }
        *slot = Some(codec);
        Ok(self)
    }

    // Built-in ids are distinct constants.
    #[cfg(any(
        feature = "snappy",
        feature = "lz4",
        feature = "zstd",
        feature = "brotli",
        feature = "lzma"
    ))]
    fn put(&mut self, id: AlgorithmId, codec: Codec) {
        self.slots[id.0 as usize] = Some(codec);
    }

    pub fn build(self) -> Registry {
        let registry = Registry { slots: self.slots.into_boxed_slice() };
        debug!(
            "compression registry built with algorithms [{}]",
            registry
                .ids()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Every codec compiled into this build, at default levels.
    pub fn builtin() -> Registry {
        Self::builtin_tuned(DEFAULT_ZSTD_LEVEL, DEFAULT_BROTLI_QUALITY)
    }

    /// Every codec compiled into this build, with explicit tuning for the
    /// codecs that take a level.  Levels only affect encoding; blocks remain
    /// decodable by registries built with any other level.
    #[cfg_attr(not(all(feature = "zstd", feature = "brotli")), allow(unused_variables))]
    pub fn builtin_tuned(zstd_level: i32, brotli_quality: u32) -> Registry {
        #[allow(unused_mut)]
        let mut b = RegistryBuilder::new();
        #[cfg(feature = "snappy")]
        b.put(AlgorithmId::SNAPPY, Codec::Snappy);
        #[cfg(feature = "lz4")]
        b.put(AlgorithmId::LZ4, Codec::Lz4);
        #[cfg(feature = "zstd")]
        b.put(AlgorithmId::ZSTD, Codec::Zstd { level: zstd_level });
        #[cfg(feature = "brotli")]
        b.put(AlgorithmId::BROTLI, Codec::Brotli { quality: brotli_quality });
        #[cfg(feature = "lzma")]
        b.put(AlgorithmId::LZMA, Codec::Lzma);
        b.build()
    }

    /// Look up the codec for `id`.
    #[inline]
    pub fn resolve(&self, id: AlgorithmId) -> Result<&Codec> {
        self.slots[id.0 as usize]
            .as_ref()
            .ok_or(Error::UnknownAlgorithm(id))
    }

    #[inline]
    pub fn contains(&self, id: AlgorithmId) -> bool {
        self.slots[id.0 as usize].is_some()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = AlgorithmId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| AlgorithmId(i as u8))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
