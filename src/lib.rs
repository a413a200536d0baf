//! Self-describing compressed blocks for caches and block stores.
//!
//! ```
//! use blockpress::{AlgorithmId, Envelope, Registry};
//!
//! let registry = Registry::builtin();
//! let env = Envelope::new(&registry);
//!
//! let block = env.wrap(AlgorithmId::NONE, b"hello")?;
//! assert_eq!(block[0], AlgorithmId::NONE.as_u8());
//! assert_eq!(env.unwrap(&block)?.as_ref(), b"hello");
//! # Ok::<(), blockpress::Error>(())
//! ```
//!
//! # Features
//! Each codec crate sits behind a feature of the same name: `snappy`, `lz4`
//! and `zstd` are on by default, `brotli` and `lzma` are opt-in.  `parallel`
//! spreads [`batch`] work over Rayon.  Tests for a codec only run when its
//! feature is enabled, so the full suite is `cargo test --all-features`.

pub mod algorithm;
pub mod codec;
pub mod registry;
pub mod block;
pub mod batch;
pub mod config;
pub mod error;

pub use algorithm::AlgorithmId;
pub use codec::{BlockCodec, Codec, CodecError};
pub use registry::{Registry, RegistryBuilder};
pub use block::{Block, Envelope, HEADER_SIZE};
pub use config::Config;
pub use error::{Error, Result};
