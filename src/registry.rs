//! Code-keyed registry of encoders, decoders and hashers, and the
//! `encode`/`decode` dispatch over it.
//!
//! ```
//! use multiblock::{Registry, RawCodec, codec::RAW, hasher::SHA2_256};
//!
//! # tokio_test_block_on(async {
//! let mut registry = Registry::<Vec<u8>>::new();
//! registry.add_codec(RawCodec);
//!
//! let block = registry.encode(RAW, SHA2_256, b"hello".to_vec()).await?;
//! assert_eq!(block.bytes(), b"hello");
//!
//! let back = registry.decode(RAW, SHA2_256, block.bytes().to_vec()).await?;
//! assert_eq!(back.cid(), block.cid());
//! # Ok::<(), multiblock::RegistryError>(())
//! # }).unwrap();
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! # Tables
//! Encoders, decoders and hashers live in three disjoint tables.  Codec and
//! hasher codes share one numeric space but never collide: `0x12` can name a
//! codec and a hasher at the same time.  Registration overwrites; there is no
//! removal.
//!
//! # Sharing
//! Registration takes `&mut self`.  A registry that is no longer being
//! mutated is `Send + Sync` and can be shared across tasks behind an `Arc`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use cid::Cid;
use thiserror::Error;
use tracing::{debug, warn};

use crate::block::{self, Block, BlockError};
use crate::codec::{Decoder, Encoder};
use crate::config::{ConfigError, RegistryConfig};
use crate::hasher::{Hasher, Sha256};

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum RegistryError {
    /// No codec is registered under this code in the table the call needs.
    #[error("unknown codec: 0x{0:x}")]
    UnknownCodec(u64),
    #[error("unknown hasher: 0x{0:x}")]
    UnknownHasher(u64),
    /// Failure inside the codec, hasher or block construction.
    #[error(transparent)]
    Block(#[from] BlockError),
}

// ── Options ──────────────────────────────────────────────────────────────────

/// One implementation registered into both the encoder and decoder tables.
pub struct SharedCodec<T> {
    encoder: Arc<dyn Encoder<T>>,
    decoder: Arc<dyn Decoder<T>>,
}

impl<T> SharedCodec<T> {
    pub fn new<C>(codec: C) -> Self
    where
        C: Encoder<T> + Decoder<T> + 'static,
    {
        let codec = Arc::new(codec);
        Self {
            encoder: codec.clone(),
            decoder: codec,
        }
    }
}

/// Construction-time configuration for [`Registry::with_options`].
///
/// Lists are applied in field order (codecs, encoders, decoders, hashers),
/// each entry in sequence, so a later entry with the same code wins.
pub struct RegistryOptions<T> {
    pub codecs:   Vec<SharedCodec<T>>,
    pub encoders: Vec<Arc<dyn Encoder<T>>>,
    pub decoders: Vec<Arc<dyn Decoder<T>>>,
    pub hashers:  Vec<Arc<dyn Hasher>>,
}

impl<T> Default for RegistryOptions<T> {
    fn default() -> Self {
        Self {
            codecs:   Vec::new(),
            encoders: Vec::new(),
            decoders: Vec::new(),
            hashers:  Vec::new(),
        }
    }
}

impl<T> RegistryOptions<T> {
    pub fn codec<C>(mut self, codec: C) -> Self
    where
        C: Encoder<T> + Decoder<T> + 'static,
    {
        self.codecs.push(SharedCodec::new(codec));
        self
    }

    pub fn encoder<E: Encoder<T> + 'static>(mut self, encoder: E) -> Self {
        self.encoders.push(Arc::new(encoder));
        self
    }

    pub fn decoder<D: Decoder<T> + 'static>(mut self, decoder: D) -> Self {
        self.decoders.push(Arc::new(decoder));
        self
    }

    pub fn hasher<H: Hasher + 'static>(mut self, hasher: H) -> Self {
        self.hashers.push(Arc::new(hasher));
        self
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

pub struct Registry<T> {
    encoders: HashMap<u64, Arc<dyn Encoder<T>>>,
    decoders: HashMap<u64, Arc<dyn Decoder<T>>>,
    hashers:  HashMap<u64, Arc<dyn Hasher>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    /// Empty codec tables; SHA2-256 as the only hasher.
    pub fn new() -> Self {
        let mut hashers: HashMap<u64, Arc<dyn Hasher>> = HashMap::new();
        hashers.insert(Sha256.code(), Arc::new(Sha256));
        Self {
            encoders: HashMap::new(),
            decoders: HashMap::new(),
            hashers,
        }
    }

    pub fn with_options(opts: RegistryOptions<T>) -> Self {
        let mut registry = Self::new();
        registry.apply(opts);
        registry
    }

    /// Build from a declarative config, then apply `opts` on top.
    pub fn from_config(config: &RegistryConfig, opts: RegistryOptions<T>) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for hasher in config.resolve_hashers()? {
            registry.insert_hasher(hasher);
        }
        registry.apply(opts);
        Ok(registry)
    }

    fn apply(&mut self, opts: RegistryOptions<T>) {
        for codec in opts.codecs {
            self.insert_encoder(codec.encoder);
            self.insert_decoder(codec.decoder);
        }
        for encoder in opts.encoders {
            self.insert_encoder(encoder);
        }
        for decoder in opts.decoders {
            self.insert_decoder(decoder);
        }
        for hasher in opts.hashers {
            self.insert_hasher(hasher);
        }
    }

    // ── Registration ─────────────────────────────────────────────────────────

    /// Register one implementation as both encoder and decoder.
    pub fn add_codec<C>(&mut self, codec: C)
    where
        C: Encoder<T> + Decoder<T> + 'static,
    {
        let codec = SharedCodec::new(codec);
        self.insert_encoder(codec.encoder);
        self.insert_decoder(codec.decoder);
    }

    pub fn add_encoder<E: Encoder<T> + 'static>(&mut self, encoder: E) {
        self.insert_encoder(Arc::new(encoder));
    }

    pub fn add_decoder<D: Decoder<T> + 'static>(&mut self, decoder: D) {
        self.insert_decoder(Arc::new(decoder));
    }

    pub fn add_hasher<H: Hasher + 'static>(&mut self, hasher: H) {
        self.insert_hasher(Arc::new(hasher));
    }

    fn insert_encoder(&mut self, encoder: Arc<dyn Encoder<T>>) {
        debug!(code = %format_args!("{:#x}", encoder.code()), name = encoder.name(), "registered encoder");
        self.encoders.insert(encoder.code(), encoder);
    }

    fn insert_decoder(&mut self, decoder: Arc<dyn Decoder<T>>) {
        debug!(code = %format_args!("{:#x}", decoder.code()), name = decoder.name(), "registered decoder");
        self.decoders.insert(decoder.code(), decoder);
    }

    fn insert_hasher(&mut self, hasher: Arc<dyn Hasher>) {
        debug!(code = %format_args!("{:#x}", hasher.code()), name = hasher.name(), "registered hasher");
        self.hashers.insert(hasher.code(), hasher);
    }

    // ── Introspection ────────────────────────────────────────────────────────

    pub fn has_encoder(&self, code: u64) -> bool { self.encoders.contains_key(&code) }
    pub fn has_decoder(&self, code: u64) -> bool { self.decoders.contains_key(&code) }
    pub fn has_hasher(&self, code: u64) -> bool { self.hashers.contains_key(&code) }

    /// Registered encoder codes, ascending.
    pub fn encoder_codes(&self) -> Vec<u64> { sorted_keys(&self.encoders) }
    /// Registered decoder codes, ascending.
    pub fn decoder_codes(&self) -> Vec<u64> { sorted_keys(&self.decoders) }
    /// Registered hasher codes, ascending.
    pub fn hasher_codes(&self) -> Vec<u64> { sorted_keys(&self.hashers) }

    // ── Dispatch ─────────────────────────────────────────────────────────────

    /// Encode `value` with the codec `codec` and hash it with `hasher`.
    ///
    /// # Errors
    /// `UnknownCodec` if no encoder is registered under `codec` (checked
    /// first), `UnknownHasher` if no hasher is registered under `hasher`,
    /// otherwise whatever the encoder or block construction reports.
    pub async fn encode(&self, codec: u64, hasher: u64, value: T) -> Result<Block<T>, RegistryError> {
        let encoder = self.encoders.get(&codec).ok_or_else(|| unknown_codec(codec))?;
        let hasher = self.resolve_hasher(hasher)?;
        debug!(codec = encoder.name(), hasher = hasher.name(), "encode");
        Ok(block::encode(value, &**encoder, &**hasher)?)
    }

    /// Decode `bytes` with the codec `codec` and hash them with `hasher`.
    ///
    /// The codec is looked up in the decoder table, so a decoder-only
    /// registration is enough here.
    pub async fn decode(&self, codec: u64, hasher: u64, bytes: Vec<u8>) -> Result<Block<T>, RegistryError> {
        let decoder = self.resolve_decoder(codec)?;
        let hasher = self.resolve_hasher(hasher)?;
        debug!(codec = decoder.name(), hasher = hasher.name(), len = bytes.len(), "decode");
        Ok(block::decode(bytes, &**decoder, &**hasher)?)
    }

    /// Rebuild a block from bytes fetched under `cid`, verifying the digest.
    ///
    /// Codec and hasher are taken from the CID itself.
    pub async fn create(&self, cid: Cid, bytes: Vec<u8>) -> Result<Block<T>, RegistryError> {
        let decoder = self.resolve_decoder(cid.codec())?;
        let hasher = self.resolve_hasher(cid.hash().code())?;
        debug!(%cid, len = bytes.len(), "create");
        block::create(bytes, cid, &**decoder, &**hasher).map_err(|e| {
            if let BlockError::HashMismatch { expected, actual } = &e {
                warn!(%cid, expected = %expected, actual = %actual, "block digest mismatch");
            }
            e.into()
        })
    }

    fn resolve_decoder(&self, code: u64) -> Result<&Arc<dyn Decoder<T>>, RegistryError> {
        self.decoders.get(&code).ok_or_else(|| unknown_codec(code))
    }

    fn resolve_hasher(&self, code: u64) -> Result<&Arc<dyn Hasher>, RegistryError> {
        self.hashers.get(&code).ok_or_else(|| {
            warn!(code = %format_args!("{:#x}", code), "unknown hasher");
            RegistryError::UnknownHasher(code)
        })
    }
}

// ── Capability traits ────────────────────────────────────────────────────────
//
// Callers that only ever decode (or only ever encode) can depend on one half
// of the registry.  `Registry<T>` implements both.

/// The decode half: decoders, hashers and `decode`.
pub trait Multidecoder<T> {
    fn add_decoder<D: Decoder<T> + 'static>(&mut self, decoder: D);
    fn add_hasher<H: Hasher + 'static>(&mut self, hasher: H);
    fn decode(
        &self,
        codec:  u64,
        hasher: u64,
        bytes:  Vec<u8>,
    ) -> impl Future<Output = Result<Block<T>, RegistryError>> + Send;
}

/// The encode half: encoders, hashers and `encode`.
pub trait Multiencoder<T> {
    fn add_encoder<E: Encoder<T> + 'static>(&mut self, encoder: E);
    fn add_hasher<H: Hasher + 'static>(&mut self, hasher: H);
    fn encode(
        &self,
        codec:  u64,
        hasher: u64,
        value:  T,
    ) -> impl Future<Output = Result<Block<T>, RegistryError>> + Send;
}

/// Both halves.
pub trait Multicodec<T>: Multidecoder<T> + Multiencoder<T> {}

impl<T, M> Multicodec<T> for M where M: Multidecoder<T> + Multiencoder<T> {}

// Inherent methods take precedence in `Registry::…` paths, so these delegate
// rather than recurse.

impl<T: Send> Multidecoder<T> for Registry<T> {
    fn add_decoder<D: Decoder<T> + 'static>(&mut self, decoder: D) {
        Registry::add_decoder(self, decoder)
    }

    fn add_hasher<H: Hasher + 'static>(&mut self, hasher: H) {
        Registry::add_hasher(self, hasher)
    }

    fn decode(
        &self,
        codec:  u64,
        hasher: u64,
        bytes:  Vec<u8>,
    ) -> impl Future<Output = Result<Block<T>, RegistryError>> + Send {
        Registry::decode(self, codec, hasher, bytes)
    }
}

impl<T: Send> Multiencoder<T> for Registry<T> {
    fn add_encoder<E: Encoder<T> + 'static>(&mut self, encoder: E) {
        Registry::add_encoder(self, encoder)
    }

    fn add_hasher<H: Hasher + 'static>(&mut self, hasher: H) {
        Registry::add_hasher(self, hasher)
    }

    fn encode(
        &self,
        codec:  u64,
        hasher: u64,
        value:  T,
    ) -> impl Future<Output = Result<Block<T>, RegistryError>> + Send {
        Registry::encode(self, codec, hasher, value)
    }
}

fn unknown_codec(code: u64) -> RegistryError {
    warn!(code = %format_args!("{:#x}", code), "unknown codec");
    RegistryError::UnknownCodec(code)
}

fn sorted_keys<V>(table: &HashMap<u64, V>) -> Vec<u64> {
    let mut codes: Vec<u64> = table.keys().copied().collect();
    codes.sort_unstable();
    codes
}
