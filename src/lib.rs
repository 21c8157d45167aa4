pub mod codec;
pub mod hasher;
pub mod block;
pub mod config;
pub mod registry;

pub use cid::Cid;
pub use codec::{CodecError, Decoder, Encoder, JsonCodec, RawCodec};
pub use hasher::{Blake3, Hasher, Identity, Sha256, Sha512};
pub use block::{Block, BlockError};
pub use config::{ConfigError, RegistryConfig};
pub use registry::{
    Multicodec, Multidecoder, Multiencoder, Registry, RegistryError, RegistryOptions, SharedCodec,
};
