//! Block construction: bind a value, its encoded bytes and a CIDv1.
//!
//! The CID carries the codec code and a multihash (hasher code + digest).
//! Every constructor here digests exactly the bytes stored in the block, so
//! `cid.hash().digest() == hasher.digest(bytes)` holds for any [`Block`] this
//! module hands out.

use cid::multihash::Multihash;
use cid::Cid;
use thiserror::Error;

use crate::codec::{CodecError, Decoder, Encoder};
use crate::hasher::Hasher;

/// Largest digest (in bytes) a CID produced by this crate can carry.
pub const MAX_DIGEST_SIZE: usize = 64;

#[derive(Error, Debug)]
pub enum BlockError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("Digest does not fit in a CID: {0}")]
    Multihash(#[from] cid::multihash::Error),
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
    #[error("Hasher 0x{actual:x} cannot verify a CID hashed with 0x{expected:x}")]
    HasherMismatch { expected: u64, actual: u64 },
}

/// An immutable (value, bytes, CID) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<T> {
    value: T,
    bytes: Vec<u8>,
    cid:   Cid,
}

impl<T> Block<T> {
    pub fn value(&self) -> &T { &self.value }
    pub fn bytes(&self) -> &[u8] { &self.bytes }
    pub fn cid(&self) -> &Cid { &self.cid }
    pub fn into_value(self) -> T { self.value }

    /// Split into `(value, bytes, cid)`.
    pub fn into_parts(self) -> (T, Vec<u8>, Cid) {
        (self.value, self.bytes, self.cid)
    }

    /// Re-digest the stored bytes and compare with the CID.
    pub fn verify(&self, hasher: &dyn Hasher) -> Result<(), BlockError> {
        check_digest(&self.cid, &self.bytes, hasher)
    }
}

/// Encode `value` and hash the result.
pub fn encode<T>(
    value:   T,
    encoder: &dyn Encoder<T>,
    hasher:  &dyn Hasher,
) -> Result<Block<T>, BlockError> {
    let bytes = encoder.encode(&value)?;
    let cid = make_cid(encoder.code(), &bytes, hasher)?;
    Ok(Block { value, bytes, cid })
}

/// Decode `bytes` and hash them.
pub fn decode<T>(
    bytes:   Vec<u8>,
    decoder: &dyn Decoder<T>,
    hasher:  &dyn Hasher,
) -> Result<Block<T>, BlockError> {
    let value = decoder.decode(&bytes)?;
    let cid = make_cid(decoder.code(), &bytes, hasher)?;
    Ok(Block { value, bytes, cid })
}

/// Build a block from bytes that claim to match `cid`.
///
/// The digest is checked before decoding; a mismatch never reaches the
/// decoder.
pub fn create<T>(
    bytes:   Vec<u8>,
    cid:     Cid,
    decoder: &dyn Decoder<T>,
    hasher:  &dyn Hasher,
) -> Result<Block<T>, BlockError> {
    check_digest(&cid, &bytes, hasher)?;
    let value = decoder.decode(&bytes)?;
    Ok(Block { value, bytes, cid })
}

fn make_cid(codec: u64, bytes: &[u8], hasher: &dyn Hasher) -> Result<Cid, BlockError> {
    let digest = hasher.digest(bytes);
    let mh = Multihash::<MAX_DIGEST_SIZE>::wrap(hasher.code(), &digest)?;
    Ok(Cid::new_v1(codec, mh))
}

fn check_digest(cid: &Cid, bytes: &[u8], hasher: &dyn Hasher) -> Result<(), BlockError> {
    let mh = cid.hash();
    if mh.code() != hasher.code() {
        return Err(BlockError::HasherMismatch {
            expected: mh.code(),
            actual:   hasher.code(),
        });
    }
    let computed = hasher.digest(bytes);
    if computed.as_slice() != mh.digest() {
        return Err(BlockError::HashMismatch {
            expected: hex::encode(mh.digest()),
            actual:   hex::encode(&computed),
        });
    }
    Ok(())
}
