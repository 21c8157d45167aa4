//! Codec contracts and the built-in codecs.
//!
//! # Identity rules
//! Every codec is identified by a multicodec code (`u64`).  The code is:
//!   - The key under which the codec is registered in a [`Registry`].
//!   - Embedded in the CID of every block the codec produces.
//!
//! An encoder and a decoder registered under the same code are expected to
//! be inverses of each other.  Nothing in this crate enforces that.
//!
//! [`Registry`]: crate::registry::Registry

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

// ── Multicodec codes ────────────────────────────────────────────────────────
//
// Values from the public multicodec table.  Only the codecs shipped by this
// crate plus the common IPLD ones are listed here.

/// Raw binary — bytes stored verbatim.
pub const RAW:      u64 = 0x55;
/// DAG-PB (protobuf merkle DAG).
pub const DAG_PB:   u64 = 0x70;
/// DAG-CBOR.
pub const DAG_CBOR: u64 = 0x71;
/// DAG-JSON.
pub const DAG_JSON: u64 = 0x0129;
/// Plain JSON.
pub const JSON:     u64 = 0x0200;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Encode error ({codec}): {reason}")]
    Encode { codec: &'static str, reason: String },
    #[error("Decode error ({codec}): {reason}")]
    Decode { codec: &'static str, reason: String },
}

// ── Codec traits ─────────────────────────────────────────────────────────────

/// Converts a typed value into bytes.
pub trait Encoder<T>: Send + Sync {
    fn code(&self) -> u64;
    fn name(&self) -> &'static str;
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError>;
}

/// Converts bytes back into a typed value.
pub trait Decoder<T>: Send + Sync {
    fn code(&self) -> u64;
    fn name(&self) -> &'static str;
    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

// ── Built-in codec implementations ──────────────────────────────────────────

/// Identity codec: the value's bytes are the encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl<T> Encoder<T> for RawCodec
where
    T: AsRef<[u8]>,
{
    fn code(&self) -> u64 { RAW }
    fn name(&self) -> &'static str { "raw" }
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> { Ok(value.as_ref().to_vec()) }
}

impl<T> Decoder<T> for RawCodec
where
    T: From<Vec<u8>>,
{
    fn code(&self) -> u64 { RAW }
    fn name(&self) -> &'static str { "raw" }
    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> { Ok(T::from(bytes.to_vec())) }
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T> Encoder<T> for JsonCodec
where
    T: Serialize,
{
    fn code(&self) -> u64 { JSON }
    fn name(&self) -> &'static str { "json" }
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode {
            codec:  "json",
            reason: e.to_string(),
        })
    }
}

impl<T> Decoder<T> for JsonCodec
where
    T: DeserializeOwned,
{
    fn code(&self) -> u64 { JSON }
    fn name(&self) -> &'static str { "json" }
    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode {
            codec:  "json",
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        size: u64,
    }

    #[test]
    fn raw_codec_is_identity() {
        let data = b"hello".to_vec();
        let bytes = Encoder::<Vec<u8>>::encode(&RawCodec, &data).unwrap();
        assert_eq!(bytes, data);
        let back: Vec<u8> = Decoder::decode(&RawCodec, &bytes).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn json_codec_encodes_struct() {
        let rec = Record { name: "a.txt".into(), size: 12 };
        let bytes = JsonCodec.encode(&rec).unwrap();
        assert_eq!(bytes, br#"{"name":"a.txt","size":12}"#);
        let back: Record = JsonCodec.decode(&bytes).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn json_codec_rejects_malformed_input() {
        let err = Decoder::<BTreeMap<String, u64>>::decode(&JsonCodec, b"{not json").unwrap_err();
        assert!(matches!(err, CodecError::Decode { codec: "json", .. }));
        assert!(err.to_string().contains("json"));
    }

    #[test]
    fn codes_match_multicodec_table() {
        assert_eq!(Encoder::<Vec<u8>>::code(&RawCodec), 0x55);
        assert_eq!(Encoder::<Vec<u8>>::code(&JsonCodec), 0x0200);
    }
}
