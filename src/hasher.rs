//! Hash-function contract and the built-in multihash hashers.

use sha2::Digest;

// ── Multihash codes ──────────────────────────────────────────────────────────

/// Identity — the "digest" is the input itself.
pub const IDENTITY: u64 = 0x00;
/// SHA2-256, the default hasher of every registry.
pub const SHA2_256: u64 = 0x12;
/// SHA2-512.
pub const SHA2_512: u64 = 0x13;
/// BLAKE3 with the default 32-byte output.
pub const BLAKE3:   u64 = 0x1e;

/// Computes a fixed-format digest over a byte sequence.
///
/// `code` is the multihash code written into every CID produced with this
/// hasher; `name` is the multihash table name (diagnostics and config only).
/// `digest` must return the same number of bytes for every input; [`Identity`]
/// is the one exception, its digest being the input itself.
pub trait Hasher: Send + Sync {
    fn code(&self) -> u64;
    fn name(&self) -> &'static str;
    fn digest(&self, bytes: &[u8]) -> Vec<u8>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256;
impl Hasher for Sha256 {
    fn code(&self) -> u64 { SHA2_256 }
    fn name(&self) -> &'static str { "sha2-256" }
    fn digest(&self, bytes: &[u8]) -> Vec<u8> { sha2::Sha256::digest(bytes).to_vec() }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512;
impl Hasher for Sha512 {
    fn code(&self) -> u64 { SHA2_512 }
    fn name(&self) -> &'static str { "sha2-512" }
    fn digest(&self, bytes: &[u8]) -> Vec<u8> { sha2::Sha512::digest(bytes).to_vec() }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3;
impl Hasher for Blake3 {
    fn code(&self) -> u64 { BLAKE3 }
    fn name(&self) -> &'static str { "blake3" }
    fn digest(&self, bytes: &[u8]) -> Vec<u8> { blake3::hash(bytes).as_bytes().to_vec() }
}

/// Inlines the input as its own digest.  Only sensible for tiny payloads;
/// anything over 64 bytes will not fit in a CID.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;
impl Hasher for Identity {
    fn code(&self) -> u64 { IDENTITY }
    fn name(&self) -> &'static str { "identity" }
    fn digest(&self, bytes: &[u8]) -> Vec<u8> { bytes.to_vec() }
}

// ── Factory ──────────────────────────────────────────────────────────────────

/// Resolve a multihash table name to a built-in hasher.
///
/// Returns `None` for names this build does not ship.
pub fn hasher_by_name(name: &str) -> Option<Box<dyn Hasher>> {
    match name.to_lowercase().as_str() {
        "sha2-256" => Some(Box::new(Sha256)),
        "sha2-512" => Some(Box::new(Sha512)),
        "blake3"   => Some(Box::new(Blake3)),
        "identity" => Some(Box::new(Identity)),
        _          => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex::encode(Sha256.digest(b"hello")),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
        );
    }

    #[test]
    fn digest_lengths_are_fixed() {
        assert_eq!(Sha256.digest(b"").len(), 32);
        assert_eq!(Sha256.digest(&[7u8; 4096]).len(), 32);
        assert_eq!(Sha512.digest(b"abc").len(), 64);
        assert_eq!(Blake3.digest(b"abc").len(), 32);
        assert_eq!(Blake3.digest(b"abc"), blake3::hash(b"abc").as_bytes().to_vec());
    }

    #[test]
    fn identity_returns_input() {
        assert_eq!(Identity.digest(b"tiny"), b"tiny".to_vec());
    }

    #[test]
    fn resolve_by_name() {
        assert_eq!(hasher_by_name("sha2-256").unwrap().code(), SHA2_256);
        assert_eq!(hasher_by_name("BLAKE3").unwrap().code(), BLAKE3);
        assert_eq!(hasher_by_name("sha2-512").unwrap().name(), "sha2-512");
        assert!(hasher_by_name("md5").is_none());
    }
}
