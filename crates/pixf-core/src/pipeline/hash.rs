//! Content hashing for exact deduplication.

use blake3::Hasher as Blake3Hasher;
use std::fmt;

/// 256-bit content digest, used only as an identity key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex form, for logs.
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Computes BLAKE3 digests of in-memory blobs.
pub struct ContentHasher;

impl ContentHasher {
    /// Hash a byte buffer. Deterministic across runs and platforms.
    pub fn hash(data: &[u8]) -> Digest {
        let mut hasher = Blake3Hasher::new();
        hasher.update(data);
        Digest(*hasher.finalize().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = ContentHasher::hash(b"embedded image bytes");
        let b = ContentHasher::hash(b"embedded image bytes");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_content_different_digest() {
        let a = ContentHasher::hash(b"image one");
        let b = ContentHasher::hash(b"image two");
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_vector() {
        // BLAKE3 of the empty input
        let digest = ContentHasher::hash(b"");
        assert_eq!(
            digest.to_hex(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
        assert_eq!(digest.as_bytes().len(), 32);
    }
}
