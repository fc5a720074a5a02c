//! BLAKE3 helpers for identifiers, seeds, and log-friendly key digests.
//!
//! Cache keys themselves are readable pipe-delimited strings (see
//! [`crate::context::SearchContext::cache_key`]); hashing is used where an opaque,
//! fixed-width value is wanted.

use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Used for deterministic RNG seeds and short digests. With 64 bits the collision
/// probability stays negligible for the handful of entries an in-process cache holds;
/// a collision only ever means two records share synthesized defaults.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Hashes several string parts with a `|` separator so `("ab","c")` and `("a","bc")` differ.
#[inline]
pub fn hash_parts(parts: &[&str]) -> u64 {
    let mut hasher = Hasher::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(part.as_bytes());
    }

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Opaque, stable restaurant identifier derived from the normalised name and address.
///
/// The same venue returned by two provider calls gets the same id, which keeps
/// identifiers stable between a live response and its cached replay.
pub fn restaurant_id(name: &str, address: &str) -> String {
    let name = name.trim().to_lowercase();
    let address = address.trim().to_lowercase();
    format!("rst_{:016x}", hash_parts(&[&name, &address]))
}

/// Short hex digest of a cache key for log fields (keys can carry user text).
#[inline]
pub fn key_digest(key: &str) -> String {
    format!("{:016x}", hash_to_u64(key.as_bytes()))
}
