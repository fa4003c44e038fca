//! Checksum calculation for input deduplication.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 checksum of raw input bytes.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Checksum over several byte slices, each length-prefixed so that
/// `["ab", "c"]` and `["a", "bc"]` hash differently.
pub fn calculate_checksum_parts(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}
