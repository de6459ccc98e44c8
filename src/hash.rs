//! Content hashing
//!
//! All hashes are SHA-256 rendered as `sha256:<hex>` so they remain
//! self-describing in the persisted manifest.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::ForgeResult;

/// Compute the content hash of a byte slice
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

/// Compute the content hash of a string
pub fn hash_content(content: &str) -> String {
    hash_bytes(content.as_bytes())
}

/// Compute the content hash of a file on disk
pub fn hash_file(path: &Path) -> ForgeResult<String> {
    let bytes = std::fs::read(path)?;
    Ok(hash_bytes(&bytes))
}
