//! Content hashing for file identity.

use xxhash_rust::xxh3::xxh3_64;

/// Hash file content with xxh3. Stable across builds for unchanged bytes.
pub fn hash_content(content: &[u8]) -> u64 {
    xxh3_64(content)
}
