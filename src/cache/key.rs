//! Cache Key Module
//!
//! Maps caller-supplied keys to filesystem-safe disk file names.

// == Validation ==
/// Returns true if the key can be stored. Any non-empty string is accepted.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
}

// == Digest ==
/// Derives the disk file name for a key: the MD5 digest of its UTF-8 bytes
/// rendered as 32 lowercase hex characters.
///
/// Not a security boundary; collisions are accepted.
pub fn disk_file_name(key: &str) -> String {
    format!("{:x}", md5::compute(key.as_bytes()))
}
