//! On-disk naming for [`FileStore`](super::FileStore)
//!
//! A collection's bucket directory is its canonical name with every byte
//! outside `[A-Za-z0-9 _-]` percent-encoded, so `Future/October 2025` lives in
//! `Future%2FOctober 2025`.

use std::fmt::Write;

/// Catalog file directly under the journal root.
pub const INDEX_FILE: &str = "index.json";

/// Extension of entry files.
pub const ENTRY_EXTENSION: &str = "json";

const fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b' ' | b'_' | b'-')
}

/// Directory name for a collection.
pub fn encode_bucket(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        if is_plain(byte) {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

/// Collection name for a directory, `None` if it is not a bucket name.
pub fn decode_bucket(dir: &str) -> Option<String> {
    let bytes = dir.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while let Some(&byte) = bytes.get(idx) {
        if byte == b'%' {
            let hex = dir.get(idx + 1..idx + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            idx += 3;
        } else if is_plain(byte) {
            out.push(byte);
            idx += 1;
        } else {
            return None;
        }
    }
    let name = String::from_utf8(out).ok()?;
    (!name.trim().is_empty()).then_some(name)
}

/// File name for an entry id.
pub fn entry_file_name(id: &str) -> String {
    format!("{}.{ENTRY_EXTENSION}", encode_bucket(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_name_is_flat_directory() {
        assert_eq!(encode_bucket("Future/October 2025"), "Future%2FOctober 2025");
        assert_eq!(
            decode_bucket("Future%2FOctober 2025").as_deref(),
            Some("Future/October 2025")
        );
    }

    #[test]
    fn test_non_ascii_survives() {
        let encoded = encode_bucket("Café ☕");
        assert!(encoded.is_ascii());
        assert_eq!(decode_bucket(&encoded).as_deref(), Some("Café ☕"));
    }

    #[test]
    fn test_foreign_directories_are_rejected() {
        assert_eq!(decode_bucket(".git"), None);
        assert_eq!(decode_bucket("bad%2"), None);
        assert_eq!(decode_bucket("%ZZ"), None);
        assert_eq!(decode_bucket(""), None);
    }

    #[test]
    fn test_entry_file_name() {
        assert_eq!(entry_file_name("b1"), "b1.json");
    }
}
