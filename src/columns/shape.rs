//! Shape identifiers for result sets
//!
//! A shape id is the first 8 bytes of a SHA-256 over the sorted,
//! de-duplicated column names, hex-encoded. Column order does not change
//! the id; adding or removing a column does.
//!
//! ```text
//! shape_id = hex(SHA-256(name_0 || 0x1f || name_1 || ...)[0:8])
//! ```

use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt::Write;

const SEPARATOR: u8 = 0x1f;

/// Stable identifier for the column set of a result
#[must_use]
pub fn shape_id<S: AsRef<str>>(columns: &[S]) -> String {
    let sorted: BTreeSet<&str> = columns.iter().map(AsRef::as_ref).collect();
    let mut hasher = Sha256::new();
    for (i, name) in sorted.iter().enumerate() {
        if i > 0 {
            hasher.update([SEPARATOR]);
        }
        hasher.update(name.as_bytes());
    }
    let hash = hasher.finalize();

    hash[..8].iter().fold(String::with_capacity(16), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independent() {
        assert_eq!(shape_id(&["id", "name", "city"]), shape_id(&["city", "id", "name"]));
    }

    #[test]
    fn test_duplicates_ignored() {
        assert_eq!(shape_id(&["id", "name", "name"]), shape_id(&["id", "name"]));
    }

    #[test]
    fn test_distinct_sets_differ() {
        assert_ne!(shape_id(&["id", "name"]), shape_id(&["id", "name", "city"]));
        // separator keeps ["ab","c"] apart from ["a","bc"]
        assert_ne!(shape_id(&["ab", "c"]), shape_id(&["a", "bc"]));
    }

    #[test]
    fn test_fixed_width_hex() {
        let id = shape_id(&["id"]);
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_known_digest_prefix() {
        // the shape id of a single column is the first 8 bytes of its digest
        let full = Sha256::digest(b"id");
        let expected: String = full[..8].iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(shape_id(&["id"]), expected);
    }
}
