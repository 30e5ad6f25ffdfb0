//! Property-based tests for listings and fingerprints.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p modcheck-tests --test proptest_listing
//! ```

use proptest::prelude::*;

use modcheck_core::listing::{encode_listing, row_count, BYTES_PER_ROW};
use modcheck_core::{Fingerprint, HashAlgorithm};

/// Recover the bytes from a listing by reading its literals back.
fn decode(listing: &str) -> Vec<u8> {
    listing
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| u8::from_str_radix(tok.trim_start_matches("0x"), 16).unwrap())
        .collect()
}

// ============================================================================
// 1. Listing shape
// ============================================================================

proptest! {
    /// One line per started row of sixteen bytes.
    #[test]
    fn line_count_matches_rows(data in prop::collection::vec(any::<u8>(), 0..200)) {
        let listing = encode_listing(&data);
        prop_assert_eq!(listing.lines().count(), row_count(data.len()));
        prop_assert_eq!(row_count(data.len()), data.len().div_ceil(BYTES_PER_ROW));
    }

    /// The listing ends with a newline exactly when there is data.
    #[test]
    fn trailing_newline_iff_nonempty(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let listing = encode_listing(&data);
        prop_assert_eq!(listing.ends_with('\n'), !data.is_empty());
        prop_assert!(!listing.ends_with(",\n"));
    }

    /// Every row is indented, holds at most sixteen literals, and all rows
    /// but the last end with a comma.
    #[test]
    fn rows_are_well_formed(data in prop::collection::vec(any::<u8>(), 1..200)) {
        let listing = encode_listing(&data);
        let rows: Vec<&str> = listing.lines().collect();
        for (i, row) in rows.iter().enumerate() {
            prop_assert!(row.starts_with("  0x"));
            prop_assert!(!row.starts_with("   "));
            prop_assert!(row.matches("0x").count() <= BYTES_PER_ROW);
            prop_assert_eq!(row.ends_with(','), i + 1 < rows.len());
        }
    }

    /// Literals are lowercase two-digit hex.
    #[test]
    fn literals_are_lowercase(data in prop::collection::vec(any::<u8>(), 1..64)) {
        let listing = encode_listing(&data);
        prop_assert_eq!(listing.to_ascii_lowercase(), listing.clone());
        let tokens = listing
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tok| !tok.is_empty());
        for token in tokens {
            prop_assert!(token.starts_with("0x"));
            prop_assert_eq!(token.len(), 4);
        }
    }

    /// Reading the literals back yields the original bytes in order.
    #[test]
    fn listing_preserves_bytes(data in prop::collection::vec(any::<u8>(), 0..300)) {
        prop_assert_eq!(decode(&encode_listing(&data)), data);
    }
}

// ============================================================================
// 2. Fingerprints
// ============================================================================

proptest! {
    /// Digests are lowercase hex of the algorithm's length.
    #[test]
    fn digest_shape(data in prop::collection::vec(any::<u8>(), 0..256)) {
        for algorithm in [HashAlgorithm::Md5, HashAlgorithm::Blake3] {
            let digest = algorithm.digest(&data);
            prop_assert_eq!(digest.as_str().len(), algorithm.hex_len());
            prop_assert!(digest.as_str().chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    /// Parsing ignores case and surrounding whitespace.
    #[test]
    fn parse_is_case_insensitive(hex in "[0-9a-fA-F]{1,64}", pad in "[ \t\n]{0,3}") {
        let padded = format!("{}{}{}", pad, hex, pad);
        let parsed = Fingerprint::parse(&padded).unwrap();
        prop_assert_eq!(parsed.as_str(), hex.to_ascii_lowercase());
        prop_assert_eq!(parsed, Fingerprint::parse(&hex.to_ascii_uppercase()).unwrap());
    }

    /// Anything with a non-hex character is rejected rather than compared.
    #[test]
    fn parse_rejects_non_hex(prefix in "[0-9a-f]{0,8}", bad in "[g-zG-Z_\\-!]") {
        let input = format!("{}{}", prefix, bad);
        prop_assert!(Fingerprint::parse(&input).is_err());
    }
}
