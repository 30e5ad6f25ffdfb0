#![no_main]

use libfuzzer_sys::fuzz_target;
use modcheck_core::listing::{encode_listing, row_count, BYTES_PER_ROW};

fuzz_target!(|data: &[u8]| {
    let listing = encode_listing(data);
    let rows: Vec<&str> = listing.lines().collect();
    assert_eq!(rows.len(), row_count(data.len()));
    assert_eq!(listing.ends_with('\n'), !data.is_empty());

    let mut decoded = Vec::with_capacity(data.len());
    for (i, row) in rows.iter().enumerate() {
        let body = row.strip_prefix("  ").expect("row not indented");
        let body = match body.strip_suffix(',') {
            Some(body) => {
                assert!(i + 1 < rows.len(), "last row ends with a comma");
                body
            }
            None => {
                assert_eq!(i + 1, rows.len(), "inner row lacks a comma");
                body
            }
        };
        let literals: Vec<&str> = body.split(", ").collect();
        assert!(literals.len() <= BYTES_PER_ROW);
        for literal in literals {
            let hex = literal.strip_prefix("0x").expect("literal without 0x");
            assert_eq!(hex, hex.to_ascii_lowercase());
            decoded.push(u8::from_str_radix(hex, 16).expect("bad hex literal"));
        }
    }
    assert_eq!(decoded, data);
});
