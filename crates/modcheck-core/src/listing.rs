//! Hex array listings for embedding module fixtures in source.
//!
//! A listing is a sequence of lines joined with `\n`: one line per row of
//! up to [`BYTES_PER_ROW`] bytes, then a single empty line. Each row is
//! indented by two spaces and holds `0x`-prefixed lowercase byte literals
//! separated by `", "`. Every row except the last ends with a comma.
//!
//! ```
//! use modcheck_core::listing::encode_listing;
//!
//! assert_eq!(encode_listing(&[0x01, 0x02, 0x03]), "  0x01, 0x02, 0x03\n");
//! assert_eq!(encode_listing(&[]), "");
//! ```

use std::fmt::Write;

/// Bytes rendered on each row.
pub const BYTES_PER_ROW: usize = 16;

/// Width of one rendered row: indent, literals, separators and the comma.
const ROW_CAPACITY: usize = 2 + BYTES_PER_ROW * 4 + (BYTES_PER_ROW - 1) * 2 + 2;

/// Number of data rows a blob of `len` bytes occupies.
pub fn row_count(len: usize) -> usize {
    len.div_ceil(BYTES_PER_ROW)
}

/// Render `data` as a hex array listing.
pub fn encode_listing(data: &[u8]) -> String {
    let rows = row_count(data.len());
    let mut out = String::with_capacity(rows * ROW_CAPACITY);

    for (i, row) in data.chunks(BYTES_PER_ROW).enumerate() {
        out.push_str("  ");
        for (j, byte) in row.iter().enumerate() {
            if j > 0 {
                out.push_str(", ");
            }
            // Writing into a String cannot fail.
            let _ = write!(out, "0x{:02x}", byte);
        }
        if i + 1 < rows {
            out.push(',');
        }
        out.push('\n');
    }

    out
}
