//! Word normalization for ingest and query terms.
//!
//! Alphanumeric means ASCII `[0-9A-Za-z]`; non-ASCII bytes count as
//! punctuation.

/// Return the first maximal alphanumeric run of `s` as a subslice.
///
/// Leading non-alphanumerics are skipped, the run ends at the next
/// non-alphanumeric. A string with no alphanumerics yields `""`.
pub fn remove_punctuation(s: &str) -> &str {
    let bytes = s.as_bytes();
    let start = bytes
        .iter()
        .position(|b| b.is_ascii_alphanumeric())
        .unwrap_or(bytes.len());
    let len = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    // ASCII-delimited, so both ends are char boundaries
    &s[start..start + len]
}

/// Same run as [`remove_punctuation`], case-folded to lowercase.
pub fn normalize(s: &str) -> String {
    remove_punctuation(s).to_ascii_lowercase()
}
