// Text helpers for fixed-width metadata fields

use encoding_rs::WINDOWS_1252;

/// Longest string measured from any metadata field
pub const MAX_FIELD_LEN: usize = 256;

/// Length of a NUL-terminated field, capped at `MAX_FIELD_LEN`
pub fn field_len(data: &[u8]) -> usize {
    let limit = data.len().min(MAX_FIELD_LEN);
    data[..limit]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(limit)
}

/// Decode a fixed-width, NUL-padded field.
///
/// SPC dumps are nominally ASCII; anything above 0x7F is read as
/// Windows-1252 so the result is always valid UTF-8. Trailing spaces are
/// dropped.
pub fn decode_field(data: &[u8]) -> String {
    let raw = &data[..field_len(data)];
    WINDOWS_1252.decode(raw).0.trim_end().to_string()
}

/// Parse leading ASCII digits the way the original tool does: stop at the
/// first non-digit, an empty prefix reads as 0.
pub fn scan_uint(s: &str) -> u32 {
    s.bytes()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u32, |num, b| num.wrapping_mul(10).wrapping_add((b - b'0') as u32))
}
