//! Low-level byte decoding utilities.

use byteorder::{BigEndian, ByteOrder};

use super::cursor::Cursor;

/// Reads a big-endian unsigned 32-bit integer from the front of `bytes`.
///
/// Returns `0` when fewer than four bytes are available; callers that care
/// about the distinction are expected to have checked the length first.
pub fn read_be_u32(bytes: &[u8]) -> u32 {
    if bytes.len() < 4 {
        return 0;
    }
    BigEndian::read_u32(bytes)
}

/// Consumes bytes up to but not including `delimiter`, returning them.
///
/// Stops at EOF without error; the delimiter itself is left unconsumed.
pub fn take_until(cursor: &mut Cursor<'_>, delimiter: u8) -> Vec<u8> {
    let start = cursor.position();
    while !cursor.done() && cursor.peek() != delimiter {
        cursor.advance(1);
    }
    cursor.slice(start, cursor.position()).to_vec()
}

/// Parses an ASCII decimal number, treating any malformed input as zero.
///
/// Length fields in damaged files routinely carry non-digit bytes; an
/// unknown length is represented as `0` rather than an error so the
/// tagged grammar stays total.
pub fn parse_decimal(bytes: &[u8]) -> usize {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|text| text.parse().ok())
        .unwrap_or(0)
}

/// True for record types whose on-wire form is the legacy length-prefixed
/// binary layout (fingerprint and signature image types 3 through 8).
pub fn is_legacy_binary_type(record_type: i32) -> bool {
    matches!(record_type, 3..=8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_u32() {
        assert_eq!(read_be_u32(&[0x00, 0x00, 0x3A, 0x10]), 14864);
        assert_eq!(read_be_u32(&[0x01, 0x02, 0x03, 0x04, 0xFF]), 0x01020304);
    }

    #[test]
    fn short_buffer_reads_as_zero() {
        assert_eq!(read_be_u32(&[]), 0);
        assert_eq!(read_be_u32(&[0xFF, 0xFF, 0xFF]), 0);
    }

    #[test]
    fn take_until_leaves_delimiter_unconsumed() {
        let mut cursor = Cursor::new(b"1.001:42");
        assert_eq!(take_until(&mut cursor, b':'), b"1.001");
        assert_eq!(cursor.peek(), b':');
    }

    #[test]
    fn take_until_stops_at_eof() {
        let mut cursor = Cursor::new(b"abc");
        assert_eq!(take_until(&mut cursor, b';'), b"abc");
        assert!(cursor.done());
    }

    #[test]
    fn parses_decimal_or_zero() {
        assert_eq!(parse_decimal(b"14864"), 14864);
        assert_eq!(parse_decimal(b"000120"), 120);
        assert_eq!(parse_decimal(b""), 0);
        assert_eq!(parse_decimal(b"12a4"), 0);
        assert_eq!(parse_decimal(&[0xFF, 0xFE]), 0);
    }

    #[test]
    fn classifies_legacy_binary_types() {
        for record_type in [3, 4, 5, 6, 7, 8] {
            assert!(is_legacy_binary_type(record_type));
        }
        for record_type in [1, 2, 9, 10, 11, 12, 14, 17] {
            assert!(!is_legacy_binary_type(record_type));
        }
    }
}
