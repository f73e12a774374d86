//! The legacy-binary record layout (types 3 through 8).
//!
//! These records predate the tagged grammar: a 4-byte big-endian length
//! prefix covering the whole record, then opaque fixed-layout content.
//! The codec has no round-trippable structured form for them, so the
//! record keeps its exact on-wire bytes, prefix included.

use log::trace;

use crate::an2k::cursor::Cursor;
use crate::an2k::error::{An2kError, Result};
use crate::an2k::types::{MIN_BINARY_RECORD_SIZE, Record, RecordBody};
use crate::an2k::utils::read_be_u32;

/// Consumes one legacy-binary record.
///
/// Byte 4 of the record, right after the length prefix, is its IDC; it is
/// captured so the record plan can be regenerated from the record alone.
///
/// # Errors
/// - [`An2kError::UnexpectedEof`] when fewer than four bytes remain for
///   the length prefix.
/// - [`An2kError::InvalidBinaryLength`] when the declared length is below
///   the 8-byte minimum or exceeds the remaining input.
pub fn parse_binary_record(cursor: &mut Cursor<'_>, record_type: i32) -> Result<Record> {
    if cursor.remaining() < 4 {
        return Err(An2kError::UnexpectedEof {
            context: "binary record length prefix",
        });
    }

    let start = cursor.position();
    let declared = read_be_u32(cursor.slice(start, start + 4));
    if declared < MIN_BINARY_RECORD_SIZE || declared as usize > cursor.remaining() {
        return Err(An2kError::InvalidBinaryLength {
            declared,
            remaining: cursor.remaining(),
        });
    }

    cursor.advance(declared as usize);
    let raw = cursor.slice(start, start + declared as usize).to_vec();
    let idc = if raw.len() > 4 { raw[4] as i32 } else { -1 };
    trace!(
        "Binary record type {} at offset {}: {} bytes, idc {}",
        record_type,
        start,
        raw.len(),
        idc
    );

    Ok(Record {
        record_type,
        idc,
        body: RecordBody::Binary(raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::an2k::utils::read_be_u32;

    fn binary_bytes(declared: u32, total: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; total];
        bytes[0..4].copy_from_slice(&declared.to_be_bytes());
        if total > 4 {
            bytes[4] = 2; // idc
        }
        bytes
    }

    #[test]
    fn slices_record_including_prefix() {
        let bytes = binary_bytes(12, 16);
        let mut cursor = Cursor::new(&bytes);
        let record = parse_binary_record(&mut cursor, 4).unwrap();

        assert!(record.is_binary_record());
        assert_eq!(record.record_type, 4);
        assert_eq!(record.idc, 2);
        assert_eq!(record.raw_record().len(), 12);
        assert_eq!(read_be_u32(&record.raw_record()[0..4]), 12);
        // Trailing bytes past the declared length are left unconsumed.
        assert_eq!(cursor.position(), 12);
    }

    #[test]
    fn rejects_length_below_minimum() {
        let bytes = binary_bytes(7, 16);
        let mut cursor = Cursor::new(&bytes);
        let err = parse_binary_record(&mut cursor, 4).unwrap_err();
        assert!(matches!(
            err,
            An2kError::InvalidBinaryLength { declared: 7, .. }
        ));
    }

    #[test]
    fn rejects_length_past_remaining_input() {
        let bytes = binary_bytes(64, 16);
        let mut cursor = Cursor::new(&bytes);
        let err = parse_binary_record(&mut cursor, 6).unwrap_err();
        assert!(matches!(
            err,
            An2kError::InvalidBinaryLength {
                declared: 64,
                remaining: 16
            }
        ));
    }

    #[test]
    fn rejects_truncated_prefix() {
        let bytes = [0x00, 0x00, 0x00];
        let mut cursor = Cursor::new(&bytes);
        let err = parse_binary_record(&mut cursor, 3).unwrap_err();
        assert!(matches!(err, An2kError::UnexpectedEof { .. }));
    }
}
