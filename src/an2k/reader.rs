//! File-level parsing: Type-1 orchestration and plan-driven dispatch.

use log::{debug, info, trace, warn};

use crate::an2k::cursor::Cursor;
use crate::an2k::error::Result;
use crate::an2k::format::{binary, tagged};
use crate::an2k::plan;
use crate::an2k::types::{An2kFile, FS, GS, Record, RecordBody};
use crate::an2k::utils::is_legacy_binary_type;

/// Parses a complete AN2K container from a byte buffer.
///
/// The Type-1 transaction record is parsed first; its CNT directory then
/// drives the dispatch of every subsequent record to the tagged or
/// legacy-binary grammar. The plan is authoritative for record count,
/// ordering, and each record's `type` and `idc`, overriding whatever the
/// record bytes carry internally; trailing bytes past the plan are
/// ignored.
///
/// Tagged parsing is tolerant and degrades malformed regions to partial
/// structures; after each tagged record the cursor is re-synced to the
/// record's declared length, which absorbs any drift from padding or
/// unknown trailing fields.
///
/// # Errors
/// Returns [`An2kError::UnexpectedEof`](crate::An2kError::UnexpectedEof)
/// or [`An2kError::InvalidBinaryLength`](crate::An2kError::InvalidBinaryLength)
/// when a legacy-binary record's length prefix is unreadable or out of
/// range; these abort the whole parse.
pub fn parse_file(buffer: &[u8]) -> Result<An2kFile> {
    info!("Parsing container: {} bytes", buffer.len());
    let mut cursor = Cursor::new(buffer);
    let mut file = An2kFile::default();

    if cursor.done() {
        // An empty input yields a lone field-less Type-1 record.
        file.records.push(Record {
            record_type: 1,
            idc: -1,
            body: RecordBody::Tagged(Vec::new()),
        });
        return Ok(file);
    }

    let type1_start = cursor.position();
    let mut type1 = tagged::parse_record(&mut cursor);
    type1.record_type = 1;
    type1.idc = -1;
    sync_to_length(&mut cursor, type1_start, &type1);
    skip_separators(&mut cursor);

    let record_plan = plan::extract_record_plan(&type1);
    debug!("Record plan: {} entries", record_plan.len());
    file.records.push(type1);

    for entry in record_plan {
        if cursor.remaining() < 4 {
            warn!(
                "Input truncated before type {} record; stopping",
                entry.record_type
            );
            break;
        }

        let record_start = cursor.position();
        let mut record = if is_legacy_binary_type(entry.record_type) {
            binary::parse_binary_record(&mut cursor, entry.record_type)?
        } else {
            let record = tagged::parse_record(&mut cursor);
            sync_to_length(&mut cursor, record_start, &record);
            record
        };
        skip_separators(&mut cursor);

        // The plan wins over whatever identity the record bytes carry.
        record.record_type = entry.record_type;
        record.idc = entry.idc;
        file.records.push(record);
    }

    debug!("Parsed {} records", file.records.len());
    Ok(file)
}

/// Repositions the cursor to the end declared by a record's length field.
///
/// The tagged grammar can consume more or fewer bytes than the record
/// declares when padding or unknown trailing fields are present; the
/// declared length, measured from the record's first byte, is the
/// authoritative boundary. A missing, zero, or out-of-bounds length
/// leaves the cursor where the grammar stopped.
fn sync_to_length(cursor: &mut Cursor<'_>, record_start: usize, record: &Record) {
    let Some(first_field) = record.fields().first() else {
        return;
    };
    let declared = tagged::declared_length(first_field);
    if declared > 0 && record_start + declared <= cursor.size() {
        trace!("Syncing cursor to declared end {}", record_start + declared);
        cursor.seek(record_start + declared);
    }
}

/// Skips FS and GS separator bytes between records.
fn skip_separators(cursor: &mut Cursor<'_>) {
    while !cursor.done() && (cursor.peek() == FS || cursor.peek() == GS) {
        cursor.advance(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_lone_type1() {
        let file = parse_file(&[]).unwrap();
        assert_eq!(file.records.len(), 1);
        assert_eq!(file.records[0].record_type, 1);
        assert_eq!(file.records[0].idc, -1);
        assert!(!file.records[0].is_binary_record());
        assert!(file.records[0].fields().is_empty());
    }

    #[test]
    fn type1_identity_is_forced() {
        // Tags claim record type 9; the leading record is still Type-1.
        let file = parse_file(b"9.001:7\x1C").unwrap();
        assert_eq!(file.records.len(), 1);
        assert_eq!(file.records[0].record_type, 1);
        assert_eq!(file.records[0].idc, -1);
    }

    #[test]
    fn missing_cnt_yields_only_type1() {
        let file = parse_file(b"1.001:100\x1D2.001:DOE\x1Ctrailing junk").unwrap();
        assert_eq!(file.records.len(), 1);
    }

    #[test]
    fn plan_identity_overrides_record_tags() {
        // CNT declares one type-2 record; the record's own tags say 9.x.
        let bytes = b"1.001:21\x1D1.003:2\x1E2\x1F0\x1C9.001:17\x1D9.004:X\x1C".to_vec();
        let file = parse_file(&bytes).unwrap();
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.records[1].record_type, 2);
        assert_eq!(file.records[1].idc, 0);
        assert_eq!(file.records[1].fields()[0].tag, b"9.001");
    }

    #[test]
    fn plan_stops_on_truncated_input() {
        // CNT promises a type-2 record but fewer than four bytes remain.
        let bytes = b"1.001:21\x1D1.003:2\x1E2\x1F0\x1CAB".to_vec();
        let file = parse_file(&bytes).unwrap();
        assert_eq!(file.records.len(), 1);
    }
}
