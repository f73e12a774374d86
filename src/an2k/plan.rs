//! Record-plan extraction and length reconciliation.
//!
//! The Type-1 CNT field (`1.003`, or `1.03` in compact form) is a
//! directory of the records that follow: its first subfield holds the
//! total record count, and each later subfield holds one `(type, idc)`
//! pair. On the read path the plan drives dispatch between the two record
//! grammars; on the write path it is rebuilt from the record list, and
//! every length field is recomputed, so callers who mutate the record
//! list never have to touch CNT or the length fields themselves.

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};

use crate::an2k::types::{An2kFile, FieldValue, Item, LEN_FIELD_WIDTH, Record, Subfield};
use crate::an2k::writer::serialize_record;

/// One entry of the Type-1 record plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanEntry {
    pub record_type: i32,
    pub idc: i32,
}

/// Extracts the record plan from a parsed Type-1 record.
///
/// The count subfield is skipped; each later subfield contributes one
/// plan entry. Subfields with fewer than two items, or with non-numeric
/// items, are skipped. A missing CNT field yields an empty plan, in which
/// case only the Type-1 record is ever produced.
pub fn extract_record_plan(type1: &Record) -> Vec<PlanEntry> {
    let Some(cnt) = type1
        .fields()
        .iter()
        .find(|field| field.tag == b"1.003" || field.tag == b"1.03")
    else {
        debug!("Type-1 record has no CNT field; record plan is empty");
        return Vec::new();
    };

    let mut plan = Vec::new();
    for subfield in cnt.subfields().iter().skip(1) {
        if subfield.items.len() < 2 {
            continue;
        }
        let (Some(record_type), Some(idc)) = (
            parse_int(&subfield.items[0].bytes),
            parse_int(&subfield.items[1].bytes),
        ) else {
            trace!("Skipping CNT subfield with non-numeric entries");
            continue;
        };
        plan.push(PlanEntry { record_type, idc });
    }
    plan
}

/// Rebuilds the Type-1 CNT directory from the current record list.
///
/// The count covers every record including Type-1 itself; unknown IDCs
/// (`-1`) are written as `0`. A Type-1 without a CNT field is left alone.
pub fn rebuild_cnt_field(file: &mut An2kFile) {
    if file.records.is_empty() {
        return;
    }
    let count = file.records.len();
    let entries: Vec<(i32, i32)> = file.records[1..]
        .iter()
        .map(|record| (record.record_type, record.idc.max(0)))
        .collect();

    let Some(fields) = file.records[0].fields_mut() else {
        return;
    };
    let Some(cnt) = fields
        .iter_mut()
        .find(|field| field.tag_ends_with(".003") || field.tag_ends_with(".03"))
    else {
        debug!("Type-1 record has no CNT field; skipping directory rewrite");
        return;
    };

    let mut subfields = vec![Subfield::single(count.to_string())];
    for (record_type, idc) in entries {
        subfields.push(Subfield::new(vec![
            Item::from(record_type.to_string()),
            Item::from(idc.to_string()),
        ]));
    }
    cnt.value = FieldValue::Text(subfields);
    debug!("Rebuilt CNT directory: {} records", count);
}

/// Recomputes every record's length field in place.
///
/// Binary records get their current size written back into the 4-byte
/// prefix. Tagged records get a fixed-width zero placeholder in their
/// length field, then two serialize-measure-overwrite passes: the length
/// string's width can grow by at most one digit between passes, so the
/// second pass is stable for any realistic record size.
pub fn patch_record_lengths(file: &mut An2kFile) {
    for record in &mut file.records {
        if let Some(raw) = record.raw_record_mut() {
            if raw.len() >= 4 {
                let size = raw.len() as u32;
                BigEndian::write_u32(&mut raw[0..4], size);
            }
        } else {
            patch_tagged_length(record);
        }
    }
}

fn patch_tagged_length(record: &mut Record) {
    let Some(index) = record
        .fields()
        .iter()
        .position(|field| field.is_length_field())
    else {
        return;
    };

    set_length_item(record, index, vec![b'0'; LEN_FIELD_WIDTH]);
    for _ in 0..2 {
        let mut scratch = Vec::new();
        serialize_record(&mut scratch, record);
        set_length_item(record, index, scratch.len().to_string().into_bytes());
    }
}

fn set_length_item(record: &mut Record, index: usize, bytes: Vec<u8>) {
    if let Some(fields) = record.fields_mut() {
        fields[index].value = FieldValue::Text(vec![Subfield::new(vec![Item { bytes }])]);
    }
}

fn parse_int(bytes: &[u8]) -> Option<i32> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}
