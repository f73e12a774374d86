//! Serialization of the in-memory model back to container bytes.
//!
//! Emission reintroduces the delimiters the parser consumed: items are
//! US-joined, subfields RS-joined, text fields GS-joined, and every tagged
//! record ends with FS. Binary payloads and legacy-binary records are
//! emitted verbatim, with no delimiters of their own.

use log::{debug, info};

use crate::an2k::plan;
use crate::an2k::types::{
    An2kFile, FS, Field, FieldValue, GS, Item, RS, Record, RecordBody, Subfield, US,
};

/// Serializes a whole file into a fresh byte vector.
///
/// The CNT directory and every record length field are reconciled first,
/// so the output is self-consistent even after callers have added,
/// removed, or mutated records. Serialization itself cannot fail.
pub fn serialize_file(file: &mut An2kFile) -> Vec<u8> {
    info!("Serializing container with {} records", file.records.len());
    plan::rebuild_cnt_field(file);
    plan::patch_record_lengths(file);

    let mut out = Vec::new();
    for record in &file.records {
        serialize_record(&mut out, record);
    }
    debug!("Serialized {} bytes", out.len());
    out
}

/// Appends one record to `out`.
///
/// Legacy-binary records are emitted verbatim with no trailing FS; the
/// standard reserves FS for the tagged grammar.
pub fn serialize_record(out: &mut Vec<u8>, record: &Record) {
    match &record.body {
        RecordBody::Binary(raw) => out.extend_from_slice(raw),
        RecordBody::Tagged(fields) => {
            for (index, field) in fields.iter().enumerate() {
                serialize_field(out, field, index + 1 == fields.len());
            }
            out.push(FS);
        }
    }
}

fn serialize_field(out: &mut Vec<u8>, field: &Field, last: bool) {
    out.extend_from_slice(&field.tag);
    out.push(b':');
    match &field.value {
        FieldValue::Binary(raw) => out.extend_from_slice(raw),
        FieldValue::Text(subfields) => {
            for (index, subfield) in subfields.iter().enumerate() {
                serialize_subfield(out, subfield, index + 1 == subfields.len());
            }
            if !last {
                out.push(GS);
            }
        }
    }
}

fn serialize_subfield(out: &mut Vec<u8>, subfield: &Subfield, last: bool) {
    for (index, item) in subfield.items.iter().enumerate() {
        serialize_item(out, item, index + 1 == subfield.items.len());
    }
    if !last {
        out.push(RS);
    }
}

fn serialize_item(out: &mut Vec<u8>, item: &Item, last: bool) {
    out.extend_from_slice(&item.bytes);
    if !last {
        out.push(US);
    }
}
