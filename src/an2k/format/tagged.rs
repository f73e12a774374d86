//! The delimiter-driven tagged-record grammar.
//!
//! ```text
//! record    := field (GS field)* FS
//! field     := tag ':' body
//! body      := text-body             tag not ending ".999"
//!            | raw binary payload    tag ending ".999"
//! text-body := subfield (RS subfield)*
//! subfield  := item (US item)*
//! item      := bytes excluding {US, RS, GS, FS}
//! ```
//!
//! Parsing here is total: malformed or truncated regions degrade to empty
//! or partial structures rather than failing. A record's first field
//! declares the record's total byte length, which bounds the otherwise
//! structurally ambiguous `.999` payloads further in.

use log::trace;

use crate::an2k::cursor::Cursor;
use crate::an2k::types::{FS, Field, FieldValue, GS, Item, RS, Record, RecordBody, Subfield, US};
use crate::an2k::utils::{parse_decimal, take_until};

/// Consumes one item: bytes up to the next delimiter or EOF.
pub fn parse_item(cursor: &mut Cursor<'_>) -> Item {
    let start = cursor.position();
    while !cursor.done() {
        let byte = cursor.peek();
        if byte == US || byte == RS || byte == GS || byte == FS {
            break;
        }
        cursor.advance(1);
    }
    Item {
        bytes: cursor.slice(start, cursor.position()).to_vec(),
    }
}

/// Consumes one subfield: US-separated items.
///
/// At least one item is always produced, possibly with empty bytes.
pub fn parse_subfield(cursor: &mut Cursor<'_>) -> Subfield {
    let mut subfield = Subfield::default();
    loop {
        subfield.items.push(parse_item(cursor));
        if cursor.done() {
            break;
        }
        if cursor.peek() == US {
            cursor.advance(1);
            continue;
        }
        break;
    }
    subfield
}

/// Consumes one text field body: RS-separated subfields, stopping at GS,
/// FS, or EOF.
pub fn parse_text_field(cursor: &mut Cursor<'_>) -> Vec<Subfield> {
    let mut subfields = Vec::new();
    while !cursor.done() && cursor.peek() != GS && cursor.peek() != FS {
        subfields.push(parse_subfield(cursor));
        if !cursor.done() && cursor.peek() == RS {
            cursor.advance(1);
            continue;
        }
        break;
    }
    subfields
}

/// Consumes an opaque `.999` payload.
///
/// The payload has no internal structure, so its boundary comes from the
/// enclosing record. With a known `record_end` the payload spans from the
/// current position up to `record_end`, excluding a terminating FS and an
/// optional GS before it, and the cursor lands on `record_end`; the
/// payload itself may contain any byte, delimiters included. With no
/// known end, the payload runs to the next FS or EOF.
pub fn parse_binary_field(cursor: &mut Cursor<'_>, record_end: Option<usize>) -> Vec<u8> {
    let start = cursor.position();
    let end = match record_end {
        None => {
            while !cursor.done() && cursor.peek() != FS {
                cursor.advance(1);
            }
            cursor.position()
        }
        Some(record_end) => {
            let mut end = record_end;
            if end > start && cursor.at(end - 1) == FS {
                end -= 1;
            }
            if end > start && cursor.at(end - 1) == GS {
                end -= 1;
            }
            cursor.seek(record_end);
            end
        }
    };
    cursor.slice(start, end).to_vec()
}

/// Consumes one field: the tag, the `:`, then a text or binary body
/// chosen by the `.999` tag suffix.
pub fn parse_field(cursor: &mut Cursor<'_>, record_end: Option<usize>) -> Field {
    let tag = take_until(cursor, b':');
    if !cursor.done() && cursor.peek() == b':' {
        cursor.advance(1);
    }

    let value = if tag.ends_with(b".999") {
        FieldValue::Binary(parse_binary_field(cursor, record_end))
    } else {
        FieldValue::Text(parse_text_field(cursor))
    };
    Field { tag, value }
}

/// Extracts the declared record length from a record's first field.
///
/// Returns `0` (unknown) unless the field's tag ends `.001` or `.01` and
/// its first item parses as a decimal number.
pub fn declared_length(first_field: &Field) -> usize {
    if !first_field.is_length_field() {
        return 0;
    }
    let Some(item) = first_field
        .subfields()
        .first()
        .and_then(|subfield| subfield.items.first())
    else {
        return 0;
    };
    parse_decimal(&item.bytes)
}

/// Consumes one tagged record up to, but not including, its FS.
///
/// The declared length is measured from the record's first byte, before
/// any separator consumption, so it is resolved right after the first
/// field parses; `.999` payloads in the remainder are bounded by it. The
/// terminating FS is left for the file-level separator skip.
pub fn parse_record(cursor: &mut Cursor<'_>) -> Record {
    let record_start = cursor.position();

    let first_field = parse_field(cursor, None);
    if !cursor.done() && cursor.peek() == GS {
        cursor.advance(1);
    }

    let length = declared_length(&first_field);
    let record_end = if length > 0 && record_start + length <= cursor.size() {
        Some(record_start + length)
    } else {
        None
    };
    trace!(
        "Tagged record at offset {}: declared length {}",
        record_start, length
    );

    let mut fields = vec![first_field];
    while !cursor.done() && cursor.peek() != FS {
        fields.push(parse_field(cursor, record_end));
        if !cursor.done() && cursor.peek() == GS {
            cursor.advance(1);
        } else {
            break;
        }
    }

    Record {
        record_type: -1,
        idc: -1,
        body: RecordBody::Tagged(fields),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_text(field: &Field, subfield: usize, item: usize) -> &[u8] {
        &field.subfields()[subfield].items[item].bytes
    }

    #[test]
    fn item_stops_at_each_delimiter() {
        for delimiter in [US, RS, GS, FS] {
            let buffer = [b'A', b'B', delimiter, b'C'];
            let mut cursor = Cursor::new(&buffer);
            assert_eq!(parse_item(&mut cursor).bytes, b"AB");
            assert_eq!(cursor.peek(), delimiter);
        }
    }

    #[test]
    fn subfield_joins_items_on_us() {
        let mut cursor = Cursor::new(b"A\x1FB\x1FC\x1E");
        let subfield = parse_subfield(&mut cursor);
        assert_eq!(subfield.items.len(), 3);
        assert_eq!(subfield.items[2].bytes, b"C");
        // The RS terminator stays for the field level.
        assert_eq!(cursor.peek(), RS);
    }

    #[test]
    fn subfield_always_has_an_item() {
        let mut cursor = Cursor::new(b"");
        let subfield = parse_subfield(&mut cursor);
        assert_eq!(subfield.items.len(), 1);
        assert!(subfield.items[0].bytes.is_empty());
    }

    #[test]
    fn text_field_splits_subfields_on_rs() {
        let mut cursor = Cursor::new(b"A\x1FB\x1EC\x1D");
        let subfields = parse_text_field(&mut cursor);
        assert_eq!(subfields.len(), 2);
        assert_eq!(subfields[0].items.len(), 2);
        assert_eq!(subfields[1].items.len(), 1);
        assert_eq!(cursor.peek(), GS);
    }

    #[test]
    fn unbounded_binary_field_scans_to_fs() {
        let mut cursor = Cursor::new(&[0xAA, 0xBB, FS, 0xCC]);
        let payload = parse_binary_field(&mut cursor, None);
        assert_eq!(payload, vec![0xAA, 0xBB]);
        assert_eq!(cursor.peek(), FS);
    }

    #[test]
    fn bounded_binary_field_excludes_trailing_separators() {
        // Payload, then GS FS closing the record; both are excluded.
        let buffer = [0xAA, 0x1D, 0xBB, GS, FS];
        let mut cursor = Cursor::new(&buffer);
        let payload = parse_binary_field(&mut cursor, Some(buffer.len()));
        assert_eq!(payload, vec![0xAA, 0x1D, 0xBB]);
        assert_eq!(cursor.position(), buffer.len());
    }

    #[test]
    fn bounded_binary_field_keeps_payload_delimiters() {
        // Embedded FS and GS bytes belong to the payload when the record
        // boundary is known.
        let buffer = [FS, GS, 0x01, FS];
        let mut cursor = Cursor::new(&buffer);
        let payload = parse_binary_field(&mut cursor, Some(buffer.len()));
        assert_eq!(payload, vec![FS, GS, 0x01]);
    }

    #[test]
    fn field_dispatches_on_tag_suffix() {
        let mut cursor = Cursor::new(b"2.020:DOE\x1D");
        let field = parse_field(&mut cursor, None);
        assert_eq!(field.tag, b"2.020");
        assert!(!field.is_binary());
        assert_eq!(item_text(&field, 0, 0), b"DOE");

        let mut cursor = Cursor::new(&[b'1', b'4', b'.', b'9', b'9', b'9', b':', 0xAA, FS][..]);
        let field = parse_field(&mut cursor, None);
        assert!(field.is_binary());
        assert_eq!(field.raw(), &[0xAA]);
    }

    #[test]
    fn declared_length_requires_length_tag() {
        let length = Field::text("1.001", vec![Subfield::single("42")]);
        assert_eq!(declared_length(&length), 42);

        let compact = Field::text("1.01", vec![Subfield::single("7")]);
        assert_eq!(declared_length(&compact), 7);

        let other = Field::text("1.002", vec![Subfield::single("42")]);
        assert_eq!(declared_length(&other), 0);

        let garbled = Field::text("1.001", vec![Subfield::single("4x")]);
        assert_eq!(declared_length(&garbled), 0);

        let empty = Field::text("1.001", vec![]);
        assert_eq!(declared_length(&empty), 0);
    }

    #[test]
    fn record_collects_fields_until_fs() {
        let mut cursor = Cursor::new(b"1.001:9\x1D2.001:DOE\x1Cnext");
        let record = parse_record(&mut cursor);
        let fields = record.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].tag, b"1.001");
        assert_eq!(fields[1].tag, b"2.001");
        // The FS stays for the file-level separator skip.
        assert_eq!(cursor.peek(), FS);
    }

    #[test]
    fn record_without_length_field_still_parses() {
        let mut cursor = Cursor::new(b"2.005:Y\x1D2.006:Z\x1C");
        let record = parse_record(&mut cursor);
        assert_eq!(record.fields().len(), 2);
    }
}
