//! Core data structures for the AN2K container format.
//!
//! Entities form a strict containment hierarchy, owned by value with no
//! interior sharing:
//!
//! ```text
//! An2kFile ─► Record ─► Field ─► Subfield ─► Item
//! ```
//!
//! Two of the levels are sum types. A [`Field`] is textual or binary
//! depending on its tag suffix (`.999` marks an opaque image payload), and
//! a [`Record`] is tagged or legacy-binary depending on its type number
//! (types 3 through 8 use the legacy length-prefixed layout).

/// File Separator: ends a record.
pub const FS: u8 = 0x1C;
/// Group Separator: ends a field.
pub const GS: u8 = 0x1D;
/// Record Separator: ends a subfield.
pub const RS: u8 = 0x1E;
/// Unit Separator: ends an item.
pub const US: u8 = 0x1F;

/// Minimum legal size of a legacy-binary record, covering the 4-byte
/// length prefix and the fixed header that follows it.
pub const MIN_BINARY_RECORD_SIZE: u32 = 8;

/// Width of the all-zero placeholder written into a tagged record's length
/// field before the serialize-measure-overwrite passes.
pub const LEN_FIELD_WIDTH: usize = 6;

/// A sequence of opaque bytes; the leaf of the containment hierarchy.
/// No delimiter bytes appear inside an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub bytes: Vec<u8>,
}

impl From<&str> for Item {
    fn from(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
        }
    }
}

impl From<String> for Item {
    fn from(text: String) -> Self {
        Self {
            bytes: text.into_bytes(),
        }
    }
}

impl From<&[u8]> for Item {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}

/// An ordered sequence of items. A parsed subfield always holds at least
/// one item, possibly with empty bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subfield {
    pub items: Vec<Item>,
}

impl Subfield {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// A subfield holding a single item.
    pub fn single(item: impl Into<Item>) -> Self {
        Self {
            items: vec![item.into()],
        }
    }
}

/// The payload of a field: a delimiter-structured text tree, or the opaque
/// bytes of a `.999` image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(Vec<Subfield>),
    Binary(Vec<u8>),
}

/// A tagged field such as `1.003` or `14.999`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// ASCII tag, logically `<record-type>.<field-number>`.
    pub tag: Vec<u8>,
    pub value: FieldValue,
}

impl Field {
    pub fn text(tag: impl Into<Vec<u8>>, subfields: Vec<Subfield>) -> Self {
        Self {
            tag: tag.into(),
            value: FieldValue::Text(subfields),
        }
    }

    pub fn binary(tag: impl Into<Vec<u8>>, raw: Vec<u8>) -> Self {
        Self {
            tag: tag.into(),
            value: FieldValue::Binary(raw),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.value, FieldValue::Binary(_))
    }

    /// The field's subfields; empty for binary fields.
    pub fn subfields(&self) -> &[Subfield] {
        match &self.value {
            FieldValue::Text(subfields) => subfields,
            FieldValue::Binary(_) => &[],
        }
    }

    /// The raw payload of a binary field; empty for text fields.
    pub fn raw(&self) -> &[u8] {
        match &self.value {
            FieldValue::Text(_) => &[],
            FieldValue::Binary(raw) => raw,
        }
    }

    /// True when the tag ends with the given ASCII suffix.
    pub fn tag_ends_with(&self, suffix: &str) -> bool {
        self.tag.ends_with(suffix.as_bytes())
    }

    /// True for a record length field (`.001`, or `.01` in compact form).
    pub fn is_length_field(&self) -> bool {
        self.tag_ends_with(".001") || self.tag_ends_with(".01")
    }
}

/// The body of a record: structured fields, or the exact on-wire bytes of
/// a legacy-binary record including its 4-byte length prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordBody {
    Tagged(Vec<Field>),
    Binary(Vec<u8>),
}

/// One record of an AN2K container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record type, from the enumerated interchange set 1 through 17.
    pub record_type: i32,
    /// Image designation count; `-1` when unknown or inapplicable.
    pub idc: i32,
    pub body: RecordBody,
}

impl Record {
    pub fn tagged(record_type: i32, idc: i32, fields: Vec<Field>) -> Self {
        Self {
            record_type,
            idc,
            body: RecordBody::Tagged(fields),
        }
    }

    pub fn binary(record_type: i32, idc: i32, raw: Vec<u8>) -> Self {
        Self {
            record_type,
            idc,
            body: RecordBody::Binary(raw),
        }
    }

    pub fn is_binary_record(&self) -> bool {
        matches!(self.body, RecordBody::Binary(_))
    }

    /// The record's fields; empty for legacy-binary records.
    pub fn fields(&self) -> &[Field] {
        match &self.body {
            RecordBody::Tagged(fields) => fields,
            RecordBody::Binary(_) => &[],
        }
    }

    /// Mutable access to the fields of a tagged record.
    pub fn fields_mut(&mut self) -> Option<&mut Vec<Field>> {
        match &mut self.body {
            RecordBody::Tagged(fields) => Some(fields),
            RecordBody::Binary(_) => None,
        }
    }

    /// The exact on-wire bytes of a legacy-binary record; empty for
    /// tagged records.
    pub fn raw_record(&self) -> &[u8] {
        match &self.body {
            RecordBody::Tagged(_) => &[],
            RecordBody::Binary(raw) => raw,
        }
    }

    /// Mutable access to the raw bytes of a legacy-binary record.
    pub fn raw_record_mut(&mut self) -> Option<&mut Vec<u8>> {
        match &mut self.body {
            RecordBody::Tagged(_) => None,
            RecordBody::Binary(raw) => Some(raw),
        }
    }
}

/// An ordered sequence of records. The first is always the Type-1
/// transaction header, whose CNT directory enumerates the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct An2kFile {
    pub records: Vec<Record>,
}
