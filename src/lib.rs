//! Reader and writer for AN2K biometric interchange containers.
//!
//! AN2K files carry tagged textual metadata records interleaved with legacy
//! fixed-layout binary records (fingerprint, palm, face, and iris imagery,
//! plus transaction headers) in a single byte stream. Two incompatible
//! sub-grammars share that stream: a delimiter-driven tagged-record grammar
//! and a length-prefixed opaque binary layout. The Type-1 transaction
//! record leads the file and its CNT directory enumerates everything that
//! follows, so parsing is plan-driven rather than self-describing.
//!
//! The codec is bidirectional: [`parse_file`] reads a byte buffer into the
//! [`An2kFile`] model, and [`serialize_file`] writes the model back out,
//! reconciling the CNT directory and every record length field first so
//! that callers can mutate the record list freely in between.
//!
//! # Example
//!
//! ```
//! use an2k_codec::{parse_file, serialize_file};
//!
//! let bytes = b"1.001:9\x1d2.001:DOE\x1c".to_vec();
//! let mut file = parse_file(&bytes)?;
//! assert_eq!(file.records[0].record_type, 1);
//!
//! let out = serialize_file(&mut file);
//! assert_eq!(parse_file(&out)?.records.len(), file.records.len());
//! # Ok::<(), an2k_codec::An2kError>(())
//! ```

pub mod an2k;

pub use an2k::error::{An2kError, Result};
pub use an2k::io::{read_file, write_file};
pub use an2k::plan::PlanEntry;
pub use an2k::reader::parse_file;
pub use an2k::types::{An2kFile, Field, FieldValue, Item, Record, RecordBody, Subfield};
pub use an2k::utils::{is_legacy_binary_type, read_be_u32};
pub use an2k::writer::serialize_file;
