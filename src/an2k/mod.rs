//! Core AN2K container codec module.
//!
//! # Module Organization
//!
//! - [`types`]: the Item → Subfield → Field → Record → File hierarchy
//! - [`cursor`] and [`utils`]: bounds-safe byte reading primitives
//! - [`format`]: the two record grammars (tagged and legacy-binary)
//! - [`reader`]: file-level orchestration driven by the Type-1 CNT plan
//! - [`plan`]: record-plan extraction and length reconciliation
//! - [`writer`]: serialization back to container bytes
//! - [`io`]: file read/write collaborators
//!
//! # Architecture
//!
//! ```text
//! Read path:
//! bytes ──► Cursor ──► reader ──┬─► format::tagged ──┐
//!                               └─► format::binary ──┴─► An2kFile
//!
//! Write path:
//! An2kFile ──► plan (rebuild CNT, patch lengths) ──► writer ──► bytes
//! ```

pub mod cursor;
pub mod error;
pub mod format;
pub mod io;
pub mod plan;
pub mod reader;
pub mod types;
pub mod utils;
pub mod writer;

pub use error::{An2kError, Result};
pub use reader::parse_file;
pub use types::An2kFile;
pub use writer::serialize_file;
