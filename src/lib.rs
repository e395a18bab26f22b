//! `tabular-reader` is a small library for walking delimited text files (CSV, TSV, ...) one row
//! at a time through a read-only cursor.
//!
//! The entrypoint is [`reader::TabularReader`]. Constructing one opens the file, parses the
//! optional header line, pre-scans the file to count data rows, and positions the cursor on the
//! first data row.
//!
//! ## Rows
//!
//! Each record is exposed as a [`types::Row`]:
//!
//! - [`types::Row::Mapped`] when a header is configured and the record has as many fields as the
//!   header (lookup by name or position)
//! - [`types::Row::Raw`] otherwise (lookup by position only); a malformed record is never an
//!   error
//!
//! Quoted fields may contain the delimiter and embedded newlines, following standard CSV quoting.
//! A blank line is a row with a single empty field.
//!
//! ## Quick example
//!
//! ```no_run
//! use tabular_reader::TabularReader;
//!
//! # fn main() -> Result<(), tabular_reader::ReaderError> {
//! let mut reader = TabularReader::new("people.csv", ",", true)?;
//! assert_eq!(reader.headers(), ["name", "age"]);
//!
//! for row in reader.rows()? {
//!     let row = row?;
//!     println!("{:?} is {:?}", row.get("name"), row.get("age"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Read-only access
//!
//! [`reader::TabularReader::fields`] returns a [`types::FieldView`] over the current row. Missing
//! keys yield `None`; `set`/`unset` always fail with [`ReaderError::ReadOnlyViolation`].
//!
//! ```rust
//! use tabular_reader::types::Row;
//!
//! let header = vec!["name".to_string(), "age".to_string()];
//! let row = Row::from_fields(Some(header.as_slice()), vec!["Alice".to_string(), "30".to_string()]);
//! assert_eq!(row.get("name"), Some("Alice"));
//! assert_eq!(row.get(1usize), Some("30"));
//! assert_eq!(row.get("email"), None);
//! ```
//!
//! ## Modules
//!
//! - [`reader`]: the cursor, its options and observer hooks
//! - [`types`]: row model and the read-only field view
//! - [`error`]: error types

pub mod error;
pub mod reader;
pub mod types;

pub use error::{ReaderError, ReaderResult};
pub use reader::{ReaderOptions, TabularReader};
pub use types::{FieldKey, FieldView, Row};
