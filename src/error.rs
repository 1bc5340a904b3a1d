//! Error types for CSV parsing, reading and writing.
//!
//! Every fallible operation in this crate returns [`Result`], and every
//! failure is surfaced to the caller; nothing is retried or swallowed.
//!
//! ## Error Categories
//!
//! - **Open errors**: the file could not be opened (missing, permission, locked)
//! - **Format errors**: placeholder integrity failures and unterminated quotes
//! - **Value errors**: empty fields or field counts that disagree with the header
//! - **Access errors**: unknown field names and out-of-range record indices
//!
//! Only [`Error::MissingValue`] is meant to be recovered from by callers
//! (for example by skipping the offending record); see [`Error::is_recoverable`].
//!
//! ## Examples
//!
//! ```rust
//! use quoted_csv::{DataRecord, Error, Header};
//! use std::sync::Arc;
//!
//! let header = Arc::new(Header::from(vec!["code", "count"]));
//! let result = DataRecord::with_header(header, vec!["A0001".to_string()]);
//!
//! assert!(matches!(
//!     result,
//!     Err(Error::FieldCountMismatch { expected: 2, found: 1 })
//! ));
//! ```

use crate::session::OpenMode;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Represents all possible errors raised by the CSV engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The underlying file could not be opened.
    #[error("Cannot open '{path}': {reason}")]
    Open {
        path: String,
        kind: io::ErrorKind,
        reason: String,
    },

    /// IO error while reading or writing an open file
    #[error("IO error: {0}")]
    Io(String),

    /// A reader or writer was given an empty path
    #[error("File path is empty")]
    EmptyPath,

    /// The open mode cannot be used for the requested access.
    #[error("Open mode {mode:?} is not supported for {access}")]
    UnsupportedMode { mode: OpenMode, access: &'static str },

    /// Separator and escape configuration is unusable
    #[error("Invalid CSV options: {0}")]
    InvalidOptions(String),

    /// The tokenizer found a different number of placeholders than it queued
    /// escape runs. Raised for input that contains the reserved placeholder.
    #[error(
        "Parse integrity error: found {placeholders} placeholder(s) for {replacements} escaped run(s)"
    )]
    ParseIntegrity {
        placeholders: usize,
        replacements: usize,
    },

    /// The stream ended while a quoted field was still open.
    #[error("Record {record} starting at line {line} has an unterminated escape character")]
    RecordBoundary { record: usize, line: usize },

    /// A field was empty, or a data record disagrees with the header's field count.
    #[error("Missing value in record {record}: {reason}")]
    MissingValue { record: usize, reason: String },

    /// Named access to a field that the header does not define
    #[error("Field '{0}' does not exist")]
    FieldNotFound(String),

    /// Named access with an empty field name
    #[error("Field name is empty")]
    EmptyFieldName,

    /// A data record was built with a different number of values than its header
    #[error("Expected {expected} field value(s), found {found}")]
    FieldCountMismatch { expected: usize, found: usize },

    /// Index past the last record or field
    #[error("Index {index} is out of range (count is {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// The file holds fewer records than were counted when the reader was created.
    #[error("Record {index} no longer exists: the file now ends after {found} record(s)")]
    Truncated { index: usize, found: usize },
}

impl Error {
    /// Creates an open error from the IO failure raised while opening `path`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quoted_csv::Error;
    /// use std::io;
    ///
    /// let err = Error::open("stock.csv", &io::Error::from(io::ErrorKind::NotFound));
    /// assert!(err.to_string().contains("stock.csv"));
    /// ```
    pub fn open(path: impl AsRef<Path>, err: &io::Error) -> Self {
        Error::Open {
            path: path.as_ref().display().to_string(),
            kind: err.kind(),
            reason: err.to_string(),
        }
    }

    /// Creates an IO error for failures on an already open file.
    pub fn io(err: &io::Error) -> Self {
        Error::Io(err.to_string())
    }

    /// Creates a missing value error for an empty field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quoted_csv::Error;
    ///
    /// let err = Error::empty_value(3, 1);
    /// assert!(err.is_recoverable());
    /// assert!(err.to_string().contains("record 3"));
    /// ```
    pub fn empty_value(record: usize, field: usize) -> Self {
        Error::MissingValue {
            record,
            reason: format!("field {} is empty", field),
        }
    }

    /// Creates a missing value error for a record whose field count disagrees with the header.
    pub fn field_count(record: usize, expected: usize, found: usize) -> Self {
        Error::MissingValue {
            record,
            reason: format!(
                "header defines {} field(s) but the record has {}",
                expected, found
            ),
        }
    }

    /// Returns `true` for errors a caller may handle by skipping the record.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::MissingValue { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
