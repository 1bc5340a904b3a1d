//! # quoted_csv
//!
//! Record-oriented reading and writing of delimited text files whose fields
//! may be wrapped in escape characters.
//!
//! ## What does it handle?
//!
//! A line such as
//!
//! ```text
//! A0001,"Item ""A"", special",5,No
//! ```
//!
//! holds four fields. The separator inside the escaped run does not split the
//! field, and a doubled escape character stands for a literal one. Escaped
//! runs may also span physical lines; the [`Reader`] joins those lines back
//! into one logical record.
//!
//! ## Key Features
//!
//! - **Escape-aware parsing**: separators inside escaped runs are preserved
//! - **Multi-line records**: a record ends when its escape characters balance
//! - **Random access**: read any logical record by index
//! - **Header binding**: access data record values by field name
//! - **Validation**: empty values and width mismatches are reported as
//!   recoverable [`Error::MissingValue`] errors
//! - **Configurable dialect**: separator, escape character, trimming and line
//!   terminator via [`CsvOptions`]
//!
//! ## Quick Start
//!
//! ### Parsing a line
//!
//! ```rust
//! use quoted_csv::parse;
//!
//! let fields = parse("A0001, \"Train, red\" ,12,No", true).unwrap();
//! assert_eq!(fields, vec!["A0001", "Train, red", "12", "No"]);
//!
//! // Without unescaping the escape characters are kept
//! let raw = parse("A0001,\"Train, red\"", false).unwrap();
//! assert_eq!(raw, vec!["A0001", "\"Train, red\""]);
//! ```
//!
//! ### Writing and reading a file
//!
//! ```rust
//! use quoted_csv::{escape_field, record, CsvOptions, OpenMode, Reader, Writer};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("stock.csv");
//! let options = CsvOptions::default();
//!
//! let mut writer = Writer::new(&path, OpenMode::Create).unwrap();
//! writer
//!     .write_record(&record!["Item Code", "Item Description", "Current Count"])
//!     .unwrap();
//! writer
//!     .write_record(&record!["A0002", escape_field("Doll, \"Betty\"", &options), 3])
//!     .unwrap();
//! writer.close().unwrap();
//!
//! let mut reader = Reader::new(&path, OpenMode::Open, false).unwrap();
//! reader.read_header(true).unwrap();
//!
//! let record = reader.read_data_record(1, true).unwrap().unwrap();
//! assert_eq!(record.field("Item Description").unwrap(), "Doll, \"Betty\"");
//! assert_eq!(record.field("Current Count").unwrap(), "3");
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Parsing**: O(n) in the length of the line
//! - **Counting**: one full scan when a reader is created
//! - **Random reads**: O(file) per read, O(distance) for ascending reads with
//!   [`Reader::set_leave_open`]
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: file lifecycle at `debug`,
//! individual records at `trace`, and malformed files at `warn`. No logger is
//! installed; applications choose their own.

pub mod dialect;
pub mod error;
pub mod header;
pub mod macros;
pub mod options;
pub mod parser;
pub mod reader;
pub mod record;
pub mod session;
pub mod writer;

pub use error::{Error, Result};
pub use header::Header;
pub use options::{CsvOptions, LineJoin, LineTerminator, TrimOption};
pub use parser::{escape_field, Parser};
pub use reader::{DataRecords, Reader, RecordScanner};
pub use record::{DataRecord, FieldChange, Record};
pub use session::OpenMode;
pub use writer::{to_line, Writer};

/// Splits one logical record into fields using the default dialect.
///
/// With `unescape` set, escaped fields lose their wrapping escape characters
/// and doubled escapes collapse to one. Every field is trimmed.
///
/// # Examples
///
/// ```rust
/// use quoted_csv::parse;
///
/// let fields = parse("A0001,\"Item \"\"A\"\", special\",5,No", true).unwrap();
/// assert_eq!(fields, vec!["A0001", "Item \"A\", special", "5", "No"]);
/// ```
///
/// # Errors
///
/// Returns [`Error::ParseIntegrity`] if the line already contains the
/// internal placeholder character.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(line: &str, unescape: bool) -> Result<Vec<String>> {
    Parser::default().parse(line, unescape)
}

/// Splits one logical record into fields using a custom dialect.
///
/// # Examples
///
/// ```rust
/// use quoted_csv::{parse_with_options, CsvOptions};
///
/// let options = CsvOptions::new().with_separator(';').with_escape('\'');
/// let fields = parse_with_options("a;'b;c'", true, options).unwrap();
/// assert_eq!(fields, vec!["a", "b;c"]);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidOptions`] for an unusable dialect, plus the errors
/// of [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(line: &str, unescape: bool, options: CsvOptions) -> Result<Vec<String>> {
    Parser::new(options)?.parse(line, unescape)
}
