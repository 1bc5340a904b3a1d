//! The quote-escaping CSV dialect read and written by this crate.
//!
//! # Overview
//!
//! The dialect is deliberately small: one separator character, one escape
//! character, and a whitespace trimming policy. It is the format persisted by
//! the inventory tool, so the reader accepts exactly what the writer emits.
//!
//! # Records
//!
//! ```text
//! Item Code,Item Description,Current Count,On Order
//! A0001,Train with 0 Carriage,12,No
//! "A0002","Item ""B"", special",5,Yes
//!
//! A0003,"Petrol
//!  Station",4,Yes
//! ```
//!
//! **Rules**:
//! - A *physical line* is delimited by `\n` or `\r\n`.
//! - Empty physical lines are skipped: they never close a record and are never
//!   part of one.
//! - A *logical record* is one or more non-empty physical lines whose
//!   concatenation holds a balanced number of escape characters. The last
//!   example record spans two physical lines because its quoted field is still
//!   open at the end of the first one.
//! - A complete final record does not need a trailing line terminator.
//! - The first logical record, when read as a header, holds the field names.
//!
//! # Fields
//!
//! | Concept | Default | Notes |
//! |---------|---------|-------|
//! | Separator | `,` | [`DEFAULT_SEPARATOR`] |
//! | Escape character | `"` | [`DEFAULT_ESCAPE`] |
//! | Trimming | both ends | see [`TrimOption`](crate::TrimOption) |
//!
//! An *escape run* is the escape character, any text without the escape
//! character, and the escape character again. Runs are lifted out of the line
//! before it is split, so separators inside them are not delimiters:
//!
//! ```text
//! "Smith, John",42      -> ["Smith, John", "42"]           (unescaped)
//!                       -> ["\"Smith, John\"", "42"]       (raw)
//! ```
//!
//! A doubled escape character inside a quoted field is two adjacent runs and
//! unescapes to one literal escape character: `"say ""hi"""` reads as `say "hi"`.
//!
//! # Writing
//!
//! Writers join values with the separator and do **not** escape them. Use
//! [`escape_field`](crate::escape_field) on values that contain the separator,
//! the escape character or a line break before writing them.
//!
//! # Reserved text
//!
//! During tokenizing every escape run is replaced by [`PLACEHOLDER`]. The
//! placeholder is a Unicode noncharacter, so it never occurs in well-formed
//! text; input that carries it outside an escape run is rejected with
//! [`Error::ParseIntegrity`](crate::Error::ParseIntegrity).

/// Default field separator.
pub const DEFAULT_SEPARATOR: char = ',';

/// Default escape (quote) character.
pub const DEFAULT_ESCAPE: char = '"';

/// Sentinel substituted for each escape run while a line is split.
pub const PLACEHOLDER: &str = "\u{FDD0}";
