//! Configuration options for the CSV dialect.
//!
//! This module provides types to customize parsing and writing:
//!
//! - [`CsvOptions`]: Main configuration struct
//! - [`TrimOption`]: Whitespace trimming policy applied to every field
//! - [`LineTerminator`]: Line ending emitted by writers
//! - [`LineJoin`]: How physical lines of one logical record are joined
//!
//! Options derive `Serialize`/`Deserialize`, so a dialect can live in a
//! configuration file; missing keys fall back to the defaults.
//!
//! ## Examples
//!
//! ```rust
//! use quoted_csv::{CsvOptions, TrimOption};
//!
//! // Semicolon separated, keep leading whitespace
//! let options = CsvOptions::new()
//!     .with_separator(';')
//!     .with_trim(TrimOption::Trailing);
//! assert!(options.validate().is_ok());
//!
//! // Loaded from JSON, unspecified keys use the defaults
//! let options: CsvOptions = serde_json::from_str(r#"{"separator":"|"}"#).unwrap();
//! assert_eq!(options.escape, '"');
//! ```

use crate::dialect::{DEFAULT_ESCAPE, DEFAULT_SEPARATOR, PLACEHOLDER};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Whitespace trimming policy for parsed fields.
///
/// # Examples
///
/// ```rust
/// use quoted_csv::TrimOption;
///
/// assert_eq!(TrimOption::Both.apply("  a  "), "a");
/// assert_eq!(TrimOption::Leading.apply("  a  "), "a  ");
/// assert_eq!(TrimOption::Trailing.apply("  a  "), "  a");
/// assert_eq!(TrimOption::None.apply("  a  "), "  a  ");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimOption {
    None,
    Leading,
    Trailing,
    #[default]
    Both,
}

impl TrimOption {
    /// Trims `value` according to this policy.
    #[must_use]
    pub fn apply<'a>(&self, value: &'a str) -> &'a str {
        match self {
            TrimOption::None => value,
            TrimOption::Leading => value.trim_start(),
            TrimOption::Trailing => value.trim_end(),
            TrimOption::Both => value.trim(),
        }
    }
}

/// Line ending written after each record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineTerminator {
    Lf,
    CrLf,
    /// `\r\n` on Windows, `\n` elsewhere
    #[default]
    Platform,
}

impl LineTerminator {
    /// Returns the string representation of this terminator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::Lf => "\n",
            LineTerminator::CrLf => "\r\n",
            LineTerminator::Platform => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}

/// How the physical lines of a multi-line logical record are joined.
///
/// The inventory files this dialect comes from store the continuation of a
/// quoted field without its line break, so `Concatenate` is the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    #[default]
    Concatenate,
    /// Keep a `\n` between the joined lines.
    PreserveBreak,
}

/// Configuration options for parsing, reading and writing.
///
/// # Examples
///
/// ```rust
/// use quoted_csv::{CsvOptions, LineTerminator, TrimOption};
///
/// let options = CsvOptions::new();
/// assert_eq!(options.separator, ',');
/// assert_eq!(options.escape, '"');
/// assert_eq!(options.trim, TrimOption::Both);
///
/// let options = CsvOptions::new()
///     .with_separator('\t')
///     .with_terminator(LineTerminator::CrLf);
/// assert_eq!(options.terminator.as_str(), "\r\n");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub separator: char,
    pub escape: char,
    pub trim: TrimOption,
    pub terminator: LineTerminator,
    pub line_join: LineJoin,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            separator: DEFAULT_SEPARATOR,
            escape: DEFAULT_ESCAPE,
            trim: TrimOption::default(),
            terminator: LineTerminator::default(),
            line_join: LineJoin::default(),
        }
    }
}

impl CsvOptions {
    /// Creates default options (comma separator, double-quote escape, trim both ends).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field separator.
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the escape character.
    #[must_use]
    pub fn with_escape(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    /// Sets the trimming policy.
    #[must_use]
    pub fn with_trim(mut self, trim: TrimOption) -> Self {
        self.trim = trim;
        self
    }

    /// Sets the line terminator used by writers.
    #[must_use]
    pub fn with_terminator(mut self, terminator: LineTerminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Sets how readers join the physical lines of one record.
    #[must_use]
    pub fn with_line_join(mut self, line_join: LineJoin) -> Self {
        self.line_join = line_join;
        self
    }

    /// Checks that the separator and escape characters can work together.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] when the two characters are equal,
    /// when either is a line break, or when either is the reserved placeholder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quoted_csv::CsvOptions;
    ///
    /// assert!(CsvOptions::new().with_escape(',').validate().is_err());
    /// assert!(CsvOptions::new().with_separator('\n').validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.separator == self.escape {
            return Err(Error::InvalidOptions(format!(
                "separator and escape character are both {:?}",
                self.separator
            )));
        }
        for (name, ch) in [("separator", self.separator), ("escape", self.escape)] {
            if ch == '\n' || ch == '\r' {
                return Err(Error::InvalidOptions(format!(
                    "{} cannot be a line break",
                    name
                )));
            }
            if PLACEHOLDER.starts_with(ch) {
                return Err(Error::InvalidOptions(format!(
                    "{} cannot be the reserved placeholder",
                    name
                )));
            }
        }
        Ok(())
    }
}
