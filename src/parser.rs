//! Tokenizing parser for logical CSV records.
//!
//! This module provides the [`Parser`] that converts one logical record
//! string into its ordered field values. It performs no I/O.
//!
//! ## Algorithm
//!
//! 1. **Escape extraction**: every escape run (`"..."`) is replaced by the
//!    reserved placeholder and queued, left to right.
//! 2. **Split** on the separator. Separators inside runs are gone by now.
//! 3. **Trim** each token with the configured [`TrimOption`](crate::TrimOption).
//! 4. **Detokenize**: placeholders are restored from the queue in FIFO order,
//!    optionally unquoting the restored field.
//! 5. **Integrity check**: placeholder count must equal queued run count.
//!
//! ## Usage
//!
//! ```rust
//! use quoted_csv::Parser;
//!
//! let parser = Parser::default();
//! let values = parser.parse(r#""A0001", "Train, red" ,12,No"#, true).unwrap();
//! assert_eq!(values, vec!["A0001", "Train, red", "12", "No"]);
//!
//! // Without unescaping the runs are restored verbatim
//! let raw = parser.parse(r#""A0001",12"#, false).unwrap();
//! assert_eq!(raw, vec!["\"A0001\"", "12"]);
//! ```

use crate::dialect::PLACEHOLDER;
use crate::{CsvOptions, Error, Result};
use std::collections::VecDeque;

/// The CSV record parser.
///
/// Created via [`Parser::new`] with validated options, or [`Parser::default`]
/// for the default dialect.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    options: CsvOptions,
}

impl Parser {
    /// Creates a parser for the given dialect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] if the options fail validation.
    pub fn new(options: CsvOptions) -> Result<Self> {
        options.validate()?;
        Ok(Parser { options })
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Parses one logical record into its field values.
    ///
    /// When `unescape` is `true`, fields built from escape runs lose their
    /// escape characters (a doubled escape becomes one literal character) and
    /// are trimmed again. Otherwise the runs are restored unchanged.
    ///
    /// Empty input yields a single empty field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseIntegrity`] when the number of placeholders after
    /// splitting differs from the number of extracted escape runs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quoted_csv::Parser;
    ///
    /// let parser = Parser::default();
    /// assert_eq!(parser.parse("", true).unwrap(), vec![""]);
    /// assert_eq!(
    ///     parser.parse(r#""say ""hi""",x"#, true).unwrap(),
    ///     vec!["say \"hi\"", "x"]
    /// );
    /// ```
    pub fn parse(&self, line: &str, unescape: bool) -> Result<Vec<String>> {
        let (tokenized, mut replacements) = self.tokenize(line);

        let tokens: Vec<&str> = tokenized
            .split(self.options.separator)
            .map(|token| self.options.trim.apply(token))
            .collect();

        let placeholders: usize = tokens
            .iter()
            .map(|token| token.matches(PLACEHOLDER).count())
            .sum();
        if placeholders != replacements.len() {
            return Err(Error::ParseIntegrity {
                placeholders,
                replacements: replacements.len(),
            });
        }

        Ok(tokens
            .into_iter()
            .map(|token| self.detokenize(token, &mut replacements, unescape))
            .collect())
    }

    /// Replaces each escape run with the placeholder. The queue keeps the runs
    /// in the order they appeared, which is also the order of the placeholders
    /// after splitting.
    fn tokenize(&self, line: &str) -> (String, VecDeque<String>) {
        let escape = self.options.escape;
        let width = escape.len_utf8();

        let mut tokenized = String::with_capacity(line.len());
        let mut replaced = VecDeque::new();
        let mut rest = line;

        while let Some(start) = rest.find(escape) {
            let Some(len) = rest[start + width..].find(escape) else {
                break; // unbalanced, left in place
            };
            let end = start + width + len + width;
            tokenized.push_str(&rest[..start]);
            tokenized.push_str(PLACEHOLDER);
            replaced.push_back(rest[start..end].to_string());
            rest = &rest[end..];
        }
        tokenized.push_str(rest);

        (tokenized, replaced)
    }

    fn detokenize(
        &self,
        token: &str,
        replacements: &mut VecDeque<String>,
        unescape: bool,
    ) -> String {
        if !token.contains(PLACEHOLDER) {
            return token.to_string();
        }

        let mut restored = String::with_capacity(token.len() + 16);
        let mut pieces = token.split(PLACEHOLDER);
        if let Some(first) = pieces.next() {
            restored.push_str(first);
        }
        for piece in pieces {
            if let Some(run) = replacements.pop_front() {
                restored.push_str(&run);
            }
            restored.push_str(piece);
        }

        if unescape {
            self.options.trim.apply(&self.unquote(&restored)).to_string()
        } else {
            restored
        }
    }

    /// Drops escape characters. Inside a quoted section a doubled escape
    /// character stands for one literal escape character.
    fn unquote(&self, field: &str) -> String {
        let escape = self.options.escape;
        let mut result = String::with_capacity(field.len());
        let mut chars = field.chars().peekable();
        let mut quoted = false;

        while let Some(ch) = chars.next() {
            if ch != escape {
                result.push(ch);
            } else if quoted && chars.peek() == Some(&escape) {
                chars.next();
                result.push(escape);
            } else {
                quoted = !quoted;
            }
        }

        result
    }
}

/// Wraps `value` in the escape character, doubling any escape characters it
/// contains, so it survives a write/read cycle unchanged.
///
/// Writers never escape on their own; call this on values that hold the
/// separator, the escape character or a line break.
///
/// # Examples
///
/// ```rust
/// use quoted_csv::{escape_field, parse, CsvOptions};
///
/// let options = CsvOptions::default();
/// let escaped = escape_field("Item \"A\", special", &options);
/// assert_eq!(escaped, r#""Item ""A"", special""#);
///
/// let line = format!("A0001,{},5", escaped);
/// assert_eq!(parse(&line, true).unwrap()[1], "Item \"A\", special");
/// ```
#[must_use]
pub fn escape_field(value: &str, options: &CsvOptions) -> String {
    let escape = options.escape;
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push(escape);
    for ch in value.chars() {
        if ch == escape {
            escaped.push(escape);
        }
        escaped.push(ch);
    }
    escaped.push(escape);
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrimOption;

    fn parse(line: &str) -> Vec<String> {
        Parser::default().parse(line, true).unwrap()
    }

    #[test]
    fn test_plain_fields() {
        assert_eq!(parse("A0002,Plain,2,Yes"), vec!["A0002", "Plain", "2", "Yes"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), vec![""]);
        assert_eq!(parse(","), vec!["", ""]);
    }

    #[test]
    fn test_separator_inside_escape_run() {
        assert_eq!(parse(r#""a,b", c ,"d""#), vec!["a,b", "c", "d"]);
    }

    #[test]
    fn test_escape_runs_restored_in_order() {
        let values = parse(r#""1","2",x,"3","4",y,"5""#);
        assert_eq!(values, vec!["1", "2", "x", "3", "4", "y", "5"]);

        let raw = Parser::default()
            .parse(r#""first,1","second,2","third,3""#, false)
            .unwrap();
        assert_eq!(
            raw,
            vec!["\"first,1\"", "\"second,2\"", "\"third,3\""]
        );
    }

    #[test]
    fn test_doubled_escape_is_literal() {
        assert_eq!(
            parse(r#""A0001","Item ""A"", special",5,No"#),
            vec!["A0001", "Item \"A\", special", "5", "No"]
        );
    }

    #[test]
    fn test_raw_keeps_escape_characters() {
        let values = Parser::default()
            .parse(r#"  "Item ""A"""  ,5"#, false)
            .unwrap();
        assert_eq!(values, vec![r#""Item ""A""""#, "5"]);
    }

    #[test]
    fn test_unescape_retrims() {
        assert_eq!(parse(r#"" padded ",x"#), vec!["padded", "x"]);
    }

    #[test]
    fn test_empty_escaped_field() {
        assert_eq!(parse(r#""",x"#), vec!["", "x"]);
    }

    #[test]
    fn test_unbalanced_escape_left_in_place() {
        assert_eq!(parse(r#"a,"b"#), vec!["a", "\"b"]);
    }

    #[test]
    fn test_trim_options() {
        let line = "  a  ,  b  ";
        let with = |trim| {
            Parser::new(CsvOptions::new().with_trim(trim))
                .unwrap()
                .parse(line, true)
                .unwrap()
        };
        assert_eq!(with(TrimOption::None), vec!["  a  ", "  b  "]);
        assert_eq!(with(TrimOption::Leading), vec!["a  ", "b  "]);
        assert_eq!(with(TrimOption::Trailing), vec!["  a", "  b"]);
        assert_eq!(with(TrimOption::Both), vec!["a", "b"]);
    }

    #[test]
    fn test_custom_separator_and_escape() {
        let parser = Parser::new(CsvOptions::new().with_separator(';').with_escape('\''))
            .unwrap();
        let values = parser.parse("'a;b';c,d;'it''s'", true).unwrap();
        assert_eq!(values, vec!["a;b", "c,d", "it's"]);
    }

    #[test]
    fn test_placeholder_in_input_is_integrity_error() {
        let line = format!("a{},b", PLACEHOLDER);
        let err = Parser::default().parse(&line, true).unwrap_err();
        assert_eq!(
            err,
            Error::ParseIntegrity {
                placeholders: 1,
                replacements: 0
            }
        );
    }

    #[test]
    fn test_placeholder_inside_run_is_content() {
        let line = format!("\"{}\",b", PLACEHOLDER);
        assert_eq!(parse(&line), vec![PLACEHOLDER, "b"]);
    }

    #[test]
    fn test_invalid_options_rejected() {
        assert!(Parser::new(CsvOptions::new().with_separator('"')).is_err());
    }

    #[test]
    fn test_escape_field() {
        let options = CsvOptions::default();
        assert_eq!(escape_field("plain", &options), "\"plain\"");
        assert_eq!(escape_field("", &options), "\"\"");
        assert_eq!(escape_field("a\"b", &options), "\"a\"\"b\"");
    }
}
