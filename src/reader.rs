//! Indexed, multi-line aware CSV reader.
//!
//! This module provides the [`Reader`], which gives random access to the
//! logical records of a CSV file, and [`RecordScanner`], the boundary
//! detector that groups physical lines into logical records.
//!
//! ## Overview
//!
//! - **Eager counting**: the number of logical records is computed once, when
//!   the reader is created, by a full forward scan.
//! - **Re-scanning**: files are not seekable by record, so reading record `N`
//!   scans from the start of the file. With [`Reader::set_leave_open`] a read
//!   past the current cursor continues where the previous one stopped.
//! - **Validation**: empty fields and data records whose width disagrees with
//!   the header are reported as [`Error::MissingValue`].
//!
//! ## Usage
//!
//! ```rust
//! use quoted_csv::{OpenMode, Reader};
//! use std::io::Write;
//!
//! let mut file = tempfile::NamedTempFile::new().unwrap();
//! writeln!(file, "Item Code,Item Description,Current Count,On Order").unwrap();
//! writeln!(file, "A0001,\"Train, red\",12,No").unwrap();
//!
//! let mut reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
//! assert_eq!(reader.record_count(), 2);
//!
//! let header = reader.read_header(true).unwrap().unwrap();
//! assert_eq!(header.len(), 4);
//!
//! let record = reader.read_data_record(1, true).unwrap().unwrap();
//! assert_eq!(record.field("Item Description").unwrap(), "Train, red");
//! ```
//!
//! Records are counted once; if the file changes after the reader was
//! created, the count is stale. Create a new reader in that case.

use crate::session::{OpenMode, Session};
use crate::{CsvOptions, DataRecord, Error, Header, LineJoin, Parser, Result};
use log::{debug, trace, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Groups physical lines into logical records.
///
/// A record is complete once its escape characters are balanced. Lines that
/// leave an escape run open are joined with the following lines until the run
/// is closed. Empty lines are ignored.
///
/// # Examples
///
/// ```rust
/// use quoted_csv::{CsvOptions, RecordScanner};
///
/// let mut scanner = RecordScanner::new(&CsvOptions::default());
/// assert_eq!(scanner.push_line(1, "A0003,\"Petrol"), None);
/// assert_eq!(scanner.push_line(2, ""), None);
/// assert_eq!(
///     scanner.push_line(3, " Station\",4,Yes").as_deref(),
///     Some("A0003,\"Petrol Station\",4,Yes")
/// );
/// assert_eq!(scanner.records(), 1);
/// assert!(scanner.finish().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RecordScanner {
    escape: char,
    join: LineJoin,
    accumulator: String,
    escapes: usize,
    started_at: usize,
    records: usize,
}

impl RecordScanner {
    #[must_use]
    pub fn new(options: &CsvOptions) -> Self {
        RecordScanner {
            escape: options.escape,
            join: options.line_join,
            accumulator: String::new(),
            escapes: 0,
            started_at: 0,
            records: 0,
        }
    }

    /// Creates a scanner that continues after `records` complete records, so
    /// record numbers stay counted from the start of the file.
    #[must_use]
    pub fn resume(options: &CsvOptions, records: usize) -> Self {
        RecordScanner {
            records,
            ..Self::new(options)
        }
    }

    /// Feeds one physical line, without its terminator. Returns the logical
    /// record it completes, if any.
    ///
    /// `line_number` is only used for error reporting.
    pub fn push_line(&mut self, line_number: usize, line: &str) -> Option<String> {
        if line.is_empty() {
            return None;
        }

        if self.accumulator.is_empty() {
            self.started_at = line_number;
        } else if self.join == LineJoin::PreserveBreak {
            self.accumulator.push('\n');
        }
        self.accumulator.push_str(line);
        self.escapes += line.chars().filter(|&ch| ch == self.escape).count();

        if self.escapes % 2 != 0 {
            return None;
        }

        self.escapes = 0;
        self.records += 1;
        Some(std::mem::take(&mut self.accumulator))
    }

    /// Returns `true` while a record is open across lines.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        !self.accumulator.is_empty()
    }

    /// Number of complete records seen so far.
    #[must_use]
    pub fn records(&self) -> usize {
        self.records
    }

    /// Checks the scanner state at end of stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordBoundary`] if a record is still open.
    pub fn finish(&self) -> Result<()> {
        if self.is_incomplete() {
            return Err(Error::RecordBoundary {
                record: self.records,
                line: self.started_at,
            });
        }
        Ok(())
    }
}

/// Reads one physical line into `buf`, stripping `\n` or `\r\n`. Returns
/// `false` at end of stream.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut String) -> Result<bool> {
    buf.clear();
    let read = reader.read_line(buf).map_err(|e| Error::io(&e))?;
    if read == 0 {
        return Ok(false);
    }
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(true)
}

/// Random-access reader over the logical records of a CSV file.
///
/// Created via [`Reader::new`] or [`Reader::with_options`]. Every operation
/// opens the file, scans and closes it again, unless
/// [`set_leave_open`](Reader::set_leave_open) is enabled.
#[derive(Debug)]
pub struct Reader {
    path: PathBuf,
    mode: OpenMode,
    parser: Parser,
    allow_empty_values: bool,
    leave_open: bool,
    record_count: usize,
    next_record: usize,
    line: usize,
    header: Option<Arc<Header>>,
    session: Session<BufReader<File>>,
}

impl Reader {
    /// Creates a reader for `path` with the default dialect and counts its
    /// records.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyPath`] for an empty path
    /// - [`Error::UnsupportedMode`] for `Create` and `CreateNew`
    /// - [`Error::Open`] if the file cannot be opened
    /// - [`Error::RecordBoundary`] if the file ends inside an escape run
    pub fn new(path: impl AsRef<Path>, mode: OpenMode, allow_empty_values: bool) -> Result<Self> {
        Self::with_options(path, mode, allow_empty_values, CsvOptions::default())
    }

    /// Creates a reader with a custom dialect.
    ///
    /// # Errors
    ///
    /// Same as [`Reader::new`], plus [`Error::InvalidOptions`].
    pub fn with_options(
        path: impl AsRef<Path>,
        mode: OpenMode,
        allow_empty_values: bool,
        options: CsvOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::EmptyPath);
        }
        mode.check_readable()?;

        let mut reader = Reader {
            path: path.to_path_buf(),
            mode,
            parser: Parser::new(options)?,
            allow_empty_values,
            leave_open: false,
            record_count: 0,
            next_record: 0,
            line: 0,
            header: None,
            session: Session::closed(),
        };
        reader.record_count = reader.count_records()?;
        debug!(
            "{} holds {} logical record(s)",
            reader.path.display(),
            reader.record_count
        );
        Ok(reader)
    }

    fn count_records(&mut self) -> Result<usize> {
        self.open()?;
        let counted = self.scan_all();
        self.close();
        counted
    }

    fn scan_all(&mut self) -> Result<usize> {
        let mut scanner = RecordScanner::new(self.parser.options());
        let mut buf = String::new();
        let stream = self.session.stream()?;

        while read_line(stream, &mut buf)? {
            self.line += 1;
            scanner.push_line(self.line, &buf);
        }

        scanner.finish().map_err(|e| {
            warn!("{}: {}", self.path.display(), e);
            e
        })?;
        Ok(scanner.records())
    }

    /// Opens the file. Does nothing if it is already open; otherwise the
    /// record cursor is reset to the start of the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file cannot be opened.
    pub fn open(&mut self) -> Result<()> {
        let opened = self
            .session
            .open(&self.path, &self.mode.read_options(), BufReader::new)?;
        if opened {
            self.next_record = 0;
            self.line = 0;
        }
        Ok(())
    }

    /// Closes the file. Closing a closed reader is a no-op.
    pub fn close(&mut self) {
        self.session.close();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Total number of logical records, counted when the reader was created.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Index of the record the next sequential scan would return, or `None`
    /// once every record has been passed.
    #[must_use]
    pub fn next_record(&self) -> Option<usize> {
        (self.next_record < self.record_count).then_some(self.next_record)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn options(&self) -> &CsvOptions {
        self.parser.options()
    }

    /// The header read by the last successful [`read_header`](Reader::read_header).
    #[must_use]
    pub fn header(&self) -> Option<&Header> {
        self.header.as_deref()
    }

    #[must_use]
    pub fn allow_empty_values(&self) -> bool {
        self.allow_empty_values
    }

    pub fn set_allow_empty_values(&mut self, allow: bool) {
        self.allow_empty_values = allow;
    }

    #[must_use]
    pub fn leave_open(&self) -> bool {
        self.leave_open
    }

    /// Keeps the file open between reads so that ascending reads continue
    /// from the current position. Disabling it closes the file.
    pub fn set_leave_open(&mut self, leave_open: bool) {
        self.leave_open = leave_open;
        if !leave_open {
            self.close();
        }
    }

    /// Returns the unparsed text of logical record `index`.
    ///
    /// Returns `Ok(None)` when the file holds no records.
    ///
    /// # Errors
    ///
    /// - [`Error::IndexOutOfRange`] if `index >= record_count()`
    /// - [`Error::RecordBoundary`] if the file ends inside an escape run
    /// - [`Error::Truncated`] if the file lost records after counting
    /// - [`Error::Open`] / [`Error::Io`] on file errors
    pub fn read_raw(&mut self, index: usize) -> Result<Option<String>> {
        if self.record_count == 0 {
            return Ok(None);
        }
        if index >= self.record_count {
            return Err(Error::IndexOutOfRange {
                index,
                count: self.record_count,
            });
        }

        if self.next_record > index {
            self.close();
        }
        self.open()?;

        let result = self.scan_to(index);
        if result.is_err() || !self.leave_open {
            self.close();
        }
        result.map(Some)
    }

    fn scan_to(&mut self, index: usize) -> Result<String> {
        let mut scanner = RecordScanner::resume(self.parser.options(), self.next_record);
        let mut buf = String::new();
        let stream = self.session.stream()?;

        loop {
            if !read_line(stream, &mut buf)? {
                scanner.finish()?;
                warn!(
                    "{} ended after {} record(s), expected {}",
                    self.path.display(),
                    self.next_record,
                    self.record_count
                );
                return Err(Error::Truncated {
                    index,
                    found: self.next_record,
                });
            }
            self.line += 1;

            if let Some(record) = scanner.push_line(self.line, &buf) {
                let current = self.next_record;
                self.next_record += 1;
                if current == index {
                    trace!("record {}: {}", index, record);
                    return Ok(record);
                }
            }
        }
    }

    fn check_values(&self, record: usize, values: &[String]) -> Result<()> {
        if self.allow_empty_values {
            return Ok(());
        }
        match values.iter().position(String::is_empty) {
            Some(field) => Err(Error::empty_value(record, field)),
            None => Ok(()),
        }
    }

    /// Reads record 0 as the header and remembers it for later data reads.
    ///
    /// Returns `Ok(None)` when the file holds no records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingValue`] if a field name is empty and empty
    /// values are not allowed, plus the errors of [`read_raw`](Reader::read_raw)
    /// and [`Parser::parse`].
    pub fn read_header(&mut self, unescape: bool) -> Result<Option<Header>> {
        let Some(raw) = self.read_raw(0)? else {
            return Ok(None);
        };
        let names = self.parser.parse(&raw, unescape)?;
        self.check_values(0, &names)?;

        let header = Header::new(names);
        self.header = Some(Arc::new(header.clone()));
        Ok(Some(header))
    }

    /// Reads record `index` as a data record.
    ///
    /// When a header has been read, the record must have one value per header
    /// field and is bound to the header for named access.
    ///
    /// Returns `Ok(None)` when the file holds no records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingValue`] for empty fields (unless allowed) or a
    /// field count that differs from the header, plus the errors of
    /// [`read_raw`](Reader::read_raw) and [`Parser::parse`].
    pub fn read_data_record(&mut self, index: usize, unescape: bool) -> Result<Option<DataRecord>> {
        let Some(raw) = self.read_raw(index)? else {
            return Ok(None);
        };
        let values = self.parser.parse(&raw, unescape)?;
        self.check_values(index, &values)?;

        let record = match &self.header {
            Some(header) => {
                if header.len() != values.len() {
                    return Err(Error::field_count(index, header.len(), values.len()));
                }
                DataRecord::with_header(Arc::clone(header), values)?
            }
            None => DataRecord::new(values),
        };
        Ok(Some(record))
    }

    /// Iterates over the data records in one pass.
    ///
    /// Iteration starts after the header when one has been read, otherwise at
    /// record 0. The file stays open for the lifetime of the iterator. An
    /// item that fails with a recoverable error does not end the iteration;
    /// any other error is the last item.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quoted_csv::{OpenMode, Reader};
    /// use std::io::Write;
    ///
    /// let mut file = tempfile::NamedTempFile::new().unwrap();
    /// write!(file, "code,count\nA1,3\nA2,\nA3,7\n").unwrap();
    ///
    /// let mut reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
    /// reader.read_header(true).unwrap();
    ///
    /// let results: Vec<_> = reader.data_records(true).collect();
    /// assert_eq!(results.len(), 3);
    /// assert!(results[1].as_ref().unwrap_err().is_recoverable());
    /// assert_eq!(results[2].as_ref().unwrap().field("count").unwrap(), "7");
    /// ```
    pub fn data_records(&mut self, unescape: bool) -> DataRecords<'_> {
        let next = usize::from(self.header.is_some());
        let restore = self.leave_open;
        self.leave_open = true;
        DataRecords {
            reader: self,
            next,
            unescape,
            restore,
        }
    }
}

/// Iterator returned by [`Reader::data_records`].
#[derive(Debug)]
pub struct DataRecords<'a> {
    reader: &'a mut Reader,
    next: usize,
    unescape: bool,
    restore: bool,
}

impl Iterator for DataRecords<'_> {
    type Item = Result<DataRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.reader.record_count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let item = self.reader.read_data_record(index, self.unescape).transpose();
        if let Some(Err(err)) = &item {
            if !err.is_recoverable() {
                // later indexes would fail the same way
                self.next = self.reader.record_count;
            }
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.reader.record_count.saturating_sub(self.next);
        (0, Some(remaining))
    }
}

impl Drop for DataRecords<'_> {
    fn drop(&mut self) {
        self.reader.set_leave_open(self.restore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn scan(content: &str) -> Vec<String> {
        let mut scanner = RecordScanner::new(&CsvOptions::default());
        content
            .lines()
            .enumerate()
            .filter_map(|(i, line)| scanner.push_line(i + 1, line))
            .collect()
    }

    #[test]
    fn test_read_line_strips_terminators() {
        let mut cursor = Cursor::new("a\r\nb\nc");
        let mut buf = String::new();
        let mut lines = Vec::new();
        while read_line(&mut cursor, &mut buf).unwrap() {
            lines.push(buf.clone());
        }
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_scanner_joins_open_quotes() {
        let records = scan("\"a\nb\",c\nd,e\n");
        assert_eq!(records, vec!["\"ab\",c", "d,e"]);
    }

    #[test]
    fn test_scanner_preserves_break_when_configured() {
        let options = CsvOptions::new().with_line_join(LineJoin::PreserveBreak);
        let mut scanner = RecordScanner::new(&options);
        assert_eq!(scanner.push_line(1, "\"a"), None);
        assert_eq!(scanner.push_line(2, "b\""), Some("\"a\nb\"".to_string()));
    }

    #[test]
    fn test_scanner_balanced_runs_on_one_line() {
        let records = scan(r#""A0001","Item ""A"", special",5,No"#);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_scanner_reports_unterminated_record() {
        let mut scanner = RecordScanner::new(&CsvOptions::default());
        scanner.push_line(1, "a,b");
        scanner.push_line(2, "\"open");
        scanner.push_line(3, "still open");
        assert!(scanner.is_incomplete());
        assert_eq!(
            scanner.finish().unwrap_err(),
            Error::RecordBoundary { record: 1, line: 2 }
        );
    }

    #[test]
    fn test_count_skips_empty_lines() {
        let file = csv_file("\n\nh1,h2\n\na,b\n\n\nc,d\n");
        let reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
        assert_eq!(reader.record_count(), 3);
        assert!(!reader.is_open());
    }

    #[test]
    fn test_missing_final_terminator_is_accepted() {
        let file = csv_file("a,b\nc,d");
        let mut reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
        assert_eq!(reader.record_count(), 2);
        assert_eq!(reader.read_raw(1).unwrap().as_deref(), Some("c,d"));
    }

    #[test]
    fn test_unterminated_quote_fails_construction() {
        let file = csv_file("a,b\n\"c,d\n");
        let err = Reader::new(file.path(), OpenMode::Open, false).unwrap_err();
        assert!(matches!(err, Error::RecordBoundary { record: 1, line: 2 }));
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(
            Reader::new("", OpenMode::Open, false).unwrap_err(),
            Error::EmptyPath
        );
    }

    #[test]
    fn test_open_or_create_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.csv");
        let mut reader = Reader::new(&path, OpenMode::OpenOrCreate, false).unwrap();
        assert_eq!(reader.record_count(), 0);
        assert!(reader.read_header(true).unwrap().is_none());
        assert!(reader.read_data_record(0, true).unwrap().is_none());
        assert!(path.exists());
    }

    #[test]
    fn test_cursor_and_rescan() {
        let file = csv_file("r0\nr1\nr2\n");
        let mut reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
        assert_eq!(reader.next_record(), Some(0));

        assert_eq!(reader.read_raw(2).unwrap().as_deref(), Some("r2"));
        assert_eq!(reader.next_record(), None);
        assert!(!reader.is_open());

        assert_eq!(reader.read_raw(0).unwrap().as_deref(), Some("r0"));
        assert_eq!(reader.next_record(), Some(1));
    }

    #[test]
    fn test_leave_open_continues_forward() {
        let file = csv_file("r0\nr1\nr2\nr3\n");
        let mut reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
        reader.set_leave_open(true);

        assert_eq!(reader.read_raw(1).unwrap().as_deref(), Some("r1"));
        assert!(reader.is_open());
        assert_eq!(reader.read_raw(3).unwrap().as_deref(), Some("r3"));
        // behind the cursor: reopened and rescanned
        assert_eq!(reader.read_raw(0).unwrap().as_deref(), Some("r0"));

        reader.set_leave_open(false);
        assert!(!reader.is_open());
    }

    #[test]
    fn test_truncated_after_count() {
        let file = csv_file("r0\nr1\nr2\n");
        let mut reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
        std::fs::write(file.path(), "r0\n").unwrap();

        assert_eq!(
            reader.read_raw(2).unwrap_err(),
            Error::Truncated { index: 2, found: 1 }
        );
        assert!(!reader.is_open());
    }

    #[test]
    fn test_resumed_scanner_counts_from_file_start() {
        let mut scanner = RecordScanner::resume(&CsvOptions::default(), 5);
        assert_eq!(scanner.push_line(8, "x,y").as_deref(), Some("x,y"));
        scanner.push_line(9, "\"open");
        assert_eq!(scanner.records(), 6);
        assert_eq!(
            scanner.finish().unwrap_err(),
            Error::RecordBoundary { record: 6, line: 9 }
        );
    }

    #[test]
    fn test_continued_scan_reports_absolute_record() {
        // large enough that the reader's buffer holds only the start
        let content: String = (0..20_000).map(|i| format!("r{:05}\n", i)).collect();
        let file = csv_file(&content);
        let mut reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
        reader.set_leave_open(true);
        assert_eq!(reader.read_raw(0).unwrap().as_deref(), Some("r00000"));

        let broken = format!("{}\"open\n", &content[..10_000 * 7]);
        std::fs::write(file.path(), broken).unwrap();

        assert_eq!(
            reader.read_raw(19_999).unwrap_err(),
            Error::RecordBoundary {
                record: 10_000,
                line: 10_001
            }
        );
        assert!(!reader.is_open());
    }

    #[test]
    fn test_data_records_stop_after_fatal_error() {
        let file = csv_file("r0\nr1\nr2\n");
        let mut reader = Reader::new(file.path(), OpenMode::Open, false).unwrap();
        std::fs::write(file.path(), "r0\n").unwrap();

        let results: Vec<_> = reader.data_records(true).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().unwrap_err(),
            &Error::Truncated { index: 1, found: 1 }
        );
    }
}
