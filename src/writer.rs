//! CSV record writer.
//!
//! This module provides the [`Writer`], which appends one record per line to
//! a file, and [`to_line`], the serializer it uses.
//!
//! ## Overview
//!
//! - Values are joined with the separator exactly as given. Nothing is
//!   escaped automatically; use [`escape_field`](crate::escape_field) first
//!   for values holding the separator, the escape character or a line break.
//! - Every write is flushed, so readers of the same path see complete lines
//!   between calls.
//! - The file is opened with the writer's [`OpenMode`] once. Reopening after
//!   [`Writer::close`] appends and never truncates again.
//!
//! ## Usage
//!
//! ```rust
//! use quoted_csv::{record, OpenMode, Writer};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("stock.csv");
//!
//! let mut writer = Writer::new(&path, OpenMode::Create).unwrap();
//! writer.write_record(&record!["Item Code", "Current Count"]).unwrap();
//! writer.write_record(&record!["A0001", 12]).unwrap();
//! writer.close().unwrap();
//!
//! let content = std::fs::read_to_string(&path).unwrap();
//! assert_eq!(content.lines().collect::<Vec<_>>(), vec!["Item Code,Current Count", "A0001,12"]);
//! ```

use crate::session::{OpenMode, Session};
use crate::{CsvOptions, Error, Record, Result};
use log::trace;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Serializes `record` as one line, without a terminator.
///
/// # Examples
///
/// ```rust
/// use quoted_csv::{record, to_line, CsvOptions};
///
/// let options = CsvOptions::new().with_separator('|');
/// assert_eq!(to_line(&record!["a", "b", ""], &options), "a|b|");
/// ```
#[must_use]
pub fn to_line(record: &Record, options: &CsvOptions) -> String {
    let mut line = String::with_capacity(record.iter().map(|v| v.len() + 1).sum());
    for (i, value) in record.iter().enumerate() {
        if i > 0 {
            line.push(options.separator);
        }
        line.push_str(value);
    }
    line
}

/// Line-per-record writer over a file.
///
/// The file is opened when the writer is created and stays open between
/// writes unless [`set_leave_open(false)`](Writer::set_leave_open) is used.
#[derive(Debug)]
pub struct Writer {
    path: PathBuf,
    mode: OpenMode,
    options: CsvOptions,
    leave_open: bool,
    opened_once: bool,
    records_written: usize,
    session: Session<BufWriter<File>>,
}

impl Writer {
    /// Creates a writer with the default dialect and opens the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPath`] for an empty path and [`Error::Open`] if
    /// the file cannot be opened with `mode`.
    pub fn new(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        Self::with_options(path, mode, CsvOptions::default())
    }

    /// Creates a writer with a custom dialect and opens the file.
    ///
    /// # Errors
    ///
    /// Same as [`Writer::new`], plus [`Error::InvalidOptions`].
    pub fn with_options(path: impl AsRef<Path>, mode: OpenMode, options: CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::EmptyPath);
        }
        options.validate()?;

        let mut writer = Writer {
            path: path.to_path_buf(),
            mode,
            options,
            leave_open: true,
            opened_once: false,
            records_written: 0,
            session: Session::closed(),
        };
        writer.open()?;
        Ok(writer)
    }

    /// Opens the file. Does nothing if it is already open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file cannot be opened.
    pub fn open(&mut self) -> Result<()> {
        let mode = if self.opened_once {
            OpenMode::Open
        } else {
            self.mode
        };
        self.session
            .open(&self.path, &mode.write_options(), BufWriter::new)?;
        self.opened_once = true;
        Ok(())
    }

    /// Flushes and closes the file. Closing a closed writer is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if buffered output cannot be flushed.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.session.take() {
            stream.flush().map_err(|e| Error::io(&e))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Closes the file after every write when `false`.
    ///
    /// # Errors
    ///
    /// Disabling it closes the file, which can fail like [`Writer::close`].
    pub fn set_leave_open(&mut self, leave_open: bool) -> Result<()> {
        self.leave_open = leave_open;
        if !leave_open {
            self.close()?;
        }
        Ok(())
    }

    /// Writes `record` as one line and flushes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file has to be reopened and cannot be,
    /// and [`Error::Io`] if writing or flushing fails. The file is closed on
    /// failure.
    pub fn write_record<R: AsRef<Record> + ?Sized>(&mut self, record: &R) -> Result<()> {
        let line = to_line(record.as_ref(), &self.options);
        self.open()?;

        if let Err(err) = self.write_line(&line) {
            self.session.close();
            return Err(err);
        }

        // counted once flushed, whatever close returns
        self.records_written += 1;
        trace!("wrote record {}: {}", self.records_written, line);
        if !self.leave_open {
            self.close()?;
        }
        Ok(())
    }

    /// Writes every record in order, returning how many were written.
    ///
    /// # Errors
    ///
    /// Stops at the first failing record; see [`Writer::write_record`].
    pub fn write_records<I, R>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<Record>,
    {
        let mut count = 0;
        for record in records {
            self.write_record(&record)?;
            count += 1;
        }
        Ok(count)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let terminator = self.options.terminator.as_str();
        let stream = self.session.stream()?;
        let write = |stream: &mut BufWriter<File>| -> std::io::Result<()> {
            stream.write_all(line.as_bytes())?;
            stream.write_all(terminator.as_bytes())?;
            stream.flush()
        };
        write(stream).map_err(|e| Error::io(&e))
    }
}
