//! File session lifecycle shared by readers and writers.
//!
//! A [`Session`] is either closed or open over one stream. Opening an open
//! session and closing a closed one are no-ops. Dropping the session closes
//! the file, so every exit path releases it.

use crate::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// How a file is opened.
///
/// | Mode | Missing file | Existing file |
/// |------|--------------|---------------|
/// | `Open` | error | read, or append when writing |
/// | `OpenOrCreate` | created empty | read, or append when writing |
/// | `Create` | created | truncated (writers only) |
/// | `CreateNew` | created | error (writers only) |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    #[default]
    Open,
    OpenOrCreate,
    Create,
    CreateNew,
}

impl OpenMode {
    /// Rejects modes that would destroy the file a reader is about to scan.
    pub(crate) fn check_readable(self) -> Result<()> {
        match self {
            OpenMode::Open | OpenMode::OpenOrCreate => Ok(()),
            OpenMode::Create | OpenMode::CreateNew => Err(Error::UnsupportedMode {
                mode: self,
                access: "reading",
            }),
        }
    }

    pub(crate) fn read_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(true);
        if self == OpenMode::OpenOrCreate {
            // create requires write access
            options.write(true).create(true);
        }
        options
    }

    pub(crate) fn write_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            OpenMode::Open => {
                options.append(true);
            }
            OpenMode::OpenOrCreate => {
                options.append(true).create(true);
            }
            OpenMode::Create => {
                options.write(true).create(true).truncate(true);
            }
            OpenMode::CreateNew => {
                options.write(true).create_new(true);
            }
        }
        options
    }
}

/// An open-or-closed handle over a stream built on top of a [`File`].
#[derive(Debug)]
pub(crate) struct Session<S> {
    stream: Option<S>,
}

impl<S> Session<S> {
    pub(crate) fn closed() -> Self {
        Session { stream: None }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Opens `path` unless the session is already open. Returns `true` when a
    /// new stream was created.
    pub(crate) fn open(
        &mut self,
        path: &Path,
        options: &OpenOptions,
        wrap: impl FnOnce(File) -> S,
    ) -> Result<bool> {
        if self.stream.is_some() {
            return Ok(false);
        }
        let file = options.open(path).map_err(|e| Error::open(path, &e))?;
        debug!("opened {}", path.display());
        self.stream = Some(wrap(file));
        Ok(true)
    }

    pub(crate) fn stream(&mut self) -> Result<&mut S> {
        self.stream
            .as_mut()
            .ok_or_else(|| Error::Io("stream is not open".to_string()))
    }

    /// Takes the stream out, leaving the session closed.
    pub(crate) fn take(&mut self) -> Option<S> {
        self.stream.take()
    }

    pub(crate) fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("closed session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_open_is_idempotent() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut session: Session<File> = Session::closed();
        let options = OpenMode::Open.read_options();

        assert!(session.open(file.path(), &options, |f| f).unwrap());
        assert!(!session.open(file.path(), &options, |f| f).unwrap());
        assert!(session.is_open());

        let mut buf = String::new();
        session.stream().unwrap().read_to_string(&mut buf).unwrap();

        session.close();
        session.close();
        assert!(!session.is_open());
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let mut session: Session<File> = Session::closed();

        let err = session
            .open(&path, &OpenMode::Open.read_options(), |f| f)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Open {
                kind: std::io::ErrorKind::NotFound,
                ..
            }
        ));
        assert!(!session.is_open());
    }

    #[test]
    fn test_reader_rejects_destructive_modes() {
        assert!(OpenMode::Open.check_readable().is_ok());
        assert!(OpenMode::OpenOrCreate.check_readable().is_ok());
        assert!(OpenMode::Create.check_readable().is_err());
        assert!(OpenMode::CreateNew.check_readable().is_err());
    }
}
