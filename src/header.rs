//! Header records: field names with name lookup.
//!
//! This module provides [`Header`], a [`Record`] of field names backed by an
//! [`IndexMap`] from name to position.
//!
//! ## Duplicate names
//!
//! Field names are expected to be unique but are not required to be. When a
//! name repeats, lookup returns the first position that carries it.
//!
//! ## Examples
//!
//! ```rust
//! use quoted_csv::Header;
//!
//! let header = Header::from(vec!["Item Code", "Item Description", "Current Count", "On Order"]);
//!
//! assert_eq!(header.len(), 4);
//! assert_eq!(header.index_of("Current Count"), Some(2));
//! assert_eq!(header.index_of("Price"), None);
//! ```

use crate::{Error, Record, Result};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::ops::Index;

/// A header record mapping field names to positions.
///
/// # Examples
///
/// ```rust
/// use quoted_csv::Header;
///
/// let header = Header::from(vec!["code", "count", "code"]);
///
/// // The first match wins
/// assert_eq!(header.position("code").unwrap(), 0);
/// assert!(header.position("price").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    names: Record,
    positions: IndexMap<String, usize>,
}

impl Header {
    /// Creates a header from field names.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let names = Record::from(names);
        let positions = Self::index(&names);
        Header { names, positions }
    }

    fn index(names: &Record) -> IndexMap<String, usize> {
        let mut positions = IndexMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(i);
        }
        positions
    }

    /// Returns the position of `name`, or `None` if the header lacks it.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Returns the position of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyFieldName`] for an empty name and
    /// [`Error::FieldNotFound`] when no field carries it.
    pub fn position(&self, name: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::EmptyFieldName);
        }
        self.index_of(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Renames the field at `index`, returning the previous name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is past the last field.
    pub fn set(&mut self, index: usize, name: impl Into<String>) -> Result<String> {
        let previous = self.names.set(index, name)?;
        self.positions = Self::index(&self.names);
        Ok(previous)
    }

    /// Returns the field names in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        self.names.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    #[must_use]
    pub fn into_record(self) -> Record {
        self.names
    }
}

impl AsRef<Record> for Header {
    fn as_ref(&self) -> &Record {
        &self.names
    }
}

impl Index<usize> for Header {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.names[index]
    }
}

impl From<Vec<String>> for Header {
    fn from(names: Vec<String>) -> Self {
        Header::new(names)
    }
}

impl From<Vec<&str>> for Header {
    fn from(names: Vec<&str>) -> Self {
        Header::new(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Record> for Header {
    fn from(record: Record) -> Self {
        Header::new(record.into_values())
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Header {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.names.serialize(serializer)
    }
}
