//! Ordered string records.
//!
//! This module provides the record types that parsed lines are wrapped in and
//! that writers serialize:
//!
//! - [`Record`]: an ordered, mutable sequence of field values
//! - [`DataRecord`]: a record optionally bound to a [`Header`] for named access
//! - [`FieldChange`]: the result of mutating a field
//!
//! [`Header`] itself lives in [`crate::header`]. All three expose
//! `AsRef<Record>`, which is what [`Writer::write_record`](crate::Writer::write_record)
//! accepts.
//!
//! ## Usage Patterns
//!
//! ### Building records
//!
//! ```rust
//! use quoted_csv::{record, Record};
//!
//! let record = record!["A0001", "Train", 12, "No"];
//! assert_eq!(record.len(), 4);
//! assert_eq!(&record[2], "12");
//!
//! let same = Record::from(vec!["A0001", "Train", "12", "No"]);
//! assert_eq!(record, same);
//! ```
//!
//! ### Named access
//!
//! ```rust
//! use quoted_csv::{DataRecord, Header};
//! use std::sync::Arc;
//!
//! let header = Arc::new(Header::from(vec!["Item Code", "Current Count"]));
//! let mut record = DataRecord::with_header(
//!     header,
//!     vec!["A0001".to_string(), "12".to_string()],
//! ).unwrap();
//!
//! assert_eq!(record.field("Current Count").unwrap(), "12");
//!
//! let change = record.set_field("Current Count", "15").unwrap();
//! assert_eq!(change.previous, "12");
//! assert_eq!(record.get(1), Some("15"));
//! ```

use crate::{Error, Header, Result};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::ops::Index;
use std::sync::Arc;

/// An ordered sequence of string field values.
///
/// Equality is positional: two records are equal when they hold the same
/// values in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Vec<String>);

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Record(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Record(Vec::with_capacity(capacity))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value at `index`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut String> {
        self.0.get_mut(index)
    }

    /// Replaces the value at `index` and returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is past the last field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quoted_csv::record;
    ///
    /// let mut record = record!["a", "b"];
    /// assert_eq!(record.set(1, "c").unwrap(), "b");
    /// assert!(record.set(2, "d").is_err());
    /// ```
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> Result<String> {
        let count = self.0.len();
        let slot = self
            .0
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, count })?;
        Ok(std::mem::replace(slot, value.into()))
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.0.push(value.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn into_values(self) -> Vec<String> {
        self.0
    }
}

impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}

impl Index<usize> for Record {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.0[index]
    }
}

impl From<Vec<String>> for Record {
    fn from(values: Vec<String>) -> Self {
        Record(values)
    }
}

impl From<Vec<&str>> for Record {
    fn from(values: Vec<&str>) -> Self {
        values.into_iter().map(str::to_string).collect()
    }
}

impl From<Record> for Vec<String> {
    fn from(record: Record) -> Self {
        record.0
    }
}

impl FromIterator<String> for Record {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Record(Vec::from_iter(iter))
    }
}

impl IntoIterator for Record {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The outcome of setting a field on a [`DataRecord`].
///
/// Callers that need change notification inspect this value instead of
/// subscribing to an event on the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub index: usize,
    /// Field name, when the record is bound to a header
    pub name: Option<String>,
    pub previous: String,
    pub current: String,
}

impl FieldChange {
    /// Returns `true` if the new value differs from the old one.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.previous != self.current
    }
}

/// A data record, optionally bound to a [`Header`].
///
/// Bound records allow access by field name as well as by index. The header
/// is shared through an [`Arc`] so every record read after a header can point
/// at the same instance.
///
/// Equality compares values only, not the header binding.
///
/// # Examples
///
/// ```rust
/// use quoted_csv::{DataRecord, Error};
///
/// let record = DataRecord::new(vec!["A0001".to_string()]);
/// assert_eq!(record.get(0), Some("A0001"));
/// assert!(matches!(record.field("Item Code"), Err(Error::FieldNotFound(_))));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataRecord {
    values: Record,
    header: Option<Arc<Header>>,
}

impl DataRecord {
    /// Creates an unbound data record.
    #[must_use]
    pub fn new(values: Vec<String>) -> Self {
        DataRecord {
            values: Record::from(values),
            header: None,
        }
    }

    /// Creates a data record bound to `header`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldCountMismatch`] unless there is exactly one value
    /// per header field.
    pub fn with_header(header: Arc<Header>, values: Vec<String>) -> Result<Self> {
        if values.len() != header.len() {
            return Err(Error::FieldCountMismatch {
                expected: header.len(),
                found: values.len(),
            });
        }
        Ok(DataRecord {
            values: Record::from(values),
            header: Some(header),
        })
    }

    /// Creates a bound record with an empty value for every header field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quoted_csv::{DataRecord, Header};
    /// use std::sync::Arc;
    ///
    /// let record = DataRecord::blank(Arc::new(Header::from(vec!["a", "b"])));
    /// assert_eq!(record.values(), &["", ""]);
    /// ```
    #[must_use]
    pub fn blank(header: Arc<Header>) -> Self {
        let values = vec![String::new(); header.len()];
        DataRecord {
            values: Record::from(values),
            header: Some(header),
        }
    }

    #[must_use]
    pub fn header(&self) -> Option<&Header> {
        self.header.as_deref()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.header.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index)
    }

    fn position(&self, name: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::EmptyFieldName);
        }
        match &self.header {
            Some(header) => header.position(name),
            None => Err(Error::FieldNotFound(name.to_string())),
        }
    }

    /// Returns the value of the field called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyFieldName`] for an empty name and
    /// [`Error::FieldNotFound`] if the record is unbound or the header lacks
    /// the field.
    pub fn field(&self, name: &str) -> Result<&str> {
        let index = self.position(name)?;
        Ok(&self.values[index])
    }

    /// Sets the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is past the last field.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> Result<FieldChange> {
        let current = value.into();
        let previous = self.values.set(index, current.clone())?;
        Ok(FieldChange {
            index,
            name: self.header.as_ref().map(|h| h[index].to_string()),
            previous,
            current,
        })
    }

    /// Sets the value of the field called `name`.
    ///
    /// # Errors
    ///
    /// Same as [`DataRecord::field`].
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<FieldChange> {
        let index = self.position(name)?;
        self.set(index, value)
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        self.values.values()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.values.iter()
    }

    /// Returns the values keyed by field name, or `None` for an unbound record.
    ///
    /// Duplicate header names keep their first value.
    #[must_use]
    pub fn to_map(&self) -> Option<IndexMap<String, String>> {
        let header = self.header.as_ref()?;
        let mut map = IndexMap::with_capacity(header.len());
        for (name, value) in header.iter().zip(self.values.iter()) {
            map.entry(name.clone()).or_insert_with(|| value.clone());
        }
        Some(map)
    }

    #[must_use]
    pub fn into_record(self) -> Record {
        self.values
    }
}

impl PartialEq for DataRecord {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for DataRecord {}

impl AsRef<Record> for DataRecord {
    fn as_ref(&self) -> &Record {
        &self.values
    }
}

impl Index<usize> for DataRecord {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.values[index]
    }
}

impl From<Record> for DataRecord {
    fn from(values: Record) -> Self {
        DataRecord {
            values,
            header: None,
        }
    }
}

impl Serialize for DataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.header {
            Some(header) => {
                let mut map = serializer.serialize_map(Some(self.values.len()))?;
                for (name, value) in header.iter().zip(self.values.iter()) {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            None => {
                let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
                for value in self.values.iter() {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}
