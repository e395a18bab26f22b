//! Row model for the reader.
//!
//! A [`Row`] is one materialized record. It is either keyed by header names ([`Row::Mapped`]) or
//! a plain ordered list of fields ([`Row::Raw`]). Rows are only ever read: the [`FieldView`]
//! handed out by the reader rejects every mutation with
//! [`crate::ReaderError::ReadOnlyViolation`].

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::{ReaderError, ReaderResult};

/// Key used to look up a field in a [`Row`]: a header name or a zero-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey<'a> {
    /// Header name.
    Name(&'a str),
    /// Zero-based column position.
    Index(usize),
}

impl<'a> From<&'a str> for FieldKey<'a> {
    fn from(name: &'a str) -> Self {
        FieldKey::Name(name)
    }
}

impl<'a> From<&'a String> for FieldKey<'a> {
    fn from(name: &'a String) -> Self {
        FieldKey::Name(name.as_str())
    }
}

impl From<usize> for FieldKey<'_> {
    fn from(idx: usize) -> Self {
        FieldKey::Index(idx)
    }
}

impl fmt::Display for FieldKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => write!(f, "'{name}'"),
            FieldKey::Index(idx) => write!(f, "#{idx}"),
        }
    }
}

/// One materialized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Header name → value pairs, in header order.
    ///
    /// Produced when a header is configured and the record has exactly as many fields as the
    /// header. Names are unique: a repeated header name keeps its first position and the value
    /// of its last occurrence.
    Mapped(Vec<(String, String)>),
    /// Fields in record order.
    ///
    /// Produced when no header is configured, or when the record's field count disagrees with
    /// the header's.
    Raw(Vec<String>),
}

impl Row {
    /// Build a row from a parsed record.
    ///
    /// `header` is `None` when the reader was configured without a header.
    pub fn from_fields(header: Option<&[String]>, fields: Vec<String>) -> Self {
        match header {
            Some(names) if names.len() == fields.len() => {
                let mut pairs: Vec<(String, String)> = Vec::with_capacity(names.len());
                for (name, value) in names.iter().zip(fields) {
                    match pairs.iter_mut().find(|(n, _)| n == name) {
                        Some(slot) => slot.1 = value,
                        None => pairs.push((name.clone(), value)),
                    }
                }
                Row::Mapped(pairs)
            }
            _ => Row::Raw(fields),
        }
    }

    /// `true` for name-keyed rows.
    pub fn is_mapped(&self) -> bool {
        matches!(self, Row::Mapped(_))
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        match self {
            Row::Mapped(pairs) => pairs.len(),
            Row::Raw(fields) => fields.len(),
        }
    }

    /// `true` when the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a field value.
    ///
    /// Mapped rows answer both names and positions. Raw rows only answer positions; a name
    /// lookup on a raw row yields `None`.
    pub fn get<'k>(&self, key: impl Into<FieldKey<'k>>) -> Option<&str> {
        match (self, key.into()) {
            (Row::Mapped(pairs), FieldKey::Name(name)) => pairs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            (Row::Mapped(pairs), FieldKey::Index(idx)) => pairs.get(idx).map(|(_, v)| v.as_str()),
            (Row::Raw(_), FieldKey::Name(_)) => None,
            (Row::Raw(fields), FieldKey::Index(idx)) => fields.get(idx).map(String::as_str),
        }
    }

    /// Whether `key` resolves to a field in this row.
    pub fn contains<'k>(&self, key: impl Into<FieldKey<'k>>) -> bool {
        self.get(key).is_some()
    }

    /// Field values in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let (mapped, raw) = match self {
            Row::Mapped(pairs) => (Some(pairs.iter().map(|(_, v)| v.as_str())), None),
            Row::Raw(fields) => (None, Some(fields.iter().map(String::as_str))),
        };
        mapped.into_iter().flatten().chain(raw.into_iter().flatten())
    }

    /// Owned copy of the field values in order.
    pub fn to_vec(&self) -> Vec<String> {
        self.values().map(str::to_owned).collect()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Row::Mapped(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (name, value) in pairs {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Row::Raw(fields) => {
                let mut seq = serializer.serialize_seq(Some(fields.len()))?;
                for value in fields {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}

/// Read-only view over the reader's current row.
///
/// Lookups on an exhausted reader (no current row) return `None`. [`FieldView::set`] and
/// [`FieldView::unset`] always fail.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    row: Option<&'a Row>,
}

impl<'a> FieldView<'a> {
    pub(crate) fn new(row: Option<&'a Row>) -> Self {
        Self { row }
    }

    /// Field value for `key`, or `None` if absent.
    pub fn get<'k>(&self, key: impl Into<FieldKey<'k>>) -> Option<&'a str> {
        self.row.and_then(|row| row.get(key))
    }

    /// Whether `key` resolves to a field of the current row.
    pub fn contains<'k>(&self, key: impl Into<FieldKey<'k>>) -> bool {
        self.get(key).is_some()
    }

    /// Always fails with [`ReaderError::ReadOnlyViolation`].
    pub fn set<'k>(&self, key: impl Into<FieldKey<'k>>, _value: impl Into<String>) -> ReaderResult<()> {
        Err(ReaderError::ReadOnlyViolation {
            key: key.into().to_string(),
        })
    }

    /// Always fails with [`ReaderError::ReadOnlyViolation`].
    pub fn unset<'k>(&self, key: impl Into<FieldKey<'k>>) -> ReaderResult<()> {
        Err(ReaderError::ReadOnlyViolation {
            key: key.into().to_string(),
        })
    }
}
