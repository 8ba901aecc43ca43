//! Record collections.
//!
//! A [`Collection`] is either an ordered sequence of records or a keyed
//! mapping of records. Queries see both the same way, as an ordered run of
//! [`Entry`]s, and rebuild a collection of the original kind from the
//! entries that survive.

use serde::ser::{Serialize, Serializer};

use crate::error::{QueryError, Result};
use crate::value::{Record, Value};

/// A set of records to query.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    /// Ordered list of records.
    Sequence(Vec<Value>),
    /// Records under opaque keys, in insertion order.
    Mapping(Record),
}

/// The shape of a [`Collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Sequence,
    Mapping,
}

impl CollectionKind {
    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Sequence => "sequence",
            CollectionKind::Mapping => "mapping",
        }
    }
}

/// Where an entry sits in its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey<'a> {
    /// Position in a sequence.
    Index(usize),
    /// Key in a mapping.
    Key(&'a str),
}

/// A record borrowed from a collection, together with its position or key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<'a> {
    pub key: EntryKey<'a>,
    pub record: &'a Value,
}

impl<'a> Entry<'a> {
    /// Returns the mapping key, if this entry came from a mapping.
    pub fn map_key(&self) -> Option<&'a str> {
        match self.key {
            EntryKey::Key(key) => Some(key),
            EntryKey::Index(_) => None,
        }
    }
}

impl Collection {
    /// Returns the kind of this collection.
    pub fn kind(&self) -> CollectionKind {
        match self {
            Collection::Sequence(_) => CollectionKind::Sequence,
            Collection::Mapping(_) => CollectionKind::Mapping,
        }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        match self {
            Collection::Sequence(items) => items.len(),
            Collection::Mapping(record) => record.len(),
        }
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the records in order, without their keys.
    pub fn records(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Collection::Sequence(items) => Box::new(items.iter()),
            Collection::Mapping(record) => Box::new(record.values()),
        }
    }

    /// Iterates the records in order, with their positions or keys.
    pub fn entries(&self) -> Box<dyn Iterator<Item = Entry<'_>> + '_> {
        match self {
            Collection::Sequence(items) => {
                Box::new(items.iter().enumerate().map(|(i, record)| Entry {
                    key: EntryKey::Index(i),
                    record,
                }))
            }
            Collection::Mapping(map) => Box::new(map.iter().map(|(key, record)| Entry {
                key: EntryKey::Key(key),
                record,
            })),
        }
    }

    /// Looks up a record by mapping key, or by decimal index in a sequence.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Collection::Sequence(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            Collection::Mapping(record) => record.get(key),
        }
    }

    /// Rebuilds a collection of the given kind from borrowed entries.
    ///
    /// Sequences ignore the keys. Mappings use each entry's key, falling back
    /// to the decimal index for entries that came from a sequence.
    pub fn from_entries<'a, I>(kind: CollectionKind, entries: I) -> Collection
    where
        I: IntoIterator<Item = Entry<'a>>,
    {
        match kind {
            CollectionKind::Sequence => Collection::Sequence(
                entries
                    .into_iter()
                    .map(|entry| entry.record.clone())
                    .collect(),
            ),
            CollectionKind::Mapping => Collection::Mapping(
                entries
                    .into_iter()
                    .map(|entry| {
                        let key = match entry.key {
                            EntryKey::Key(key) => key.to_string(),
                            EntryKey::Index(i) => i.to_string(),
                        };
                        (key, entry.record.clone())
                    })
                    .collect(),
            ),
        }
    }
}

impl TryFrom<Value> for Collection {
    type Error = QueryError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Collection::Sequence(items)),
            Value::Object(record) => Ok(Collection::Mapping(record)),
            other => Err(QueryError::UnsupportedCollection {
                found: other.type_name(),
            }),
        }
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        match collection {
            Collection::Sequence(items) => Value::Array(items),
            Collection::Mapping(record) => Value::Object(record),
        }
    }
}

impl From<Vec<Value>> for Collection {
    fn from(items: Vec<Value>) -> Self {
        Collection::Sequence(items)
    }
}

impl From<Record> for Collection {
    fn from(record: Record) -> Self {
        Collection::Mapping(record)
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Collection::Sequence(items) => items.serialize(serializer),
            Collection::Mapping(record) => record.serialize(serializer),
        }
    }
}
