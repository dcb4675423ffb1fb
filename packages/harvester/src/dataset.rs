//! Normalized records and the per-family dataset container.
//!
//! Every source, whatever its wire format, decodes into the same four-field
//! [`Record`]. Downstream code never inspects columns dynamically; the shape
//! is the type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar timestamp text, carried verbatim from the wire, no timezone
    /// semantics attached.
    pub naive_timestamp: String,

    /// Integer identifier of the measured variable.
    pub variable: i64,

    /// Floating-point measurement.
    pub value: f64,

    /// Modification instant, always tagged UTC.
    pub last_modified_utc: DateTime<Utc>,
}

/// Ordered sequence of [`Record`]s for one family.
///
/// Order across days is not semantically meaningful; consumers must treat
/// the contents as a set keyed by `(naive_timestamp, variable)`. Still, the
/// container is deterministic: merging the same per-day datasets in the same
/// order yields byte-identical artifacts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset from already-normalized records.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Append a single record.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Append all records of `other`, consuming it. Duplicate
    /// `(naive_timestamp, variable)` pairs are not expected and not
    /// deduplicated.
    pub fn merge(&mut self, other: Dataset) {
        self.records.extend(other.records);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl IntoIterator for Dataset {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Declared content kind of a raw response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Json,
    Csv,
}

/// Opaque response body plus its declared kind.
///
/// Produced by the fetch step and consumed exactly once by the matching
/// source's parser.
#[derive(Debug, Clone)]
pub struct RawPayload {
    pub body: String,
    pub kind: PayloadKind,
}

impl RawPayload {
    pub fn new(body: impl Into<String>, kind: PayloadKind) -> Self {
        Self {
            body: body.into(),
            kind,
        }
    }
}
