use chrono::{DateTime, Utc};
use lineage_scanner::{Identifier, ScanError, Vital};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured data for one visited memorial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub id: Identifier,
    pub name: Option<String>,
    pub birth: Option<Vital>,
    pub death: Option<Vital>,
    pub parents: Vec<Identifier>,
    pub siblings: Vec<Identifier>,
    pub spouses: Vec<Identifier>,
}

impl PersonRecord {
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            name: None,
            birth: None,
            death: None,
            parents: Vec::new(),
            siblings: Vec::new(),
            spouses: Vec::new(),
        }
    }
}

/// Every record visited in one run, keyed by identifier.
///
/// Entries are only ever added. A second insert for an identifier already
/// present is refused and the original entry is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyGraph {
    root: Identifier,
    records: BTreeMap<Identifier, PersonRecord>,
}

impl FamilyGraph {
    pub fn new(root: Identifier) -> Self {
        Self {
            root,
            records: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Identifier {
        &self.root
    }

    /// Returns `false` (and leaves the graph untouched) if a record with the
    /// same identifier is already present.
    pub fn insert(&mut self, record: PersonRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.records.insert(record.id.clone(), record);
        true
    }

    pub fn get(&self, id: &Identifier) -> Option<&PersonRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonRecord> {
        self.records.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &Identifier> {
        self.records.keys()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    TransportError,
    ExtractionError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NotFound => "not_found",
            FailureKind::TransportError => "transport_error",
            FailureKind::ExtractionError => "extraction_error",
        }
    }
}

impl From<&ScanError> for FailureKind {
    fn from(err: &ScanError) -> Self {
        match err {
            ScanError::NotFound(_) => FailureKind::NotFound,
            ScanError::ExtractionError(_) => FailureKind::ExtractionError,
            ScanError::HttpError(_) | ScanError::HttpStatus { .. } | ScanError::InvalidUrl(_) => {
                FailureKind::TransportError
            }
        }
    }
}

/// An identifier that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub id: Identifier,
    pub kind: FailureKind,
    pub message: Option<String>,
}

impl FailureRecord {
    pub fn new(id: Identifier, kind: FailureKind, message: Option<String>) -> Self {
        Self { id, kind, message }
    }

    pub fn from_scan_error(id: Identifier, err: &ScanError) -> Self {
        Self::new(id, FailureKind::from(err), Some(err.to_string()))
    }
}

/// A relative reference dropped because its relation could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRelation {
    pub from: Identifier,
    pub to: Identifier,
    /// Relative's name as shown on the page.
    pub name: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStatus {
    /// The parent frontier was exhausted.
    Complete,
    Cancelled,
    RecordLimitReached,
}

impl TraceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceStatus::Complete => "complete",
            TraceStatus::Cancelled => "cancelled",
            TraceStatus::RecordLimitReached => "record limit reached",
        }
    }
}

/// Result of one run: the graph plus everything needed to tell an ancestor
/// chain that ends from one that broke.
#[derive(Debug, Clone)]
pub struct TraceOutcome {
    pub graph: FamilyGraph,
    pub failures: Vec<FailureRecord>,
    pub skipped: Vec<SkippedRelation>,
    /// Parent identifiers that were discovered but deliberately not fetched
    /// because of a depth or size limit, or cancellation.
    pub truncated: Vec<Identifier>,
    pub status: TraceStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TraceOutcome {
    pub fn failure_for(&self, id: &Identifier) -> Option<&FailureRecord> {
        self.failures.iter().find(|f| &f.id == id)
    }

    pub fn is_complete(&self) -> bool {
        self.status == TraceStatus::Complete && self.truncated.is_empty()
    }
}
