// Output document: the finished graph as one JSON object.
//
// Shape:
//   {
//     "root": "<id>",
//     "<id>": { "name", "birth": {"date","place"}|null, "death": ..., "parents", "siblings", "spouses" },
//     ...,
//     "failures": [ {"id","kind","message"} ],
//     "skipped_relations": [ {"from","to","name","label"} ],
//     "truncated": [ "<id>", ... ],
//     "status": "complete" | "cancelled" | "record_limit_reached"
//   }
//
// Absent values are always written as null so that a missing death place
// and a missing death event stay distinguishable after a round trip.

use crate::error::DocumentError;
use crate::model::{
    FailureRecord, FamilyGraph, PersonRecord, SkippedRelation, TraceOutcome, TraceStatus,
};
use lineage_scanner::{Identifier, Vital};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const ROOT_KEY: &str = "root";
pub const FAILURES_KEY: &str = "failures";
pub const SKIPPED_KEY: &str = "skipped_relations";
pub const TRUNCATED_KEY: &str = "truncated";
pub const STATUS_KEY: &str = "status";

const RESERVED_KEYS: [&str; 5] = [ROOT_KEY, FAILURES_KEY, SKIPPED_KEY, TRUNCATED_KEY, STATUS_KEY];

pub type Result<T> = std::result::Result<T, DocumentError>;

/// Serialized form of one [`PersonRecord`]; the identifier is the map key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonEntry {
    pub name: Option<String>,
    pub birth: Option<Vital>,
    pub death: Option<Vital>,
    pub parents: Vec<Identifier>,
    pub siblings: Vec<Identifier>,
    pub spouses: Vec<Identifier>,
}

impl From<&PersonRecord> for PersonEntry {
    fn from(record: &PersonRecord) -> Self {
        Self {
            name: record.name.clone(),
            birth: record.birth.clone(),
            death: record.death.clone(),
            parents: record.parents.clone(),
            siblings: record.siblings.clone(),
            spouses: record.spouses.clone(),
        }
    }
}

impl PersonEntry {
    pub fn into_record(self, id: Identifier) -> PersonRecord {
        PersonRecord {
            id,
            name: self.name,
            birth: self.birth,
            death: self.death,
            parents: self.parents,
            siblings: self.siblings,
            spouses: self.spouses,
        }
    }
}

/// A document read back from disk.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub graph: FamilyGraph,
    pub failures: Vec<FailureRecord>,
    pub skipped: Vec<SkippedRelation>,
    pub truncated: Vec<Identifier>,
    pub status: TraceStatus,
}

pub fn render_document(outcome: &TraceOutcome) -> Result<Value> {
    let mut document = Map::new();
    document.insert(
        ROOT_KEY.to_string(),
        Value::String(outcome.graph.root().to_string()),
    );

    for record in outcome.graph.iter() {
        if RESERVED_KEYS.contains(&record.id.as_str()) {
            return Err(DocumentError::ReservedKey(record.id.clone()));
        }
        document.insert(
            record.id.to_string(),
            serde_json::to_value(PersonEntry::from(record))?,
        );
    }

    document.insert(
        FAILURES_KEY.to_string(),
        serde_json::to_value(&outcome.failures)?,
    );
    document.insert(
        SKIPPED_KEY.to_string(),
        serde_json::to_value(&outcome.skipped)?,
    );
    document.insert(
        TRUNCATED_KEY.to_string(),
        serde_json::to_value(&outcome.truncated)?,
    );
    document.insert(
        STATUS_KEY.to_string(),
        serde_json::to_value(outcome.status)?,
    );

    Ok(Value::Object(document))
}

pub fn to_json_string(outcome: &TraceOutcome, pretty: bool) -> Result<String> {
    let document = render_document(outcome)?;
    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(json)
}

pub fn parse_document(json: &str) -> Result<ParsedDocument> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(mut document) = value else {
        return Err(DocumentError::Malformed(
            "top level is not an object".to_string(),
        ));
    };

    let root = match document.remove(ROOT_KEY) {
        Some(Value::String(root)) => Identifier::from(root),
        Some(_) => {
            return Err(DocumentError::Malformed(
                "root is not a string".to_string(),
            ));
        }
        None => return Err(DocumentError::Malformed("missing root".to_string())),
    };

    let failures = match document.remove(FAILURES_KEY) {
        Some(value) => serde_json::from_value(value)?,
        None => Vec::new(),
    };
    let skipped = match document.remove(SKIPPED_KEY) {
        Some(value) => serde_json::from_value(value)?,
        None => Vec::new(),
    };
    let truncated = match document.remove(TRUNCATED_KEY) {
        Some(value) => serde_json::from_value(value)?,
        None => Vec::new(),
    };
    // Documents without a status predate it and were always full runs.
    let status = match document.remove(STATUS_KEY) {
        Some(value) => serde_json::from_value(value)?,
        None => TraceStatus::Complete,
    };

    let mut graph = FamilyGraph::new(root);
    for (key, value) in document {
        let entry: PersonEntry = serde_json::from_value(value)?;
        graph.insert(entry.into_record(Identifier::from(key)));
    }

    Ok(ParsedDocument {
        graph,
        failures,
        skipped,
        truncated,
        status,
    })
}

/// Write `contents` to `path` so that readers only ever see the old file or
/// the complete new one.
///
/// The data goes to a temporary file in the destination directory first and
/// is renamed over the target once fully flushed.
pub fn write_document_atomic(contents: &str, path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| DocumentError::Io(e.error))?;
    Ok(())
}
