// In-memory stand-ins for the site, used by the traversal tests.
//
// Pages are stored as serialized `PersonFields`; the fetcher hands back the
// JSON and the extractor parses it, so every run goes through both seams.

#![allow(dead_code)]

use async_trait::async_trait;
use lineage_scanner::error::Result;
use lineage_scanner::{
    Identifier, PersonFields, RecordExtractor, RecordFetcher, RelationKind, RelationRef,
    ScanError, Vital,
};
use std::collections::HashMap;
use std::sync::Mutex;

pub enum Page {
    Person(PersonFields),
    NotFound,
    Broken,
    Garbled,
}

#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<Identifier, Page>,
    calls: Mutex<Vec<Identifier>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a person whose page lists the given parents and nothing else.
    pub fn person(mut self, id: &str, parents: &[&str]) -> Self {
        let fields = PersonFields {
            name: Some(format!("Person {}", id)),
            birth: None,
            death: None,
            relations: parents
                .iter()
                .map(|p| RelationRef::new(*p, RelationKind::Parent).with_label("Parents"))
                .collect(),
        };
        self.pages.insert(Identifier::from(id), Page::Person(fields));
        self
    }

    pub fn page(mut self, id: &str, fields: PersonFields) -> Self {
        self.pages.insert(Identifier::from(id), Page::Person(fields));
        self
    }

    pub fn not_found(mut self, id: &str) -> Self {
        self.pages.insert(Identifier::from(id), Page::NotFound);
        self
    }

    /// A page the server fails to deliver (5xx).
    pub fn broken(mut self, id: &str) -> Self {
        self.pages.insert(Identifier::from(id), Page::Broken);
        self
    }

    /// A page that arrives but cannot be read.
    pub fn garbled(mut self, id: &str) -> Self {
        self.pages.insert(Identifier::from(id), Page::Garbled);
        self
    }

    pub fn calls(&self) -> Vec<Identifier> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, id: &str) -> usize {
        let id = Identifier::from(id);
        self.calls.lock().unwrap().iter().filter(|c| **c == id).count()
    }
}

#[async_trait]
impl RecordFetcher for FakeSite {
    async fn fetch(&self, id: &Identifier) -> Result<String> {
        self.calls.lock().unwrap().push(id.clone());

        match self.pages.get(id) {
            Some(Page::Person(fields)) => Ok(serde_json::to_string(fields).unwrap()),
            Some(Page::Garbled) => Ok("<html>captcha</html>".to_string()),
            Some(Page::Broken) => Err(ScanError::HttpStatus {
                id: id.clone(),
                status: 503,
            }),
            Some(Page::NotFound) | None => Err(ScanError::NotFound(id.clone())),
        }
    }
}

pub struct JsonExtractor;

impl RecordExtractor for JsonExtractor {
    fn extract(&self, id: &Identifier, raw: &str) -> Result<PersonFields> {
        serde_json::from_str(raw)
            .map_err(|e| ScanError::ExtractionError(format!("record {}: {}", id, e)))
    }
}

pub fn vital(date: Option<&str>, place: Option<&str>) -> Option<Vital> {
    Vital::from_parts(date.map(String::from), place.map(String::from))
}

pub fn ids(raw: &[&str]) -> Vec<Identifier> {
    raw.iter().map(|id| Identifier::from(*id)).collect()
}
