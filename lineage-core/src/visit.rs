use lineage_scanner::Identifier;
use std::collections::HashSet;

/// Single-visit gate for one traversal.
///
/// `should_visit` answers `true` the first time it sees an identifier and
/// `false` forever after, whatever happened to the fetch in between.
#[derive(Debug, Default)]
pub struct VisitTracker {
    seen: HashSet<Identifier>,
}

impl VisitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_visit(&mut self, id: &Identifier) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.clone())
    }

    pub fn has_seen(&self, id: &Identifier) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
