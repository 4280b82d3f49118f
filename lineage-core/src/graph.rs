use crate::error::{Result, TraceError};
use crate::model::{
    FailureKind, FailureRecord, FamilyGraph, PersonRecord, SkippedRelation, TraceOutcome,
    TraceStatus,
};
use crate::visit::VisitTracker;
use chrono::Utc;
use lineage_scanner::error::Result as ScanResult;
use lineage_scanner::{
    Identifier, PersonFields, RecordExtractor, RecordFetcher, RelationKind,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Called before each fetch with the number of records recorded so far and
/// the identifier about to be fetched.
pub type TraceProgressCallback = Arc<dyn Fn(usize, &Identifier) + Send + Sync>;

/// Safety bounds for pathological or cyclic data. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceLimits {
    /// Deepest generation fetched; the root is generation 0.
    pub max_depth: Option<usize>,
    /// Stop once the graph holds this many records.
    pub max_records: Option<usize>,
}

/// Expands a record's ancestry, parents first, depth first.
///
/// Siblings and spouses are recorded but never followed. Each identifier is
/// fetched at most once per run; a failed fetch is recorded and never retried.
pub struct GraphBuilder<F, E> {
    fetcher: F,
    extractor: E,
    limits: TraceLimits,
    cancel_flag: Option<Arc<AtomicBool>>,
    progress_callback: Option<TraceProgressCallback>,
}

impl<F: RecordFetcher, E: RecordExtractor> GraphBuilder<F, E> {
    pub fn new(fetcher: F, extractor: E) -> Self {
        Self {
            fetcher,
            extractor,
            limits: TraceLimits::default(),
            cancel_flag: None,
            progress_callback: None,
        }
    }

    pub fn with_limits(mut self, limits: TraceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub fn with_progress_callback(mut self, callback: TraceProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Trace the ancestry of `root`.
    ///
    /// Only a failure of the root itself is an error. Every other failure is
    /// collected into the outcome and the run carries on.
    pub async fn run(&self, root: Identifier) -> Result<TraceOutcome> {
        info!("Tracing ancestry of record {}", root);
        let started_at = Utc::now();

        let mut tracker = VisitTracker::new();
        let mut graph = FamilyGraph::new(root.clone());
        let mut failures = Vec::new();
        let mut skipped = Vec::new();
        let mut truncated = BTreeSet::new();
        let mut status = TraceStatus::Complete;

        // Generation each recorded id was expanded at.
        let mut expanded_at: HashMap<Identifier, usize> = HashMap::new();

        // Popping from the back and pushing parents in reverse keeps the
        // visiting order of a recursive depth-first walk.
        let mut stack: Vec<(Identifier, usize)> = vec![(root.clone(), 0)];

        while let Some((id, depth)) = stack.pop() {
            if tracker.has_seen(&id) {
                // A shorter path to a recorded id may bring its depth-cut
                // parents back within the limit. Nothing is fetched again.
                if self.limits.max_depth.is_some()
                    && let Some(previous) = expanded_at.get_mut(&id)
                    && depth < *previous
                    && let Some(record) = graph.get(&id)
                {
                    debug!("Record {} reached at generation {}, was {}", id, depth, previous);
                    *previous = depth;
                    for parent in record.parents.iter().rev() {
                        stack.push((parent.clone(), depth + 1));
                    }
                } else {
                    debug!("Record {} already visited", id);
                }
                continue;
            }

            if self.is_cancelled() {
                info!("Trace cancelled with {} record(s) collected", graph.len());
                status = TraceStatus::Cancelled;
                truncated.insert(id);
                truncated.extend(stack.drain(..).map(|(id, _)| id));
                break;
            }

            if let Some(max_records) = self.limits.max_records
                && graph.len() >= max_records.max(1)
            {
                info!("Record limit of {} reached", max_records);
                status = TraceStatus::RecordLimitReached;
                truncated.insert(id);
                truncated.extend(stack.drain(..).map(|(id, _)| id));
                break;
            }

            if let Some(max_depth) = self.limits.max_depth
                && depth > max_depth
            {
                debug!("Record {} is beyond depth {}, not fetched", id, max_depth);
                truncated.insert(id);
                continue;
            }

            if !tracker.should_visit(&id) {
                continue;
            }

            if let Some(ref callback) = self.progress_callback {
                callback(graph.len(), &id);
            }

            let fields = match self.resolve(&id).await {
                Ok(fields) => fields,
                Err(e) => {
                    if id == root {
                        return Err(TraceError::RootUnavailable {
                            id,
                            kind: FailureKind::from(&e),
                            message: e.to_string(),
                        });
                    }
                    warn!("Could not resolve record {}: {}", id, e);
                    failures.push(FailureRecord::from_scan_error(id, &e));
                    continue;
                }
            };

            let record = classify_relations(&id, fields, &mut skipped);
            for parent in record.parents.iter().rev() {
                stack.push((parent.clone(), depth + 1));
            }
            expanded_at.insert(id, depth);
            graph.insert(record);
        }

        // Anything seen by the tracker was either recorded or failed.
        truncated.retain(|id| !tracker.has_seen(id));

        // A stop with nothing left untraced is a finished run.
        if status != TraceStatus::Complete && truncated.is_empty() {
            status = TraceStatus::Complete;
        }

        if graph.is_empty() {
            return Err(TraceError::Cancelled(root));
        }

        info!(
            "Trace {}. {} record(s), {} failure(s), {} skipped relation(s)",
            status.as_str(),
            graph.len(),
            failures.len(),
            skipped.len()
        );

        Ok(TraceOutcome {
            graph,
            failures,
            skipped,
            truncated: truncated.into_iter().collect(),
            status,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn resolve(&self, id: &Identifier) -> ScanResult<PersonFields> {
        let raw = self.fetcher.fetch(id).await?;
        self.extractor.extract(id, &raw)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Sort an extracted page's relatives into a record by their tag alone.
///
/// Untagged references are dropped into `skipped`. A relative listed twice
/// under the same kind is kept once, at its first position.
pub fn classify_relations(
    id: &Identifier,
    fields: PersonFields,
    skipped: &mut Vec<SkippedRelation>,
) -> PersonRecord {
    let mut record = PersonRecord::new(id.clone());
    record.name = fields.name;
    record.birth = fields.birth;
    record.death = fields.death;

    for relation in fields.relations {
        let bucket = match relation.kind {
            RelationKind::Parent => &mut record.parents,
            RelationKind::Sibling => &mut record.siblings,
            RelationKind::Spouse => &mut record.spouses,
            RelationKind::Unknown => {
                debug!(
                    "Record {}: skipping unclassified relation {} {} ({})",
                    id,
                    relation.id,
                    relation.name.as_deref().unwrap_or("(unnamed)"),
                    relation.label.as_deref().unwrap_or("no label")
                );
                skipped.push(SkippedRelation {
                    from: id.clone(),
                    to: relation.id,
                    name: relation.name,
                    label: relation.label,
                });
                continue;
            }
        };

        if !bucket.contains(&relation.id) {
            bucket.push(relation.id);
        }
    }

    record
}
