// Human-readable reports for a finished trace

use crate::model::{FamilyGraph, PersonRecord, TraceOutcome};
use lineage_scanner::{Identifier, Vital};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Json,
    Text,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "text" | "txt" | "tree" => Some(ReportFormat::Text),
            _ => None,
        }
    }
}

pub fn generate_summary(outcome: &TraceOutcome) -> String {
    let graph = &outcome.graph;
    let root = graph.root();
    let root_name = graph
        .get(root)
        .and_then(|record| record.name.as_deref())
        .unwrap_or("unnamed");

    let mut report = String::new();
    report.push_str(RULE);
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Root record:        {} ({})\n", root, root_name));
    report.push_str(&format!("  Records found:      {}\n", graph.len()));
    report.push_str(&format!("  Generations:        {}\n", generation_count(graph)));
    report.push_str(&format!("  Failed lookups:     {}\n", outcome.failures.len()));
    report.push_str(&format!("  Skipped relations:  {}\n", outcome.skipped.len()));
    report.push_str(&format!("  Not traced:         {}\n", outcome.truncated.len()));
    report.push_str(&format!("  Status:             {}\n", outcome.status.as_str()));
    report.push_str(&format!(
        "  Started:            {}\n",
        outcome.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    let elapsed = outcome.finished_at - outcome.started_at;
    report.push_str(&format!(
        "  Duration:           {:.1} seconds\n",
        elapsed.num_milliseconds() as f64 / 1000.0
    ));

    if !outcome.failures.is_empty() {
        report.push('\n');
        report.push_str("## Failed lookups\n");
        for failure in &outcome.failures {
            report.push_str(&format!("  {:<12} {}", failure.id.as_str(), failure.kind.as_str()));
            if let Some(ref message) = failure.message {
                report.push_str(&format!("  {}", message));
            }
            report.push('\n');
        }
    }

    if !outcome.truncated.is_empty() {
        report.push('\n');
        report.push_str("## Not traced\n");
        let ids: Vec<&str> = outcome.truncated.iter().map(Identifier::as_str).collect();
        report.push_str(&format!("  {}\n", ids.join(", ")));
    }

    report.push('\n');
    report.push_str(RULE);
    report
}

/// Ancestor tree rooted at the requested record, parents indented under
/// their child.
///
/// A record already drawn elsewhere in the tree is shown as `(see above)`
/// instead of being expanded again, which also cuts cycles.
pub fn generate_pedigree_tree(outcome: &TraceOutcome) -> String {
    let root = outcome.graph.root();
    let mut tree = String::new();
    tree.push_str(RULE);
    tree.push_str("PEDIGREE\n");
    tree.push_str(RULE);
    tree.push('\n');

    let mut shown = HashSet::new();
    tree.push_str(&node_label(outcome, root, &mut shown));
    tree.push('\n');

    // (id, line prefix, last among its siblings), popped in drawing order.
    let mut stack: Vec<(&Identifier, String, bool)> = Vec::new();
    if let Some(record) = outcome.graph.get(root) {
        push_parents(&mut stack, record, String::new());
    }

    while let Some((id, prefix, is_last)) = stack.pop() {
        let branch = if is_last { "└── " } else { "├── " };
        let expand = !shown.contains(id);

        tree.push_str(&prefix);
        tree.push_str(branch);
        tree.push_str(&node_label(outcome, id, &mut shown));
        tree.push('\n');

        if expand && let Some(record) = outcome.graph.get(id) {
            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            push_parents(&mut stack, record, child_prefix);
        }
    }

    tree
}

fn push_parents<'a>(
    stack: &mut Vec<(&'a Identifier, String, bool)>,
    record: &'a PersonRecord,
    prefix: String,
) {
    let last = record.parents.len().saturating_sub(1);
    for (i, parent) in record.parents.iter().enumerate().rev() {
        stack.push((parent, prefix.clone(), i == last));
    }
}

fn node_label(outcome: &TraceOutcome, id: &Identifier, shown: &mut HashSet<Identifier>) -> String {
    if let Some(record) = outcome.graph.get(id) {
        if !shown.insert(id.clone()) {
            return format!("{}  (see above)", id);
        }
        let name = record.name.as_deref().unwrap_or("(unnamed)");
        return format!("{}  {}{}", id, name, lifespan(record));
    }

    if let Some(failure) = outcome.failure_for(id) {
        return format!("{}  [{}]", id, failure.kind.as_str().replace('_', " "));
    }
    if outcome.truncated.contains(id) {
        return format!("{}  [not traced]", id);
    }
    format!("{}  [missing]", id)
}

fn lifespan(record: &PersonRecord) -> String {
    let born = record.birth.as_ref().and_then(vital_date);
    let died = record.death.as_ref().and_then(vital_date);

    match (born, died) {
        (Some(born), Some(died)) => format!(" ({} - {})", born, died),
        (Some(born), None) => format!(" (b. {})", born),
        (None, Some(died)) => format!(" (d. {})", died),
        (None, None) => String::new(),
    }
}

fn vital_date(vital: &Vital) -> Option<&str> {
    vital.date.as_deref()
}

// Number of generations reachable from the root, counting the root itself.
// Each record counts at its nearest generation, so cycles cannot inflate it.
fn generation_count(graph: &FamilyGraph) -> usize {
    let root = graph.root();
    if !graph.contains(root) {
        return 0;
    }

    let mut deepest = 0;
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([(root, 1usize)]);

    while let Some((id, depth)) = queue.pop_front() {
        deepest = deepest.max(depth);
        if let Some(record) = graph.get(id) {
            for parent in &record.parents {
                if graph.contains(parent) && seen.insert(parent) {
                    queue.push_back((parent, depth + 1));
                }
            }
        }
    }

    deepest
}
