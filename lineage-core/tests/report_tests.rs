// Tests for report generation functionality

mod common;

use common::{FakeSite, JsonExtractor, vital};
use lineage_core::report::{ReportFormat, generate_pedigree_tree, generate_summary};
use lineage_core::{FamilyGraph, GraphBuilder, PersonRecord, TraceLimits, TraceOutcome, TraceStatus};
use lineage_scanner::{Identifier, PersonFields, RelationKind, RelationRef};

async fn trace(site: FakeSite, root: &str) -> TraceOutcome {
    GraphBuilder::new(site, JsonExtractor)
        .run(Identifier::from(root))
        .await
        .unwrap()
}

fn named(name: &str, born: Option<&str>, died: Option<&str>, parents: &[&str]) -> PersonFields {
    PersonFields {
        name: Some(name.to_string()),
        birth: vital(born, None),
        death: vital(died, None),
        relations: parents
            .iter()
            .map(|p| RelationRef::new(*p, RelationKind::Parent))
            .collect(),
    }
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str_json() {
    assert!(matches!(ReportFormat::from_str("json"), Some(ReportFormat::Json)));
}

#[test]
fn test_report_format_from_str_text() {
    assert!(matches!(ReportFormat::from_str("text"), Some(ReportFormat::Text)));
    assert!(matches!(ReportFormat::from_str("tree"), Some(ReportFormat::Text)));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert!(matches!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json)));
    assert!(matches!(ReportFormat::from_str("Text"), Some(ReportFormat::Text)));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert!(ReportFormat::from_str("csv").is_none());
    assert!(ReportFormat::from_str("").is_none());
}

// ============================================================================
// Summary Tests
// ============================================================================

#[tokio::test]
async fn test_summary_counts() {
    let site = FakeSite::new()
        .page("100", named("Jane Doe", Some("1850"), None, &["200", "404"]))
        .person("200", &["300"])
        .person("300", &[])
        .not_found("404");
    let outcome = trace(site, "100").await;

    let summary = generate_summary(&outcome);

    assert!(summary.contains("Root record:        100 (Jane Doe)"));
    assert!(summary.contains("Records found:      3"));
    assert!(summary.contains("Generations:        3"));
    assert!(summary.contains("Failed lookups:     1"));
    assert!(summary.contains("Status:             complete"));
    assert!(summary.contains("## Failed lookups"));
    assert!(summary.contains("not_found"));
}

#[tokio::test]
async fn test_summary_without_failures_has_no_failure_section() {
    let site = FakeSite::new().person("1", &[]);
    let outcome = trace(site, "1").await;

    let summary = generate_summary(&outcome);

    assert!(summary.contains("Failed lookups:     0"));
    assert!(!summary.contains("## Failed lookups"));
    assert!(!summary.contains("## Not traced"));
}

#[tokio::test]
async fn test_summary_lists_truncated_records() {
    let site = FakeSite::new()
        .person("1", &["2"])
        .person("2", &["3"])
        .person("3", &[]);
    let outcome = GraphBuilder::new(site, JsonExtractor)
        .with_limits(TraceLimits {
            max_depth: Some(1),
            max_records: None,
        })
        .run(Identifier::from("1"))
        .await
        .unwrap();

    let summary = generate_summary(&outcome);

    assert!(summary.contains("Not traced:         1"));
    assert!(summary.contains("## Not traced"));
}

// ============================================================================
// Pedigree Tree Tests
// ============================================================================

#[tokio::test]
async fn test_pedigree_tree_layout() {
    let site = FakeSite::new()
        .page("1", named("Jane Doe", Some("1850"), Some("1921"), &["2", "3"]))
        .page("2", named("John Doe", Some("1820"), None, &["4"]))
        .page("3", named("Mary Roe", None, Some("1900"), &[]))
        .page("4", named("Old Doe", None, None, &[]));
    let outcome = trace(site, "1").await;

    let tree = generate_pedigree_tree(&outcome);

    let expected = "\
1  Jane Doe (1850 - 1921)
├── 2  John Doe (b. 1820)
│   └── 4  Old Doe
└── 3  Mary Roe (d. 1900)
";
    assert!(tree.contains(expected), "unexpected tree:\n{}", tree);
}

#[tokio::test]
async fn test_pedigree_tree_cuts_cycles() {
    let site = FakeSite::new()
        .person("100", &["200", "300"])
        .person("200", &[])
        .person("300", &["100"]);
    let outcome = trace(site, "100").await;

    let tree = generate_pedigree_tree(&outcome);

    assert!(tree.contains("    └── 100  (see above)"), "unexpected tree:\n{}", tree);
    assert_eq!(tree.matches("Person 100").count(), 1);
}

#[tokio::test]
async fn test_pedigree_tree_marks_failed_parents() {
    let site = FakeSite::new().person("100", &["404"]).not_found("404");
    let outcome = trace(site, "100").await;

    let tree = generate_pedigree_tree(&outcome);

    assert!(tree.contains("└── 404  [not found]"), "unexpected tree:\n{}", tree);
}

#[test]
fn test_pedigree_tree_handles_long_chains() {
    const GENERATIONS: usize = 3_000;

    let mut graph = FamilyGraph::new(Identifier::from("0"));
    for generation in 0..GENERATIONS {
        let mut record = PersonRecord::new(Identifier::from(generation.to_string()));
        if generation + 1 < GENERATIONS {
            record.parents = vec![Identifier::from((generation + 1).to_string())];
        }
        graph.insert(record);
    }
    let now = chrono::Utc::now();
    let outcome = TraceOutcome {
        graph,
        failures: Vec::new(),
        skipped: Vec::new(),
        truncated: Vec::new(),
        status: TraceStatus::Complete,
        started_at: now,
        finished_at: now,
    };

    let tree = generate_pedigree_tree(&outcome);

    let last = tree.lines().last().unwrap();
    assert_eq!(last, format!("{}└── 2999  (unnamed)", " ".repeat(4 * (GENERATIONS - 2))));
    assert_eq!(tree.matches("(unnamed)").count(), GENERATIONS);
}
