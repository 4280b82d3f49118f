pub mod document;
pub mod error;
pub mod graph;
pub mod model;
pub mod report;
pub mod trace;
pub mod visit;

pub use error::{DocumentError, TraceError};
pub use graph::{GraphBuilder, TraceLimits, TraceProgressCallback};
pub use model::{
    FailureKind, FailureRecord, FamilyGraph, PersonRecord, SkippedRelation, TraceOutcome,
    TraceStatus,
};
pub use visit::VisitTracker;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
  _ _
 | (_)_ __   ___  __ _  __ _  ___
 | | | '_ \ / _ \/ _` |/ _` |/ _ \
 | | | | | |  __/ (_| | (_| |  __/
 |_|_|_| |_|\___|\__,_|\__, |\___|
                       |___/
"#;
    println!("{}", banner.bright_green());
    println!(
        "  {} v{}\n",
        "ancestry tracer for memorial records".bright_white(),
        env!("CARGO_PKG_VERSION")
    );
}
