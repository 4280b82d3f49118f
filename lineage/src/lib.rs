// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{parse_identifier, request_cancel, resolve_output_path, resolve_report_format};

// Re-export trace functionality from lineage-core
pub use lineage_core::trace::{TraceMessageCallback, TraceOptions, execute_trace};
