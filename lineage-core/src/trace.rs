use crate::error::Result;
use crate::graph::{GraphBuilder, TraceLimits, TraceProgressCallback};
use crate::model::TraceOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use lineage_scanner::fetcher::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use lineage_scanner::{HttpFetcher, Identifier, MemorialPageExtractor};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// Options for configuring a trace run
pub struct TraceOptions {
    pub root: Identifier,
    pub base_url: String,
    pub timeout_secs: u64,
    pub limits: TraceLimits,
    pub show_progress_bars: bool,
    pub cancel_flag: Option<Arc<AtomicBool>>,
}

impl TraceOptions {
    pub fn new(root: Identifier) -> Self {
        Self {
            root,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            limits: TraceLimits::default(),
            show_progress_bars: false,
            cancel_flag: None,
        }
    }
}

/// Callback for reporting each record lookup as a display message
pub type TraceMessageCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Execute a trace against the live site with the given options
pub async fn execute_trace(
    options: TraceOptions,
    message_callback: Option<TraceMessageCallback>,
) -> Result<TraceOutcome> {
    let TraceOptions {
        root,
        base_url,
        timeout_secs,
        limits,
        show_progress_bars,
        cancel_flag,
    } = options;

    let fetcher = HttpFetcher::with_timeout(timeout_secs)?.with_base_url(&base_url)?;
    let extractor = MemorialPageExtractor::new()?;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Starting trace of {}...", root));
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let progress_callback: TraceProgressCallback = Arc::new(move |found: usize, id: &Identifier| {
        if let Some(ref pb) = pb_clone {
            pb.set_message(format!("Looking up {} ({} records found)", id, found));
        }
        if let Some(ref callback) = message_callback {
            callback(format!("Looking up {}", id));
        }
    });

    let mut builder = GraphBuilder::new(fetcher, extractor)
        .with_limits(limits)
        .with_progress_callback(progress_callback);
    if let Some(flag) = cancel_flag {
        builder = builder.with_cancel_flag(flag);
    }

    let result = builder.run(root).await;

    if let Some(ref pb) = progress_bar {
        match result {
            Ok(ref outcome) => {
                pb.finish_with_message(format!("Trace finished: {} records", outcome.graph.len()))
            }
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}
