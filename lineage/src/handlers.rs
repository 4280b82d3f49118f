use clap::ArgMatches;
use colored::Colorize;
use lineage_core::document::{to_json_string, write_document_atomic};
use lineage_core::report::{ReportFormat, generate_pedigree_tree, generate_summary};
use lineage_core::trace::{TraceMessageCallback, TraceOptions, execute_trace};
use lineage_core::{TraceLimits, TraceStatus};
use lineage_scanner::Identifier;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};
use url::Url;

/// Turn user input into a record id.
///
/// Accepts a bare numeric id, a memorial URL or path
/// (`https://www.findagrave.com/memorial/123/jane-doe`), or a legacy
/// `...?GRid=123` link.
pub fn parse_identifier(input: &str) -> Option<Identifier> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.chars().all(|c| c.is_ascii_digit()) {
        return Some(Identifier::from(input));
    }

    if let Some(id) = Identifier::from_memorial_path(input) {
        return Some(id);
    }

    let url = Url::parse(input).ok()?;
    url.query_pairs()
        .find(|(key, _)| key.eq_ignore_ascii_case("grid"))
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()))
        .map(Identifier::from)
}

/// Expand `~` and reject empty paths
pub fn resolve_output_path(input: &str) -> Result<PathBuf, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("No output file given".to_string());
    }
    let expanded = shellexpand::tilde(input);
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Pick the report format from the `--format` value, defaulting to JSON.
pub fn resolve_report_format(value: Option<&String>) -> ReportFormat {
    value
        .and_then(|v| ReportFormat::from_str(v))
        .unwrap_or(ReportFormat::Json)
}

/// Raise the cancel flag. Returns true if it was already raised.
pub fn request_cancel(flag: &AtomicBool) -> bool {
    flag.swap(true, Ordering::Relaxed)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> io::Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_string())
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "✗".red().bold(), msg);
    std::process::exit(1);
}

pub async fn handle_trace(sub_matches: &ArgMatches, quiet: bool) {
    let raw_id = match sub_matches.get_one::<String>("id") {
        Some(id) => id.clone(),
        None => print_prompt("Please enter the initial grave id:")
            .unwrap_or_else(|e| fail(format!("Failed to read input: {}", e))),
    };
    let Some(root) = parse_identifier(&raw_id) else {
        fail(format!("'{}' is not a memorial id or URL", raw_id.trim()));
    };

    let raw_output = match sub_matches.get_one::<String>("output") {
        Some(path) => path.clone(),
        None => print_prompt("Please enter the filename to write data:")
            .unwrap_or_else(|e| fail(format!("Failed to read input: {}", e))),
    };
    let output_path = resolve_output_path(&raw_output).unwrap_or_else(|e| fail(e));

    let format = resolve_report_format(sub_matches.get_one::<String>("format"));
    let compact = sub_matches.get_flag("compact");
    let show_progress = !quiet && !sub_matches.get_flag("no-progress");

    let mut options = TraceOptions::new(root.clone());
    if let Some(base_url) = sub_matches.get_one::<String>("base-url") {
        options.base_url = base_url.clone();
    }
    if let Some(timeout) = sub_matches.get_one::<u64>("timeout") {
        options.timeout_secs = *timeout;
    }
    options.limits = TraceLimits {
        max_depth: sub_matches.get_one::<usize>("max-depth").copied(),
        max_records: sub_matches.get_one::<usize>("max-records").copied(),
    };
    options.show_progress_bars = show_progress;

    // First Ctrl-C stops the walk after the current lookup and what was found
    // is still written. A second one exits straight away.
    let cancel_flag = Arc::new(AtomicBool::new(false));
    options.cancel_flag = Some(cancel_flag.clone());
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if request_cancel(&cancel_flag) {
                eprintln!("{} Interrupted twice, exiting", "✗".red().bold());
                std::process::exit(130);
            }
            warn!("Interrupted, finishing current lookup (Ctrl-C again to quit)");
        }
    });

    if !quiet {
        println!("\n🌳 Tracing ancestors of {}", root.to_string().bright_white());
        println!("Source: {}", options.base_url);
        println!("Output: {}\n", output_path.display());
    }

    let message_callback: TraceMessageCallback = Arc::new(|msg: String| debug!("{}", msg));

    let outcome = match execute_trace(options, Some(message_callback)).await {
        Ok(outcome) => outcome,
        Err(e) => fail(format!("Trace failed: {}", e)),
    };

    let json = to_json_string(&outcome, !compact)
        .unwrap_or_else(|e| fail(format!("Failed to build document: {}", e)));
    if let Err(e) = write_document_atomic(&json, &output_path) {
        fail(format!(
            "Failed to write {}: {}",
            output_path.display(),
            e
        ));
    }

    if !quiet {
        println!();
        print!("{}", generate_summary(&outcome));
        if format == ReportFormat::Text {
            println!();
            print!("{}", generate_pedigree_tree(&outcome));
        }
        println!();
        print_divider();
    }

    if outcome.status != TraceStatus::Complete {
        println!(
            "{} Trace stopped early ({})",
            "⚠".yellow().bold(),
            outcome.status.as_str()
        );
    }
    println!(
        "{} {} records found!",
        "✓".green().bold(),
        outcome.graph.len()
    );
    println!(
        "{} Written to {}",
        "→".blue(),
        output_path.display().to_string().bright_white()
    );
}
