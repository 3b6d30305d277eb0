//! notestamp - relative "time ago" labels for rendered note cards
//!
//! Reads a JSON document of display elements, runs a refresh pass over the
//! ones carrying a timestamp marker and writes the updated document.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Logs: $XDG_STATE_HOME/notestamp/notestamp.log (~/.local/state/notestamp/notestamp.log)
//! - Config: $XDG_CONFIG_HOME/notestamp/config.toml (~/.config/notestamp/config.toml)

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use notestamp_core::format::{format_absolute, parse_timestamp, time_ago};
use notestamp_core::{refresh, Config, Document, RefreshOptions, RefreshReport, TooltipRegistry};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "notestamp")]
#[command(about = "Relative timestamp labels for note cards")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a refresh pass over a JSON document of elements
    Refresh {
        /// Document to read
        input: PathBuf,

        /// Where to write the updated document (default: stdout, or the input in watch mode)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reference time as RFC 3339 (default: current time)
        #[arg(long, value_parser = parse_now, conflicts_with = "watch")]
        now: Option<DateTime<Utc>>,

        /// Keep refreshing on a timer until Ctrl+C
        #[arg(short, long)]
        watch: bool,

        /// Seconds between passes (only with --watch; default from config)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,

        /// Print attached tooltips after the pass
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the label for a single timestamp
    Label {
        /// ISO-8601 timestamp
        timestamp: String,

        /// Reference time as RFC 3339 (default: current time)
        #[arg(long, value_parser = parse_now)]
        now: Option<DateTime<Utc>>,
    },
}

fn parse_now(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard = notestamp_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    let options = config
        .timestamps
        .refresh_options()
        .context("invalid timestamp configuration")?;

    match args.command {
        Command::Refresh {
            input,
            output,
            now,
            watch,
            interval,
            verbose,
        } => {
            if watch {
                let interval = interval
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| config.refresh.interval());
                let target = output.unwrap_or_else(|| input.clone());
                run_watch_mode(&input, &target, interval, &options)
            } else {
                run_single_pass(&input, output.as_deref(), now, verbose, &options)
            }
        }
        Command::Label { timestamp, now } => print_label(&timestamp, now, &options),
    }
}

fn load_document(path: &Path) -> Result<Document> {
    Document::load(path).with_context(|| format!("failed to load document {}", path.display()))
}

fn write_document(doc: &Document, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => doc
            .save(path)
            .with_context(|| format!("failed to write document {}", path.display())),
        None => {
            println!("{}", doc.to_json().context("failed to serialize document")?);
            Ok(())
        }
    }
}

fn summarize(report: &RefreshReport) -> String {
    format!(
        "relabeled {}, attached {} tooltip(s), terminalized {}, invalidated {}",
        report.relabeled, report.tooltips_attached, report.terminalized, report.invalidated
    )
}

/// Run one pass and write the result
fn run_single_pass(
    input: &Path,
    output: Option<&Path>,
    now: Option<DateTime<Utc>>,
    verbose: bool,
    options: &RefreshOptions,
) -> Result<()> {
    let mut doc = load_document(input)?;
    let mut tooltips = TooltipRegistry::new();

    let now = now.unwrap_or_else(Utc::now);
    tracing::info!(input = %input.display(), now = %now, "Running refresh pass");

    let report = refresh(&mut doc, &mut tooltips, now, options);
    write_document(&doc, output)?;

    eprintln!("{}", summarize(&report));
    if verbose {
        for tip in tooltips.tooltips() {
            eprintln!(
                "  {} [{}]: {}",
                tip.element_id,
                tip.placement.as_str(),
                tip.title
            );
        }
    }

    Ok(())
}

/// Refresh on a timer, writing the document whenever a label changes
fn run_watch_mode(
    input: &Path,
    target: &Path,
    interval: Duration,
    options: &RefreshOptions,
) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        eprintln!("\nShutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let mut doc = load_document(input)?;
    let mut tooltips = TooltipRegistry::new();

    println!(
        "Watch mode active (refresh every {}s). Press Ctrl+C to stop.",
        interval.as_secs()
    );

    let tick = Duration::from_millis(100).min(interval);
    let mut first = true;

    while running.load(Ordering::SeqCst) {
        let before = doc.clone();
        let report = refresh(&mut doc, &mut tooltips, Utc::now(), options);

        if first || doc != before {
            write_document(&doc, Some(target))?;
            let timestamp = chrono::Local::now().format("%H:%M:%S");
            println!("[{}] {}", timestamp, summarize(&report));
        }
        first = false;

        // Sleep in short ticks so Ctrl+C is handled promptly
        let mut waited = Duration::ZERO;
        while waited < interval && running.load(Ordering::SeqCst) {
            thread::sleep(tick);
            waited += tick;
        }
    }

    tracing::info!("Watch mode stopped");
    Ok(())
}

fn print_label(raw: &str, now: Option<DateTime<Utc>>, options: &RefreshOptions) -> Result<()> {
    let ts = parse_timestamp(raw, options.source_offset)
        .with_context(|| format!("invalid timestamp: {}", raw))?;
    let now = now.unwrap_or_else(Utc::now);

    match time_ago(&ts, now) {
        Some(relative) => println!("{}", relative),
        None => println!("{}", format_absolute(&ts, options.display_offset)),
    }

    Ok(())
}
