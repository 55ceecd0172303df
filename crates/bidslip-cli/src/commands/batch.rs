//! Batch processing command for multiple invoice files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, warn};

use bidslip_core::invoice::{AuctionInvoiceParser, ExtractionResult, InvoiceParser};
use bidslip_core::models::invoice::Invoice;

use super::config::load_config;
use super::process::{build_parser, format_invoice, read_document_text, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers (default: batch.jobs from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Deadline for the whole batch in seconds (default: batch.timeout_secs from config)
    #[arg(long)]
    timeout: Option<u64>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Remaining-inventory JSON used to enrich line items
    #[arg(long)]
    inventory: Option<PathBuf>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    invoice: Option<Invoice>,
    diagnostics: usize,
    error: Option<String>,
    processing_time_ms: u64,
}

impl ProcessResult {
    fn failed(path: PathBuf, error: String, processing_time_ms: u64) -> Self {
        Self {
            path,
            invoice: None,
            diagnostics: 0,
            error: Some(error),
            processing_time_ms,
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);
    let timeout = Duration::from_secs(args.timeout.unwrap_or(config.batch.timeout_secs));

    println!(
        "{} Found {} files to process ({} workers)",
        style("ℹ").blue(),
        files.len(),
        jobs
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(build_parser(&config, args.inventory.as_deref())?);
    let semaphore = Arc::new(Semaphore::new(jobs));

    // Each file runs in its own worker; the join set only holds thin
    // wrappers, so a worker that panics is still tied to its file.
    let mut tasks = JoinSet::new();
    for (index, path) in files.iter().enumerate() {
        let path = path.clone();
        let parser = Arc::clone(&parser);
        let semaphore = Arc::clone(&semaphore);

        let worker = tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (Err(anyhow::anyhow!("batch cancelled before start")), 0);
            };
            let file_start = Instant::now();
            let outcome = tokio::task::spawn_blocking(move || process_single_file(&path, &parser))
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("worker failed: {}", e)));
            (outcome, file_start.elapsed().as_millis() as u64)
        });

        tasks.spawn(async move { (index, worker.await) });
    }

    let mut slots: Vec<Option<ProcessResult>> = files.iter().map(|_| None).collect();
    let deadline = tokio::time::Instant::now() + timeout;
    let mut timed_out = false;

    loop {
        let joined = tokio::time::timeout_at(deadline, tasks.join_next()).await;
        let next = match joined {
            Ok(Some(next)) => next,
            Ok(None) => break,
            Err(_) => {
                warn!("Batch deadline of {:?} reached with {} files unfinished", timeout, tasks.len());
                timed_out = true;
                semaphore.close();
                tasks.abort_all();
                break;
            }
        };

        let (index, joined) = match next {
            Ok(next) => next,
            Err(e) => {
                error!("Batch task failed: {}", e);
                continue;
            }
        };
        let path = files[index].clone();
        let (outcome, processing_time_ms) = worker_outcome(joined);

        let result = match outcome {
            Ok(extraction) => ProcessResult {
                path,
                diagnostics: extraction.diagnostics.len(),
                invoice: Some(extraction.invoice),
                error: None,
                processing_time_ms,
            },
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    semaphore.close();
                    tasks.abort_all();
                    overall_pb.abandon();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                ProcessResult::failed(path, error_msg, processing_time_ms)
            }
        };

        slots[index] = Some(result);
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let results: Vec<ProcessResult> = slots
        .into_iter()
        .zip(&files)
        .map(|(slot, path)| slot.unwrap_or_else(|| unfinished(path.clone(), timed_out, timeout)))
        .collect();

    let successful: Vec<_> = results.iter().filter(|r| r.invoice.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(invoice) = &result.invoice {
                write_output(output_dir, &result.path, invoice, args.format)?;
            }
        }
    }

    if args.summary {
        let summary_path = args.output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    let needs_review = successful.iter().filter(|r| r.diagnostics > 0).count();
    if needs_review > 0 {
        println!(
            "   {} need manual review",
            style(needs_review).yellow()
        );
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }

        if !args.continue_on_error {
            anyhow::bail!("{} of {} files failed", failed.len(), results.len());
        }
    }

    Ok(())
}

/// What a worker reports: the extraction outcome and its wall time in ms.
type WorkerOutput = (anyhow::Result<ExtractionResult>, u64);

/// Flatten a joined worker; a panicked or cancelled worker becomes its file's error.
fn worker_outcome(joined: Result<WorkerOutput, JoinError>) -> WorkerOutput {
    joined.unwrap_or_else(|e| (Err(anyhow::anyhow!("worker task failed: {}", e)), 0))
}

/// Result for a file that never reported back.
fn unfinished(path: PathBuf, timed_out: bool, timeout: Duration) -> ProcessResult {
    let error = if timed_out {
        format!("timed out after {}s", timeout.as_secs())
    } else {
        "worker task ended without a result".to_string()
    };
    ProcessResult::failed(path, error, 0)
}

fn process_single_file(path: &Path, parser: &AuctionInvoiceParser) -> anyhow::Result<ExtractionResult> {
    let text = read_document_text(path)?;
    Ok(parser.parse(&text)?)
}

fn write_output(
    output_dir: &Path,
    source: &Path,
    invoice: &Invoice,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let output_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");

    let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));
    fs::write(&output_path, format_invoice(invoice, format)?)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "invoice_number",
        "auction_lot",
        "buyer_email",
        "invoice_total",
        "items",
        "diagnostics",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let record = match &result.invoice {
            Some(invoice) => [
                filename,
                "success".to_string(),
                invoice.invoice_number.clone(),
                invoice.auction_lot.to_string(),
                invoice.buyer_email.clone(),
                invoice.invoice_total.to_string(),
                invoice.items.len().to_string(),
                result.diagnostics.to_string(),
                result.processing_time_ms.to_string(),
                String::new(),
            ],
            None => [
                filename,
                "error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                result.processing_time_ms.to_string(),
                result.error.clone().unwrap_or_default(),
            ],
        };

        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
