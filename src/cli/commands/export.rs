//! Export command implementation
//!
//! Reads newline-delimited JSON items from a file or stdin and exports them
//! in batches through one [`ItemExporter`].

use crate::adapters::database::create_item_exporter;
use crate::config::load_config;
use crate::core::export::{ExportSummary, ItemExporter};
use crate::domain::{Item, Result, SinkError};
use crate::{log_batch_progress, log_error_with_context};
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// NDJSON input file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Dry run mode - log inserts without writing to PostgreSQL
    #[arg(long)]
    pub dry_run: bool,

    /// Override rows per insert statement
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Override number of concurrent insert workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Override number of input lines per export call
    #[arg(long)]
    pub batch_size: Option<usize>,
}

/// Result of streaming one input through an exporter
#[derive(Debug, Default)]
pub struct StreamOutcome {
    /// Combined summary of every successful export call
    pub summary: ExportSummary,

    /// Export calls made
    pub batches: usize,

    /// Export calls that reported failed tasks
    pub failed_batches: usize,

    /// Lines that were not a JSON object
    pub invalid_lines: usize,

    /// First failure message, if any
    pub first_error: Option<String>,

    /// Reading stopped because of a shutdown signal
    pub interrupted: bool,
}

impl StreamOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            130
        } else if self.failed_batches > 0 || self.invalid_lines > 0 {
            1
        } else {
            0
        }
    }

    /// Lines describing failures, or `None` when the run was clean
    ///
    /// Summaries of failed export calls are discarded, so their committed
    /// chunks are not part of the printed totals.
    pub fn failure_report(&self) -> Option<Vec<String>> {
        let error = self.first_error.as_ref()?;
        let mut lines = vec![
            format!("  Failed batches: {}", self.failed_batches),
            format!("  Invalid lines: {}", self.invalid_lines),
            format!("  First error: {error}"),
        ];
        if self.failed_batches > 0 {
            lines.push(
                "  Note: rows committed by failed batches are not counted in the totals above"
                    .to_string(),
            );
        }
        Some(lines)
    }

    fn record_failure(&mut self, message: String) {
        if self.first_error.is_none() {
            self.first_error = Some(message);
        }
    }
}

/// Parse one input line; blank lines and `#` comments yield `None`
pub fn parse_line(line: &str) -> Option<Result<Item>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(Item::from_json(trimmed))
}

/// Stream NDJSON items from `reader` into `exporter`, `batch_size` lines per call
///
/// A shutdown signal stops reading; items already read are still exported.
/// Failed export calls are counted and reading continues.
///
/// # Errors
///
/// Returns an error if reading fails or the exporter can no longer accept work.
pub async fn export_stream<R>(
    exporter: &ItemExporter,
    reader: R,
    batch_size: usize,
    mut shutdown: watch::Receiver<bool>,
) -> Result<StreamOutcome>
where
    R: AsyncBufRead + Unpin,
{
    let batch_size = batch_size.max(1);
    let mut outcome = StreamOutcome::default();
    let mut lines = reader.lines();
    let mut batch: Vec<Item> = Vec::with_capacity(batch_size);
    let mut line_number = 0usize;
    let mut signal_open = true;

    loop {
        if *shutdown.borrow() {
            outcome.interrupted = true;
            break;
        }

        let line = tokio::select! {
            biased;
            changed = shutdown.changed(), if signal_open => {
                if changed.is_err() {
                    signal_open = false;
                }
                continue;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            break;
        };
        line_number += 1;

        match parse_line(&line) {
            None => continue,
            Some(Ok(item)) => batch.push(item),
            Some(Err(e)) => {
                tracing::warn!(line = line_number, error = %e, "Skipping invalid input line");
                outcome.invalid_lines += 1;
                outcome.record_failure(format!("line {line_number}: {e}"));
            }
        }

        if batch.len() >= batch_size {
            export_batch(exporter, std::mem::take(&mut batch), &mut outcome).await?;
        }
    }

    if !batch.is_empty() {
        export_batch(exporter, batch, &mut outcome).await?;
    }

    Ok(outcome)
}

async fn export_batch(
    exporter: &ItemExporter,
    batch: Vec<Item>,
    outcome: &mut StreamOutcome,
) -> Result<()> {
    outcome.batches += 1;

    match exporter.export_items(batch).await {
        Ok(summary) => {
            outcome.summary.merge(summary);
            log_batch_progress!(outcome.batches, outcome.summary.total_items);
            Ok(())
        }
        Err(e @ SinkError::ExportFailed { .. }) => {
            log_error_with_context!(&e, "Export call finished with failures");
            outcome.failed_batches += 1;
            outcome.record_failure(e.to_string());
            Ok(())
        }
        Err(e) => Err(e),
    }
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.export.chunk_size = chunk_size;
        }
        if let Some(workers) = self.workers {
            config.export.worker_count = workers;
        }
        if let Some(batch_size) = self.batch_size {
            config.export.batch_size = batch_size;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No data will be written to the database");
            println!();
        }

        let exporter = match create_item_exporter(&config).await {
            Ok(exporter) => exporter,
            Err(e @ SinkError::Configuration(_)) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create exporter");
                eprintln!("Failed to initialize export: {e}");
                return Ok(4);
            }
        };
        exporter.open().await?;

        println!("🚀 Starting export...");
        println!();

        let streamed = if self.input == "-" {
            let reader = BufReader::new(tokio::io::stdin());
            export_stream(&exporter, reader, config.export.batch_size, shutdown_signal).await
        } else {
            match tokio::fs::File::open(&self.input).await {
                Ok(file) => {
                    export_stream(
                        &exporter,
                        BufReader::new(file),
                        config.export.batch_size,
                        shutdown_signal,
                    )
                    .await
                }
                Err(e) => Err(SinkError::Io(format!(
                    "Failed to open input {}: {e}",
                    self.input
                ))),
            }
        };

        if let Err(e) = exporter.close().await {
            tracing::error!(error = %e, "Failed to shut down exporter");
            eprintln!("Failed to shut down exporter: {e}");
            return Ok(5);
        }

        let outcome = match streamed {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };

        let summary = &outcome.summary;
        summary.log_summary();

        println!();
        println!("📊 Export Summary:");
        println!("  Run ID: {}", summary.run_id);
        println!("  Items Read: {}", summary.total_items);
        println!("  Exported: {}", summary.exported_items());
        println!("  Unroutable: {}", summary.unroutable_items);
        println!("  Rows Inserted: {}", summary.rows_inserted());
        println!("  Duplicates Skipped: {}", summary.duplicates_skipped());
        println!("  Batches: {}", outcome.batches);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        for type_summary in &summary.types {
            println!(
                "    {} -> {}: {} items, {} inserted",
                type_summary.item_type,
                type_summary.table,
                type_summary.items,
                type_summary.rows_inserted
            );
        }
        println!();

        if let Some(lines) = outcome.failure_report() {
            println!("⚠️  Errors encountered:");
            for line in lines {
                println!("{line}");
            }
            println!();
        }

        let exit_code = outcome.exit_code();
        match exit_code {
            0 => println!("✅ Export completed successfully!"),
            130 => println!("⚠️  Export interrupted; items read so far were exported."),
            _ => println!("⚠️  Export completed with failures"),
        }

        Ok(exit_code)
    }
}
