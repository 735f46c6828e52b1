//! Top-level run of the summary job.
//!
//! Loads the OR sales, aggregates every month's inventory extract, builds the
//! summary document and writes it, returning a [`RunReport`].

use std::path::PathBuf;

use summary_core::error::Result;
use summary_core::formatting::{format_count, format_millions};
use summary_core::settings::{JobPaths, PipelineConfig};
use tracing::{info, warn};

use crate::aggregator::{FileStatus, InventoryAggregator, MonthOutcome, RowCounters};
use crate::sales::load_sales_or;
use crate::summary::{build_summary, write_summary};

// ── Public types ──────────────────────────────────────────────────────────────

/// What a run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Where the summary was written.
    pub output_path: PathBuf,
    /// Number of OR sales keys loaded.
    pub sales_keys: usize,
    /// Number of distinct inventory aggregation keys.
    pub aggregation_keys: usize,
    /// Unrecognised sub-categories, sorted.
    pub unexpected_categories: Vec<String>,
    /// One outcome per analysis month, in order.
    pub months: Vec<MonthOutcome>,
    /// Row counters over every file.
    pub counters: RowCounters,
}

impl RunReport {
    pub fn files_processed(&self) -> usize {
        self.count_status(|s| matches!(s, FileStatus::Processed))
    }

    pub fn files_missing(&self) -> usize {
        self.count_status(|s| matches!(s, FileStatus::Missing))
    }

    pub fn files_failed(&self) -> usize {
        self.count_status(|s| matches!(s, FileStatus::Failed(_)))
    }

    fn count_status(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.months.iter().filter(|m| pred(&m.status)).count()
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full job.
///
/// Missing or broken inputs are logged and skipped; only a failure to write
/// the output is returned as an error.
pub fn run_pipeline(config: &PipelineConfig, paths: &JobPaths) -> Result<RunReport> {
    // ── Step 1: OR sales ──────────────────────────────────────────────────────
    info!("Loading OR sales from {}", paths.sales_json.display());
    let sales = load_sales_or(&paths.sales_json, config);
    info!("OR sales keys: {}", format_count(sales.len()));

    // ── Step 2: Inventory ─────────────────────────────────────────────────────
    info!(
        "Aggregating inventory for {} months from {}",
        config.analysis_months.len(),
        paths.inventory_dir.display()
    );
    let mut aggregator = InventoryAggregator::new(config);
    let months = aggregator.process_months(&paths.inventory_dir);
    let counters = aggregator.counters();
    let inventory = aggregator.finish();

    let unexpected: Vec<String> = inventory.unexpected_categories().iter().cloned().collect();
    if !unexpected.is_empty() {
        warn!("Unexpected sub-categories: {:?}", unexpected);
    }

    // ── Step 3: Summary ───────────────────────────────────────────────────────
    let summary = build_summary(&inventory, &sales, config)?;
    let output_path = paths.output_path();
    write_summary(&summary, &output_path)?;

    info!("Saved {}", output_path.display());
    info!(
        "Inventory keys: {} | rows read: {} | aggregated: {} | total: {}",
        format_count(inventory.len()),
        format_count(counters.rows_read as usize),
        format_count(counters.rows_aggregated as usize),
        format_millions(inventory.grand_total()),
    );

    Ok(RunReport {
        output_path,
        sales_keys: sales.len(),
        aggregation_keys: inventory.len(),
        unexpected_categories: unexpected,
        months,
        counters,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
