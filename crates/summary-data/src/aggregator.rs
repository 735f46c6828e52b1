//! Inventory aggregation over brand, item tab, month, channel group and
//! operation group.

use std::collections::{BTreeSet, HashMap};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use summary_core::classify::{
    category_tab, channel_groups, determine_operation_group, is_unexpected_category,
};
use summary_core::error::Result;
use summary_core::models::{AggregationKey, ChannelGroup, InventoryRow, ALL_LABEL};
use summary_core::settings::PipelineConfig;
use tracing::{debug, error, info, warn};

use crate::reader::{inventory_file_path, InventoryChunks};

// ── RowCounters ───────────────────────────────────────────────────────────────

/// How many rows each filtering stage saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounters {
    /// Rows read from the extracts.
    pub rows_read: u64,
    /// Rows left after the brand and top-category filters.
    pub rows_in_scope: u64,
    /// In-scope rows dropped because their channel is not FRS / HQ / OR.
    pub rows_discarded: u64,
    /// Rows whose amount was added to the aggregation.
    pub rows_aggregated: u64,
}

impl AddAssign for RowCounters {
    fn add_assign(&mut self, other: Self) {
        self.rows_read += other.rows_read;
        self.rows_in_scope += other.rows_in_scope;
        self.rows_discarded += other.rows_discarded;
        self.rows_aggregated += other.rows_aggregated;
    }
}

// ── MonthOutcome ──────────────────────────────────────────────────────────────

/// What happened to one month's extract.
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// Read to the end.
    Processed,
    /// No file for the month.
    Missing,
    /// Aborted part-way; chunks read before the error were kept.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthOutcome {
    pub month: String,
    pub path: PathBuf,
    pub status: FileStatus,
    pub counters: RowCounters,
}

// ── InventoryAggregation ──────────────────────────────────────────────────────

/// The finished aggregation: summed amounts plus the sub-categories that were
/// seen but not recognised.
#[derive(Debug, Clone, Default)]
pub struct InventoryAggregation {
    totals: HashMap<AggregationKey, f64>,
    unexpected_categories: BTreeSet<String>,
}

impl InventoryAggregation {
    /// Summed amount for `key` in base currency, `0.0` when absent.
    pub fn amount(&self, key: &AggregationKey) -> f64 {
        self.totals.get(key).copied().unwrap_or(0.0)
    }

    /// Number of distinct keys with a value.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Unrecognised sub-categories, sorted.
    pub fn unexpected_categories(&self) -> &BTreeSet<String> {
        &self.unexpected_categories
    }

    /// Sum of every `전체` channel-group cell of the `전체` item tab.
    pub fn grand_total(&self) -> f64 {
        self.totals
            .iter()
            .filter(|(k, _)| k.item_tab == ALL_LABEL && k.channel_group == ChannelGroup::All)
            .map(|(_, v)| *v)
            .sum()
    }
}

// ── InventoryAggregator ───────────────────────────────────────────────────────

/// Accumulates inventory rows into an [`InventoryAggregation`].
pub struct InventoryAggregator<'a> {
    config: &'a PipelineConfig,
    aggregation: InventoryAggregation,
    counters: RowCounters,
}

impl<'a> InventoryAggregator<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self {
            config,
            aggregation: InventoryAggregation::default(),
            counters: RowCounters::default(),
        }
    }

    /// Aggregate one chunk of rows belonging to `month`.
    ///
    /// 1. keep configured brands, then the target top category;
    /// 2. record unrecognised sub-categories;
    /// 3. classify the operation group;
    /// 4. drop rows outside the FRS / HQ / OR channels;
    /// 5. add the amount under `전체` and, for a recognised sub-category,
    ///    under its own tab, once per channel group of the row.
    pub fn add_chunk(&mut self, month: &str, rows: &[InventoryRow]) -> RowCounters {
        let mut counters = RowCounters {
            rows_read: rows.len() as u64,
            ..Default::default()
        };

        for row in rows {
            let Some(brand) = row
                .brand
                .as_deref()
                .filter(|b| self.config.valid_brands.iter().any(|v| v == b))
            else {
                continue;
            };
            if row.top_category.as_deref() != Some(self.config.target_category.as_str()) {
                continue;
            }
            counters.rows_in_scope += 1;

            let sub_category = row.sub_category.as_deref();
            if is_unexpected_category(sub_category, &self.config.valid_item_categories) {
                if let Some(cat) = sub_category {
                    self.aggregation
                        .unexpected_categories
                        .insert(cat.to_string());
                }
            }

            let operation_group = determine_operation_group(
                row.operation_basis.as_deref(),
                row.season.as_deref(),
                &self.config.core_seasons,
            );

            let Some(groups) = channel_groups(row.channel.as_deref()) else {
                counters.rows_discarded += 1;
                continue;
            };

            let amount = row.amount_or_zero();
            let specific_tab = category_tab(sub_category, &self.config.valid_item_categories);

            for item_tab in std::iter::once(ALL_LABEL).chain(specific_tab) {
                for &channel_group in groups {
                    let key = AggregationKey::new(
                        brand,
                        item_tab,
                        month,
                        channel_group,
                        operation_group,
                    );
                    *self.aggregation.totals.entry(key).or_insert(0.0) += amount;
                }
            }
            counters.rows_aggregated += 1;
        }

        self.counters += counters;
        counters
    }

    /// Stream `path` chunk by chunk into the aggregation.
    ///
    /// `counters` is updated as chunks complete, so it stays accurate when the
    /// file fails part-way.
    pub fn process_file(
        &mut self,
        month: &str,
        path: &Path,
        counters: &mut RowCounters,
    ) -> Result<()> {
        let chunks = InventoryChunks::open(path, self.config.chunk_size)?;
        for chunk in chunks {
            let rows = chunk?;
            *counters += self.add_chunk(month, &rows);
        }
        Ok(())
    }

    /// Process the extract of every analysis month found in `inventory_dir`.
    ///
    /// Missing files and per-file errors are logged and reported in the
    /// returned outcomes; they never stop the remaining months.
    pub fn process_months(&mut self, inventory_dir: &Path) -> Vec<MonthOutcome> {
        let months = self.config.analysis_months.clone();
        let mut outcomes = Vec::with_capacity(months.len());

        for month in months {
            let path = inventory_file_path(inventory_dir, &month);
            let mut counters = RowCounters::default();

            let status = if !path.exists() {
                warn!("Inventory file not found: {}", path.display());
                FileStatus::Missing
            } else {
                info!("Processing {}", path.display());
                match self.process_file(&month, &path, &mut counters) {
                    Ok(()) => {
                        debug!(
                            "{}: {} read, {} in scope, {} discarded, {} aggregated",
                            month,
                            counters.rows_read,
                            counters.rows_in_scope,
                            counters.rows_discarded,
                            counters.rows_aggregated,
                        );
                        FileStatus::Processed
                    }
                    Err(e) => {
                        error!("Failed to process {}: {}", path.display(), e);
                        FileStatus::Failed(e.to_string())
                    }
                }
            };

            outcomes.push(MonthOutcome {
                month,
                path,
                status,
                counters,
            });
        }

        outcomes
    }

    /// Totals over every chunk aggregated so far.
    pub fn counters(&self) -> RowCounters {
        self.counters
    }

    pub fn aggregation(&self) -> &InventoryAggregation {
        &self.aggregation
    }

    pub fn finish(self) -> InventoryAggregation {
        self.aggregation
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
