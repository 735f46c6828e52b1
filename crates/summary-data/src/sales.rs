//! OR-channel sales lookup built from the pre-aggregated sales summary.
//!
//! The sales summary stores amounts in millions under
//! `brands → brand → item tab → month → {"OR_core", "OR_outlet", ...}`.
//! Only the OR fields are used, scaled back to base currency.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use summary_core::error::{Result, SummaryError};
use summary_core::models::{OperationGroup, SalesOrKey};
use summary_core::settings::PipelineConfig;
use summary_core::units::millions_to_base;
use tracing::{debug, warn};

/// OR sales per (brand, item tab, month, operation group), in base currency.
#[derive(Debug, Clone, Default)]
pub struct SalesOrTable {
    values: HashMap<SalesOrKey, f64>,
}

impl SalesOrTable {
    /// Stored amount for `key`, `None` when the sales summary had no entry.
    pub fn get(&self, key: &SalesOrKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn insert(&mut self, key: SalesOrKey, amount: f64) {
        self.values.insert(key, amount);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Load the OR sales table from `path`.
///
/// Never fails: a missing, unreadable or malformed file is logged and yields
/// an empty table, so every `OR_sales_*` output field becomes 0.
pub fn load_sales_or(path: &Path, config: &PipelineConfig) -> SalesOrTable {
    if !path.exists() {
        warn!("Sales summary not found: {}", path.display());
        return SalesOrTable::default();
    }

    match try_load_sales_or(path, config) {
        Ok(table) => {
            debug!("Loaded {} OR sales keys from {}", table.len(), path.display());
            table
        }
        Err(e) => {
            warn!("Ignoring sales summary {}: {}", path.display(), e);
            SalesOrTable::default()
        }
    }
}

/// Read and parse `path`, propagating I/O and JSON errors.
pub fn try_load_sales_or(path: &Path, config: &PipelineConfig) -> Result<SalesOrTable> {
    let content = std::fs::read_to_string(path).map_err(|source| SummaryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&content)?;
    Ok(extract_sales_or(&document, config))
}

/// Pull the OR sales values out of a parsed sales summary.
///
/// Only configured brands, item tabs and analysis months are visited. A month
/// present in the document gets both operation groups; a missing or
/// non-numeric `OR_<group>` field counts as 0.
pub fn extract_sales_or(document: &Value, config: &PipelineConfig) -> SalesOrTable {
    let mut table = SalesOrTable::default();

    let Some(brands) = document.get("brands") else {
        return table;
    };

    for brand in &config.valid_brands {
        let Some(brand_data) = brands.get(brand) else {
            continue;
        };
        for item_tab in config.item_tabs() {
            let Some(tab_data) = brand_data.get(&item_tab) else {
                continue;
            };
            for month in &config.analysis_months {
                let Some(month_data) = tab_data.get(month) else {
                    continue;
                };
                for group in OperationGroup::ALL {
                    let key =
                        SalesOrKey::new(brand.as_str(), item_tab.as_str(), month.as_str(), group);
                    let amount_millions = month_data
                        .get(key.source_field())
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0);
                    table.insert(key, millions_to_base(amount_millions));
                }
            }
        }
    }

    table
}

// ── Tests ─────────────────────────────────────────────────────────────────────
