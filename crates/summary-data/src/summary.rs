//! The summary document consumed by the reporting front end.
//!
//! Shape: `brands → brand → item tab → month → MonthCell`, plus the sorted
//! unexpected sub-categories, the analysis months and the day count of each
//! month. Every cell exists, zero-filled when nothing was aggregated for it.

use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use summary_core::calendar::days_in_month_label;
use summary_core::error::{Result, SummaryError};
use summary_core::models::{AggregationKey, ChannelGroup, OperationGroup, SalesOrKey};
use summary_core::settings::PipelineConfig;
use summary_core::units::base_to_rounded_millions;

use crate::aggregator::InventoryAggregation;
use crate::sales::SalesOrTable;

// ── OrderedMap ────────────────────────────────────────────────────────────────

/// A string-keyed map that serializes as a JSON object in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.0.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ── MonthCell ─────────────────────────────────────────────────────────────────

/// Figures of one brand × item tab × month.
///
/// Inventory fields are whole millions; OR sales stay in base currency and
/// are written as a plain `0` when the sales summary has no value.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct MonthCell {
    #[serde(rename = "전체_core")]
    pub all_core: i64,
    #[serde(rename = "전체_outlet")]
    pub all_outlet: i64,
    #[serde(rename = "FRS_core")]
    pub frs_core: i64,
    #[serde(rename = "FRS_outlet")]
    pub frs_outlet: i64,
    #[serde(rename = "HQ_OR_core")]
    pub hq_or_core: i64,
    #[serde(rename = "HQ_OR_outlet")]
    pub hq_or_outlet: i64,
    #[serde(rename = "OR_sales_core", serialize_with = "sales_or_zero")]
    pub or_sales_core: Option<f64>,
    #[serde(rename = "OR_sales_outlet", serialize_with = "sales_or_zero")]
    pub or_sales_outlet: Option<f64>,
}

fn sales_or_zero<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(amount) => serializer.serialize_f64(*amount),
        None => serializer.serialize_i64(0),
    }
}

impl MonthCell {
    /// Inventory figure of a channel group and operation group, in millions.
    pub fn inventory(&self, channel: ChannelGroup, group: OperationGroup) -> i64 {
        match (channel, group) {
            (ChannelGroup::All, OperationGroup::Core) => self.all_core,
            (ChannelGroup::All, OperationGroup::Outlet) => self.all_outlet,
            (ChannelGroup::Frs, OperationGroup::Core) => self.frs_core,
            (ChannelGroup::Frs, OperationGroup::Outlet) => self.frs_outlet,
            (ChannelGroup::HqOr, OperationGroup::Core) => self.hq_or_core,
            (ChannelGroup::HqOr, OperationGroup::Outlet) => self.hq_or_outlet,
        }
    }

    fn inventory_mut(&mut self, channel: ChannelGroup, group: OperationGroup) -> &mut i64 {
        match (channel, group) {
            (ChannelGroup::All, OperationGroup::Core) => &mut self.all_core,
            (ChannelGroup::All, OperationGroup::Outlet) => &mut self.all_outlet,
            (ChannelGroup::Frs, OperationGroup::Core) => &mut self.frs_core,
            (ChannelGroup::Frs, OperationGroup::Outlet) => &mut self.frs_outlet,
            (ChannelGroup::HqOr, OperationGroup::Core) => &mut self.hq_or_core,
            (ChannelGroup::HqOr, OperationGroup::Outlet) => &mut self.hq_or_outlet,
        }
    }

    /// OR sales of an operation group, in base currency.
    pub fn or_sales(&self, group: OperationGroup) -> f64 {
        match group {
            OperationGroup::Core => self.or_sales_core,
            OperationGroup::Outlet => self.or_sales_outlet,
        }
        .unwrap_or(0.0)
    }

    fn or_sales_mut(&mut self, group: OperationGroup) -> &mut Option<f64> {
        match group {
            OperationGroup::Core => &mut self.or_sales_core,
            OperationGroup::Outlet => &mut self.or_sales_outlet,
        }
    }
}

// ── InventorySummary ──────────────────────────────────────────────────────────

pub type MonthCells = OrderedMap<MonthCell>;
pub type ItemTabCells = OrderedMap<MonthCells>;

/// The complete output document.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub brands: OrderedMap<ItemTabCells>,
    pub unexpected_categories: Vec<String>,
    pub months: Vec<String>,
    pub days_in_month: OrderedMap<u32>,
}

impl InventorySummary {
    /// The cell of `brand` / `item_tab` / `month`, if that combination is
    /// part of the configured dimensions.
    pub fn cell(&self, brand: &str, item_tab: &str, month: &str) -> Option<&MonthCell> {
        self.brands.get(brand)?.get(item_tab)?.get(month)
    }
}

/// Merge the inventory aggregation and OR sales into the full document.
pub fn build_summary(
    inventory: &InventoryAggregation,
    sales: &SalesOrTable,
    config: &PipelineConfig,
) -> Result<InventorySummary> {
    let mut days_in_month = OrderedMap::new();
    for month in &config.analysis_months {
        days_in_month.insert(month.as_str(), days_in_month_label(month)?);
    }

    let item_tabs = config.item_tabs();
    let mut brands = OrderedMap::new();

    for brand in &config.valid_brands {
        let mut tabs = OrderedMap::new();
        for item_tab in &item_tabs {
            let mut months = OrderedMap::new();
            for month in &config.analysis_months {
                months.insert(
                    month.as_str(),
                    build_cell(inventory, sales, brand, item_tab, month),
                );
            }
            tabs.insert(item_tab.as_str(), months);
        }
        brands.insert(brand.as_str(), tabs);
    }

    Ok(InventorySummary {
        brands,
        unexpected_categories: inventory.unexpected_categories().iter().cloned().collect(),
        months: config.analysis_months.clone(),
        days_in_month,
    })
}

fn build_cell(
    inventory: &InventoryAggregation,
    sales: &SalesOrTable,
    brand: &str,
    item_tab: &str,
    month: &str,
) -> MonthCell {
    let mut cell = MonthCell::default();
    for group in OperationGroup::ALL {
        for channel in ChannelGroup::ALL {
            let key = AggregationKey::new(brand, item_tab, month, channel, group);
            *cell.inventory_mut(channel, group) = base_to_rounded_millions(inventory.amount(&key));
        }
        *cell.or_sales_mut(group) = sales.get(&SalesOrKey::new(brand, item_tab, month, group));
    }
    cell
}

/// Write `summary` as two-space indented UTF-8 JSON, non-ASCII kept verbatim.
///
/// Parent directories are created as needed; the file is replaced through a
/// temporary sibling so readers never see a half-written document.
pub fn write_summary(summary: &InventorySummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SummaryError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(summary)?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|source| SummaryError::FileWrite {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| SummaryError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::InventoryAggregator;
    use summary_core::models::{InventoryRow, ALL_LABEL};
    use tempfile::TempDir;

    fn config() -> PipelineConfig {
        PipelineConfig {
            analysis_months: vec!["2024.01".to_string(), "2024.02".to_string()],
            ..Default::default()
        }
    }

    fn shoes_row(channel: &str, basis: &str, amount: f64) -> InventoryRow {
        InventoryRow {
            channel: Some(channel.to_string()),
            brand: Some("MLB".to_string()),
            top_category: Some("饰品".to_string()),
            sub_category: Some("Shoes".to_string()),
            operation_basis: Some(basis.to_string()),
            season: None,
            amount: Some(amount),
        }
    }

    // ── build_summary ─────────────────────────────────────────────────────────

    #[test]
    fn test_every_cell_exists_and_defaults_to_zero() {
        let config = config();
        let summary =
            build_summary(&InventoryAggregation::default(), &SalesOrTable::default(), &config)
                .unwrap();

        assert_eq!(summary.brands.len(), 3);
        for brand in &config.valid_brands {
            for tab in config.item_tabs() {
                for month in &config.analysis_months {
                    let cell = summary.cell(brand, &tab, month).expect("cell exists");
                    assert_eq!(cell, &MonthCell::default());
                }
            }
        }
    }

    #[test]
    fn test_single_frs_intro_row_scenario() {
        let config = config();
        let mut agg = InventoryAggregator::new(&config);
        agg.add_chunk("2024.01", &[shoes_row("FRS", "INTRO", 1_500_000.0)]);
        let summary = build_summary(&agg.finish(), &SalesOrTable::default(), &config).unwrap();

        for tab in [ALL_LABEL, "Shoes"] {
            let cell = summary.cell("MLB", tab, "2024.01").unwrap();
            assert_eq!(cell.all_core, 2);
            assert_eq!(cell.frs_core, 2);
            assert_eq!(cell.all_outlet, 0);
            assert_eq!(cell.frs_outlet, 0);
            assert_eq!(cell.hq_or_core, 0);
            assert_eq!(cell.hq_or_outlet, 0);
        }
        assert_eq!(
            summary.cell("MLB", "Bag", "2024.01").unwrap(),
            &MonthCell::default()
        );
        assert_eq!(
            summary.cell("MLB", "Shoes", "2024.02").unwrap(),
            &MonthCell::default()
        );
    }

    #[test]
    fn test_inventory_rounded_to_millions_sales_kept_in_base() {
        let config = config();
        let mut agg = InventoryAggregator::new(&config);
        agg.add_chunk(
            "2024.02",
            &[
                shoes_row("HQ", "FOCUS", 2_400_000.0),
                shoes_row("OR", "FOCUS", 1_100_000.0),
            ],
        );
        let mut sales = SalesOrTable::default();
        sales.insert(
            SalesOrKey::new("MLB", "Shoes", "2024.02", OperationGroup::Core),
            3_250_000.0,
        );

        let summary = build_summary(&agg.finish(), &sales, &config).unwrap();
        let cell = summary.cell("MLB", "Shoes", "2024.02").unwrap();

        assert_eq!(cell.inventory(ChannelGroup::HqOr, OperationGroup::Core), 4);
        assert_eq!(cell.inventory(ChannelGroup::All, OperationGroup::Core), 4);
        assert_eq!(cell.or_sales(OperationGroup::Core), 3_250_000.0);
        assert_eq!(cell.or_sales(OperationGroup::Outlet), 0.0);
    }

    #[test]
    fn test_days_in_month_and_months() {
        let summary =
            build_summary(&InventoryAggregation::default(), &SalesOrTable::default(), &config())
                .unwrap();
        assert_eq!(summary.months, vec!["2024.01", "2024.02"]);
        assert_eq!(summary.days_in_month.get("2024.01"), Some(&31));
        assert_eq!(summary.days_in_month.get("2024.02"), Some(&29));
    }

    // ── serialization ─────────────────────────────────────────────────────────

    #[test]
    fn test_serialized_shape_and_order() {
        let config = PipelineConfig {
            analysis_months: vec!["2024.01".to_string()],
            ..Default::default()
        };
        let summary =
            build_summary(&InventoryAggregation::default(), &SalesOrTable::default(), &config)
                .unwrap();
        let json = serde_json::to_string_pretty(&summary).unwrap();

        let top: Vec<usize> = [
            "\"brands\"",
            "\"unexpectedCategories\"",
            "\"months\"",
            "\"daysInMonth\"",
        ]
        .iter()
        .map(|k| json.find(k).expect("top-level key"))
        .collect();
        assert!(top.windows(2).all(|w| w[0] < w[1]));

        let brands: Vec<usize> = ["\"MLB\"", "\"MLB KIDS\"", "\"DISCOVERY\""]
            .iter()
            .map(|k| json.find(k).unwrap())
            .collect();
        assert!(brands.windows(2).all(|w| w[0] < w[1]));

        // Non-ASCII stays verbatim and indentation is two spaces.
        assert!(json.contains("\"전체_core\": 0"));
        assert!(json.contains("\"OR_sales_core\": 0,"));
        assert!(json.contains("\"OR_sales_outlet\": 0\n"));
        assert!(json.contains("\n  \"brands\": {"));
        assert!(!json.contains("\\u"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let cell = &value["brands"]["DISCOVERY"]["Acc_etc"]["2024.01"];
        assert_eq!(cell.as_object().unwrap().len(), 8);
        assert_eq!(value["daysInMonth"]["2024.01"], 31);
        assert_eq!(value["unexpectedCategories"], serde_json::json!([]));
    }

    #[test]
    fn test_unexpected_categories_sorted() {
        let config = config();
        let mut agg = InventoryAggregator::new(&config);
        let mut rows = Vec::new();
        for cat in ["Socks", "Belts", "Gloves"] {
            let mut r = shoes_row("FRS", "INTRO", 1.0);
            r.sub_category = Some(cat.to_string());
            rows.push(r);
        }
        agg.add_chunk("2024.01", &rows);
        let summary = build_summary(&agg.finish(), &SalesOrTable::default(), &config).unwrap();
        assert_eq!(summary.unexpected_categories, vec!["Belts", "Gloves", "Socks"]);
    }

    // ── write_summary ─────────────────────────────────────────────────────────

    #[test]
    fn test_write_summary_creates_dirs_and_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("public").join("data").join("summary.json");
        let summary =
            build_summary(&InventoryAggregation::default(), &SalesOrTable::default(), &config())
                .unwrap();

        write_summary(&summary, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["months"], serde_json::json!(["2024.01", "2024.02"]));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
