use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the item tab and channel group that cover everything.
pub const ALL_LABEL: &str = "전체";

/// Fixed channel label of the sales-OR lookup.
pub const SALES_CHANNEL: &str = "OR";

/// Whether inventory is actively merchandised or cleared off-price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationGroup {
    /// Actively merchandised stock.
    Core,
    /// Clearance / off-price stock.
    Outlet,
}

impl OperationGroup {
    /// Every operation group, in output order.
    pub const ALL: [OperationGroup; 2] = [OperationGroup::Core, OperationGroup::Outlet];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationGroup::Core => "core",
            OperationGroup::Outlet => "outlet",
        }
    }
}

impl fmt::Display for OperationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket of channel codes an inventory amount is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChannelGroup {
    /// Sum over every valid channel (FRS, HQ and OR).
    #[serde(rename = "전체")]
    All,
    /// Franchise / retail stores.
    #[serde(rename = "FRS")]
    Frs,
    /// Headquarters plus outlet retail.
    #[serde(rename = "HQ_OR")]
    HqOr,
}

impl ChannelGroup {
    /// Every channel group, in output order.
    pub const ALL: [ChannelGroup; 3] = [ChannelGroup::All, ChannelGroup::Frs, ChannelGroup::HqOr];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelGroup::All => ALL_LABEL,
            ChannelGroup::Frs => "FRS",
            ChannelGroup::HqOr => "HQ_OR",
        }
    }
}

impl fmt::Display for ChannelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a monthly inventory extract.
///
/// Empty CSV cells are `None`; nothing is trimmed at this level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    /// `Channel 2` column: `FRS`, `HQ`, `OR` or something to discard.
    pub channel: Option<String>,
    /// Product brand, e.g. `MLB`.
    pub brand: Option<String>,
    /// Top-level product category.
    pub top_category: Option<String>,
    /// Product sub-category, which doubles as the item tab.
    pub sub_category: Option<String>,
    /// Operation basis code such as `INTRO` or `FOCUS`.
    pub operation_basis: Option<String>,
    /// Product season code such as `25SS`.
    pub season: Option<String>,
    /// Estimated inventory amount in base currency.
    pub amount: Option<f64>,
}

impl InventoryRow {
    /// The amount, with missing or NaN values counted as zero.
    pub fn amount_or_zero(&self) -> f64 {
        match self.amount {
            Some(v) if !v.is_nan() => v,
            _ => 0.0,
        }
    }
}

/// Composite key of the sparse inventory aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AggregationKey {
    pub brand: String,
    /// `전체` or one valid sub-category.
    pub item_tab: String,
    /// `YYYY.MM`.
    pub month: String,
    pub channel_group: ChannelGroup,
    pub operation_group: OperationGroup,
}

impl AggregationKey {
    pub fn new(
        brand: impl Into<String>,
        item_tab: impl Into<String>,
        month: impl Into<String>,
        channel_group: ChannelGroup,
        operation_group: OperationGroup,
    ) -> Self {
        Self {
            brand: brand.into(),
            item_tab: item_tab.into(),
            month: month.into(),
            channel_group,
            operation_group,
        }
    }
}

/// Key of the OR-channel sales lookup. The channel is always [`SALES_CHANNEL`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SalesOrKey {
    pub brand: String,
    pub item_tab: String,
    pub month: String,
    pub operation_group: OperationGroup,
}

impl SalesOrKey {
    pub fn new(
        brand: impl Into<String>,
        item_tab: impl Into<String>,
        month: impl Into<String>,
        operation_group: OperationGroup,
    ) -> Self {
        Self {
            brand: brand.into(),
            item_tab: item_tab.into(),
            month: month.into(),
            operation_group,
        }
    }

    /// Field holding this key's value in the sales summary, e.g. `OR_core`.
    pub fn source_field(&self) -> String {
        format!("{}_{}", SALES_CHANNEL, self.operation_group.as_str())
    }
}
