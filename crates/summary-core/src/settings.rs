use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::calendar::{is_valid_month_label, month_range};
use crate::error::{Result, SummaryError};
use crate::models::ALL_LABEL;

/// Months covered by the default analysis window.
pub const DEFAULT_ANALYSIS_MONTHS: [&str; 22] = [
    "2024.01", "2024.02", "2024.03", "2024.04", "2024.05", "2024.06", "2024.07", "2024.08",
    "2024.09", "2024.10", "2024.11", "2024.12", "2025.01", "2025.02", "2025.03", "2025.04",
    "2025.05", "2025.06", "2025.07", "2025.08", "2025.09", "2025.10",
];

/// Brands kept by default, in output order.
pub const DEFAULT_BRANDS: [&str; 3] = ["MLB", "MLB KIDS", "DISCOVERY"];

/// Top-level category of accessories in the inventory extracts.
pub const DEFAULT_TARGET_CATEGORY: &str = "饰品";

/// Sub-categories that get their own item tab, in output order.
pub const DEFAULT_ITEM_CATEGORIES: [&str; 4] = ["Shoes", "Headwear", "Bag", "Acc_etc"];

/// Season tags that mark core stock when no operation basis is set.
pub const DEFAULT_CORE_SEASONS: [&str; 4] = ["24FW", "25SS", "25FW", "26SS"];

/// Rows materialised per CSV chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 200_000;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Build the accessory inventory summary consumed by the reporting front end
#[derive(Parser, Debug, Clone)]
#[command(
    name = "inventory-summary",
    about = "Build the accessory inventory summary consumed by the reporting front end",
    version
)]
pub struct Settings {
    /// Directory holding the monthly `<YYYY.MM>.csv` inventory extracts
    #[arg(long, default_value = "data/inventory")]
    pub inventory_dir: PathBuf,

    /// Sales summary JSON providing OR-channel sales
    #[arg(long, default_value = "public/data/accessory_sales_summary.json")]
    pub sales_json: PathBuf,

    /// Directory the summary JSON is written to
    #[arg(long, default_value = "public/data")]
    pub output_dir: PathBuf,

    /// File name of the summary JSON
    #[arg(long, default_value = "accessory_inventory_summary.json")]
    pub output_file: String,

    /// JSON file overriding the analysis dimensions
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Rows per CSV chunk (overrides the config file)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: Option<u64>,

    /// First month of the analysis window (YYYY.MM)
    #[arg(long, requires = "to_month")]
    pub from_month: Option<String>,

    /// Last month of the analysis window (YYYY.MM)
    #[arg(long, requires = "from_month")]
    pub to_month: Option<String>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// Input and output locations of the run.
    pub fn paths(&self) -> JobPaths {
        JobPaths {
            inventory_dir: self.inventory_dir.clone(),
            sales_json: self.sales_json.clone(),
            output_dir: self.output_dir.clone(),
            output_file: self.output_file.clone(),
        }
    }

    /// Resolve the analysis dimensions: the `--config` file (or defaults),
    /// then CLI overrides, then validation.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load_from(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(size) = self.chunk_size {
            config.chunk_size = usize::try_from(size)
                .map_err(|_| SummaryError::Config(format!("chunk size {} is too large", size)))?;
        }

        if let (Some(from), Some(to)) = (&self.from_month, &self.to_month) {
            config.analysis_months = month_range(from, to)?;
        }

        config.validate()?;
        Ok(config)
    }
}

// ── JobPaths ───────────────────────────────────────────────────────────────────

/// Where the job reads its inputs and writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    pub inventory_dir: PathBuf,
    pub sales_json: PathBuf,
    pub output_dir: PathBuf,
    pub output_file: String,
}

impl JobPaths {
    /// Full path of the summary JSON.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}

// ── PipelineConfig ─────────────────────────────────────────────────────────────

/// Analysis dimensions. Every field may be omitted from the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// `YYYY.MM` labels, in output order.
    pub analysis_months: Vec<String>,
    /// Brands kept, in output order.
    pub valid_brands: Vec<String>,
    /// Top-level category rows must belong to.
    pub target_category: String,
    /// Sub-categories with their own item tab, in output order.
    pub valid_item_categories: Vec<String>,
    /// Season tags that mark core stock.
    pub core_seasons: Vec<String>,
    /// Rows materialised per CSV chunk.
    pub chunk_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            analysis_months: owned(&DEFAULT_ANALYSIS_MONTHS),
            valid_brands: owned(&DEFAULT_BRANDS),
            target_category: DEFAULT_TARGET_CATEGORY.to_string(),
            valid_item_categories: owned(&DEFAULT_ITEM_CATEGORIES),
            core_seasons: owned(&DEFAULT_CORE_SEASONS),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Load a config file. Unlike the optional inputs of the job, an
    /// explicitly requested config file must exist and parse.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SummaryError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded pipeline config from {}", path.display());
        Ok(serde_json::from_str(&content)?)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self
            .analysis_months
            .iter()
            .find(|m| !is_valid_month_label(m))
        {
            return Err(SummaryError::InvalidMonth(bad.clone()));
        }
        if self.analysis_months.is_empty() {
            return Err(SummaryError::Config(
                "analysis_months must not be empty".to_string(),
            ));
        }
        if self.valid_brands.is_empty() {
            return Err(SummaryError::Config(
                "valid_brands must not be empty".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(SummaryError::Config(
                "chunk_size must be at least 1".to_string(),
            ));
        }

        for (name, values) in [
            ("analysis_months", &self.analysis_months),
            ("valid_brands", &self.valid_brands),
            ("valid_item_categories", &self.valid_item_categories),
        ] {
            if let Some(dup) = first_duplicate(values) {
                return Err(SummaryError::Config(format!(
                    "{} lists '{}' more than once",
                    name, dup
                )));
            }
        }
        if self.valid_item_categories.iter().any(|c| c == ALL_LABEL) {
            return Err(SummaryError::Config(format!(
                "valid_item_categories must not contain '{}'",
                ALL_LABEL
            )));
        }
        Ok(())
    }

    /// `전체` followed by every valid item category.
    pub fn item_tabs(&self) -> Vec<String> {
        std::iter::once(ALL_LABEL.to_string())
            .chain(self.valid_item_categories.iter().cloned())
            .collect()
    }
}

fn first_duplicate(values: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    values
        .iter()
        .find(|v| !seen.insert(v.as_str()))
        .map(String::as_str)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
