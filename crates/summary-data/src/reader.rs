//! Chunked CSV loading of the monthly inventory extracts.
//!
//! Each `<YYYY.MM>.csv` file is read row by row and handed out in chunks of
//! at most `chunk_size` [`InventoryRow`]s so that peak memory stays bounded
//! however large the extract is.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use summary_core::calendar::inventory_file_name;
use summary_core::error::{Result, SummaryError};
use summary_core::models::InventoryRow;
use tracing::debug;

// ── Column names ──────────────────────────────────────────────────────────────

pub const COL_CHANNEL: &str = "Channel 2";
pub const COL_BRAND: &str = "产品品牌";
pub const COL_TOP_CATEGORY: &str = "产品大分类";
pub const COL_SUB_CATEGORY: &str = "产品中分类";
pub const COL_OPERATION_BASIS: &str = "运营基准";
pub const COL_SEASON: &str = "产品季节";
pub const COL_AMOUNT: &str = "预计库存金额";

/// Columns every inventory extract must carry. Any other column is ignored.
pub const INVENTORY_COLUMNS: [&str; 7] = [
    COL_CHANNEL,
    COL_BRAND,
    COL_TOP_CATEGORY,
    COL_SUB_CATEGORY,
    COL_OPERATION_BASIS,
    COL_SEASON,
    COL_AMOUNT,
];

const UTF8_BOM: char = '\u{feff}';

/// Placeholder tokens the upstream exports write for a missing value.
const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(value: &str) -> bool {
    value.is_empty() || MISSING_TOKENS.contains(&value)
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Path of the extract for `month` inside `inventory_dir`.
pub fn inventory_file_path(inventory_dir: &Path, month: &str) -> PathBuf {
    inventory_dir.join(inventory_file_name(month))
}

/// Streams an inventory CSV as chunks of [`InventoryRow`]s.
///
/// Iteration stops after the first error; rows handed out before it stay
/// valid.
pub struct InventoryChunks<R: Read> {
    reader: csv::Reader<R>,
    columns: ColumnIndex,
    chunk_size: usize,
    path: PathBuf,
    record: StringRecord,
    finished: bool,
}

impl InventoryChunks<File> {
    /// Open `path` and locate the required columns in its header row.
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self> {
        let file = File::open(path).map_err(|source| SummaryError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path, chunk_size)
    }
}

impl<R: Read> InventoryChunks<R> {
    /// Wrap any reader. `path` only labels errors and log lines.
    pub fn from_reader(reader: R, path: &Path, chunk_size: usize) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|source| SummaryError::CsvParse {
                path: path.to_path_buf(),
                source,
            })?
            .clone();
        let columns = ColumnIndex::from_headers(&headers, path)?;

        Ok(Self {
            reader,
            columns,
            chunk_size: chunk_size.max(1),
            path: path.to_path_buf(),
            record: StringRecord::new(),
            finished: false,
        })
    }

    /// Read up to `chunk_size` rows. `Ok(None)` once the file is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<InventoryRow>>> {
        if self.finished {
            return Ok(None);
        }

        let mut rows = Vec::with_capacity(self.chunk_size.min(4096));
        while rows.len() < self.chunk_size {
            let more = self
                .reader
                .read_record(&mut self.record)
                .map_err(|source| SummaryError::CsvParse {
                    path: self.path.clone(),
                    source,
                });
            match more {
                Ok(true) => {}
                Ok(false) => {
                    self.finished = true;
                    break;
                }
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            }

            match self.columns.to_row(&self.record, &self.path) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            }
        }

        if rows.is_empty() {
            return Ok(None);
        }

        debug!("Read chunk of {} rows from {}", rows.len(), self.path.display());
        Ok(Some(rows))
    }
}

impl<R: Read> Iterator for InventoryChunks<R> {
    type Item = Result<Vec<InventoryRow>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Positions of the required columns in a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    channel: usize,
    brand: usize,
    top_category: usize,
    sub_category: usize,
    operation_basis: usize,
    season: usize,
    amount: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim_start_matches(UTF8_BOM) == name)
                .ok_or_else(|| SummaryError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        Ok(Self {
            channel: find(COL_CHANNEL)?,
            brand: find(COL_BRAND)?,
            top_category: find(COL_TOP_CATEGORY)?,
            sub_category: find(COL_SUB_CATEGORY)?,
            operation_basis: find(COL_OPERATION_BASIS)?,
            season: find(COL_SEASON)?,
            amount: find(COL_AMOUNT)?,
        })
    }

    fn to_row(&self, record: &StringRecord, path: &Path) -> Result<InventoryRow> {
        Ok(InventoryRow {
            channel: text_cell(record, self.channel),
            brand: text_cell(record, self.brand),
            top_category: text_cell(record, self.top_category),
            sub_category: text_cell(record, self.sub_category),
            operation_basis: text_cell(record, self.operation_basis),
            season: text_cell(record, self.season),
            amount: amount_cell(record, self.amount, path)?,
        })
    }
}

/// A text cell, `None` when absent, empty or a missing-value token.
fn text_cell(record: &StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|v| !is_missing(v))
        .map(|v| v.to_string())
}

/// A numeric cell, `None` when absent, blank or a missing-value token.
fn amount_cell(record: &StringRecord, idx: usize, path: &Path) -> Result<Option<f64>> {
    let Some(raw) = record.get(idx) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| SummaryError::InvalidAmount {
            path: path.to_path_buf(),
            line: record.position().map(|p| p.line()).unwrap_or(0),
            value: raw.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
