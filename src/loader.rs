use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{NaiveDate, NaiveTime};
use log::{debug, info, warn};
use sha2::{Digest, Sha256};

use crate::error::{DashError, Result};
use crate::models::{Branch, CustomerType, PaymentMethod, ProductLine, Transaction};
use crate::table::{SourceInfo, Table};

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Finite amounts only; `NaN` and `inf` spellings are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    let value = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => -inner.trim().parse::<f64>().ok()?,
        None => s.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Month-first `M/D/YYYY`.
pub fn parse_date_mdy(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.trim().split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let m: u32 = parts[0].parse().ok()?;
    let d: u32 = parts[1].parse().ok()?;
    let y: i32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

pub fn parse_time_hm(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

const TAX_ALIASES: &[&str] = &["Tax 5%", "Tax amount", "Tax"];

struct Columns {
    invoice_id: Option<usize>,
    branch: usize,
    city: Option<usize>,
    customer_type: usize,
    gender: Option<usize>,
    product_line: usize,
    unit_price: usize,
    quantity: usize,
    tax: usize,
    total: usize,
    date: usize,
    time: usize,
    payment: usize,
    cogs: usize,
    gross_margin_pct: usize,
    gross_income: usize,
    rating: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, path: &str) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| DashError::data_load(path, format!("missing column: {name}")))
        };
        let tax = TAX_ALIASES
            .iter()
            .find_map(|name| find(*name))
            .ok_or_else(|| DashError::data_load(path, "missing column: Tax amount"))?;

        Ok(Self {
            invoice_id: find("Invoice ID"),
            branch: require("Branch")?,
            city: find("City"),
            customer_type: require("Customer type")?,
            gender: find("Gender"),
            product_line: require("Product line")?,
            unit_price: require("Unit price")?,
            quantity: require("Quantity")?,
            tax,
            total: require("Total")?,
            date: require("Date")?,
            time: require("Time")?,
            payment: require("Payment")?,
            cogs: require("cogs")?,
            gross_margin_pct: require("gross margin percentage")?,
            gross_income: require("gross income")?,
            rating: require("Rating")?,
        })
    }
}

/// Per-record parsing context, so every failure names its column and row.
struct RowReader<'a> {
    record: &'a csv::StringRecord,
    path: &'a str,
    row: usize,
}

impl RowReader<'_> {
    fn raw(&self, idx: usize) -> &str {
        self.record.get(idx).unwrap_or("").trim()
    }

    fn optional(&self, idx: Option<usize>) -> Option<String> {
        idx.map(|i| self.raw(i).to_string()).filter(|s| !s.is_empty())
    }

    fn field<T>(&self, idx: usize, column: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
        let raw = self.raw(idx);
        parse(raw).ok_or_else(|| {
            DashError::data_load(
                self.path,
                format!("row {}: invalid {column} value {raw:?}", self.row),
            )
        })
    }
}

fn parse_record(cols: &Columns, reader: &RowReader) -> Result<Transaction> {
    Ok(Transaction {
        invoice_id: reader.optional(cols.invoice_id),
        branch: reader.field(cols.branch, "Branch", Branch::parse)?,
        city: reader.optional(cols.city),
        customer_type: reader.field(cols.customer_type, "Customer type", CustomerType::parse)?,
        gender: reader.optional(cols.gender),
        product_line: reader.field(cols.product_line, "Product line", ProductLine::parse)?,
        unit_price: reader.field(cols.unit_price, "Unit price", parse_amount)?,
        quantity: reader.field(cols.quantity, "Quantity", |s| s.parse::<u32>().ok())?,
        tax: reader.field(cols.tax, "Tax amount", parse_amount)?,
        total: reader.field(cols.total, "Total", parse_amount)?,
        date: reader.field(cols.date, "Date", parse_date_mdy)?,
        time: reader.field(cols.time, "Time", parse_time_hm)?,
        payment: reader.field(cols.payment, "Payment", PaymentMethod::parse)?,
        cogs: reader.field(cols.cogs, "cogs", parse_amount)?,
        gross_margin_pct: reader.field(cols.gross_margin_pct, "gross margin percentage", parse_amount)?,
        gross_income: reader.field(cols.gross_income, "gross income", parse_amount)?,
        rating: reader.field(cols.rating, "Rating", parse_amount)?,
    })
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

/// Read and type the whole transaction file.
pub fn load(path: &Path) -> Result<Table> {
    let display = path.display().to_string();
    let data = std::fs::read(path).map_err(|e| DashError::data_load(&display, e.to_string()))?;
    parse_bytes(&data, &display)
}

fn parse_bytes(data: &[u8], path: &str) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);
    let headers = rdr
        .headers()
        .map_err(|e| DashError::data_load(path, e.to_string()))?
        .clone();
    let cols = Columns::from_headers(&headers, path)?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| DashError::data_load(path, e.to_string()))?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let reader = RowReader {
            record: &record,
            path,
            row: i + 1,
        };
        let txn = parse_record(&cols, &reader)?;
        if let Some(problem) = txn.invariant_violation() {
            warn!("{path}: row {}: {problem}", i + 1);
        }
        rows.push(txn);
    }

    info!("loaded {} transactions from {path}", rows.len());
    Ok(Table::new(
        rows,
        SourceInfo {
            path: path.to_string(),
            checksum: compute_checksum(data),
        },
    ))
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceKey {
    path: PathBuf,
    modified: Option<SystemTime>,
    len: u64,
}

impl SourceKey {
    fn probe(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let canonical =
            std::fs::canonicalize(path).map_err(|e| DashError::data_load(&display, e.to_string()))?;
        let meta = std::fs::metadata(&canonical)
            .map_err(|e| DashError::data_load(&display, e.to_string()))?;
        Ok(Self {
            path: canonical,
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

struct CacheEntry {
    key: SourceKey,
    table: Arc<Table>,
}

/// Holds the parsed dataset until the source changes or `invalidate` is called.
#[derive(Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, path: &Path) -> Result<Arc<Table>> {
        let key = SourceKey::probe(path)?;

        if let Some(entry) = &mut self.entry {
            if entry.key == key {
                debug!("cache hit for {}", key.path.display());
                return Ok(Arc::clone(&entry.table));
            }
            if entry.key.path == key.path {
                // Touched but possibly unchanged: compare content before re-parsing.
                let display = path.display().to_string();
                let data = std::fs::read(&key.path)
                    .map_err(|e| DashError::data_load(&display, e.to_string()))?;
                if compute_checksum(&data) == entry.table.source().checksum {
                    debug!("{} touched, content unchanged", key.path.display());
                    entry.key = key;
                    return Ok(Arc::clone(&entry.table));
                }
                debug!("cache stale for {}", key.path.display());
                // A failed re-parse must not leave the old table cached.
                self.invalidate();
                let table = Arc::new(parse_bytes(&data, &display)?);
                self.entry = Some(CacheEntry {
                    key,
                    table: Arc::clone(&table),
                });
                return Ok(table);
            }
        }

        debug!("cache miss for {}", key.path.display());
        let table = Arc::new(load(path)?);
        self.entry = Some(CacheEntry {
            key,
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("dataset cache invalidated");
        }
    }
}
