use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{Branch, ProductLine, Transaction};

/// Where a table came from. Filtered tables inherit their parent's source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceInfo {
    pub path: String,
    pub checksum: String,
}

/// Read-only set of transactions.
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Transaction>,
    source: SourceInfo,
}

impl Table {
    pub fn new(rows: Vec<Transaction>, source: SourceInfo) -> Self {
        Self { rows, source }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    /// Earliest and latest transaction date, or `None` when empty.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|t| t.date).min()?;
        let max = self.rows.iter().map(|t| t.date).max()?;
        Some((min, max))
    }

    pub fn branches(&self) -> BTreeSet<Branch> {
        self.rows.iter().map(|t| t.branch).collect()
    }

    pub fn product_lines(&self) -> BTreeSet<ProductLine> {
        self.rows.iter().map(|t| t.product_line).collect()
    }

    /// Derive a new table from the rows that satisfy `keep`.
    pub fn select(&self, keep: impl Fn(&Transaction) -> bool) -> Table {
        Table {
            rows: self.rows.iter().filter(|t| keep(t)).cloned().collect(),
            source: self.source.clone(),
        }
    }

    pub fn column(&self, get: impl Fn(&Transaction) -> f64) -> Vec<f64> {
        self.rows.iter().map(get).collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::models::{CustomerType, PaymentMethod};

    /// Build a row with consistent derived amounts (5% tax, total = cogs + tax).
    pub fn txn(
        branch: Branch,
        product_line: ProductLine,
        date: (i32, u32, u32),
        unit_price: f64,
        quantity: u32,
    ) -> Transaction {
        let cogs = unit_price * quantity as f64;
        let tax = cogs * 0.05;
        Transaction {
            invoice_id: None,
            branch,
            city: None,
            customer_type: CustomerType::Member,
            gender: None,
            product_line,
            unit_price,
            quantity,
            tax,
            total: cogs + tax,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: NaiveTime::from_hms_opt(13, 8, 0).unwrap(),
            payment: PaymentMethod::Cash,
            cogs,
            gross_margin_pct: 4.761904762,
            gross_income: tax,
            rating: 7.0,
        }
    }

    pub fn table(rows: Vec<Transaction>) -> Table {
        Table::new(rows, SourceInfo::default())
    }
}
