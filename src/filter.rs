use std::collections::BTreeSet;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::error::{DashError, Result};
use crate::models::{Branch, ProductLine};
use crate::table::Table;

/// The three dashboard selections: branches, product lines, inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParams {
    pub branches: BTreeSet<Branch>,
    pub product_lines: BTreeSet<ProductLine>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl FilterParams {
    /// Everything observed in `table`, over its full date span.
    /// `None` when the table is empty.
    pub fn all(table: &Table) -> Option<Self> {
        let (date_from, date_to) = table.date_bounds()?;
        Some(Self {
            branches: table.branches(),
            product_lines: table.product_lines(),
            date_from,
            date_to,
        })
    }

    pub fn with_branches(mut self, branches: impl IntoIterator<Item = Branch>) -> Self {
        self.branches = branches.into_iter().collect();
        self
    }

    pub fn with_product_lines(mut self, lines: impl IntoIterator<Item = ProductLine>) -> Self {
        self.product_lines = lines.into_iter().collect();
        self
    }

    pub fn with_dates(mut self, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        self.date_from = date_from;
        self.date_to = date_to;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.date_from > self.date_to {
            return Err(DashError::InvalidRange {
                from: self.date_from,
                to: self.date_to,
            });
        }
        Ok(())
    }

    /// True when a selection is empty and the result is empty by construction.
    pub fn selects_nothing(&self) -> bool {
        self.branches.is_empty() || self.product_lines.is_empty()
    }
}

pub fn filter(table: &Table, params: &FilterParams) -> Result<Table> {
    params.validate()?;
    if params.selects_nothing() {
        warn!("empty branch or product line selection; result is empty");
    }

    let filtered = table.select(|t| {
        params.branches.contains(&t.branch)
            && params.product_lines.contains(&t.product_line)
            && params.date_from <= t.date
            && t.date <= params.date_to
    });
    debug!(
        "filter kept {} of {} rows ({}..={})",
        filtered.len(),
        table.len(),
        params.date_from,
        params.date_to
    );
    Ok(filtered)
}
