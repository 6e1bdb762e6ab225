pub mod info;
pub mod init;
pub mod report;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::error::{DashError, Result};
use crate::filter::FilterParams;
use crate::models::{Branch, ProductLine};

#[derive(Parser)]
#[command(
    name = "salesdash",
    about = "Filter and summarize retail sales data for dashboard charts."
)]
pub struct Cli {
    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remember the default sales file.
    Init {
        /// Path to the sales CSV
        #[arg(long)]
        data: String,
    },
    /// Show what the sales file contains.
    Info {
        /// Sales CSV (default: from settings)
        #[arg(long)]
        data: Option<String>,
    },
    /// List the available summaries.
    Kinds,
    /// Compute one summary, or `all` of them, for a filtered selection.
    Report {
        /// Summary key (see `salesdash kinds`) or `all`
        kind: String,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Sales CSV (default: from settings)
    #[arg(long)]
    pub data: Option<String>,
    /// Branch to include (repeatable; default: all)
    #[arg(long = "branch")]
    pub branches: Vec<String>,
    /// Product line to include, full name or short form like `food` (repeatable; default: all)
    #[arg(long = "product-line")]
    pub product_lines: Vec<String>,
    /// Start date: YYYY-MM-DD (default: first day in the data).
    /// Given alone, the end stays at the last day in the data.
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// End date: YYYY-MM-DD (default: last day in the data).
    /// Given alone, the start stays at the first day in the data.
    #[arg(long = "to")]
    pub to_date: Option<String>,
    /// Rating histogram bins (default: from settings)
    #[arg(long)]
    pub histogram_bins: Option<usize>,
    /// Density grid bins per axis (default: from settings)
    #[arg(long)]
    pub density_bins: Option<usize>,
}

pub(crate) fn parse_date_arg(flag: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DashError::Other(format!("{flag} expects YYYY-MM-DD, got {raw:?}")))
}

impl FilterArgs {
    /// Overlay the given flags on `defaults`; omitted flags keep the default.
    pub fn to_params(&self, defaults: FilterParams) -> Result<FilterParams> {
        let mut params = defaults;
        if !self.branches.is_empty() {
            let branches = self
                .branches
                .iter()
                .map(|b| Branch::parse(b).ok_or_else(|| DashError::UnknownBranch(b.clone())))
                .collect::<Result<Vec<_>>>()?;
            params = params.with_branches(branches);
        }
        if !self.product_lines.is_empty() {
            let lines = self
                .product_lines
                .iter()
                .map(|p| {
                    ProductLine::parse(p).ok_or_else(|| DashError::UnknownProductLine(p.clone()))
                })
                .collect::<Result<Vec<_>>>()?;
            params = params.with_product_lines(lines);
        }
        let date_from = match &self.from_date {
            Some(raw) => parse_date_arg("--from", raw)?,
            None => params.date_from,
        };
        let date_to = match &self.to_date {
            Some(raw) => parse_date_arg("--to", raw)?,
            None => params.date_to,
        };
        Ok(params.with_dates(date_from, date_to))
    }
}
