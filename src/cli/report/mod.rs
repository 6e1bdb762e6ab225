pub mod text;

use std::path::PathBuf;

use colored::Colorize;
use log::{debug, info};

use crate::aggregate::{get_by_key, AggregateKind};
use crate::cli::FilterArgs;
use crate::error::{DashError, Result};
use crate::loader::DatasetCache;
use crate::session::Session;
use crate::settings::load_settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(DashError::Other(format!(
                "Unknown format: {other} (expected text or json)"
            ))),
        }
    }
}

/// One key from `salesdash kinds`, or `None` for `all`.
pub fn resolve_kind(key: &str) -> Result<Option<AggregateKind>> {
    if key.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    get_by_key(&key.to_ascii_lowercase())
        .map(Some)
        .ok_or_else(|| DashError::UnknownAggregate(key.to_string()))
}

pub fn run(kind: &str, filter: &FilterArgs, format: &str) -> Result<()> {
    let kind = resolve_kind(kind)?;
    let format = OutputFormat::parse(format)?;
    let out = render(kind, filter, format)?;
    println!("{out}");
    Ok(())
}

pub(crate) fn render(
    kind: Option<AggregateKind>,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<String> {
    let settings = load_settings();
    let data_path = PathBuf::from(filter.data.as_deref().unwrap_or(&settings.data_path));
    let mut options = settings.aggregate_options();
    if let Some(bins) = filter.histogram_bins {
        options.histogram_bins = bins.max(1);
    }
    if let Some(bins) = filter.density_bins {
        options.density_bins = bins.max(1);
    }

    let mut cache = DatasetCache::new();
    let mut session = Session::open(&mut cache, &data_path, options)?;
    let params = filter.to_params(session.params().clone())?;
    session.apply(params)?;
    info!(
        "{} of {} rows selected",
        session.filtered().len(),
        session.full().len()
    );

    if session.filtered().is_empty() {
        eprintln!(
            "{}",
            "Warning: no transactions match this selection".yellow()
        );
    }

    let dashboard = match kind {
        Some(kind) => session.dashboard_for(&[kind])?,
        None => session.dashboard()?,
    };
    debug!(
        "{} of {} panels ready",
        dashboard.panels.iter().filter(|p| p.summary().is_some()).count(),
        dashboard.panels.len()
    );
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&dashboard)?),
        OutputFormat::Text => Ok(format!(
            "{}\n\n{}",
            text::format_selection(session.params(), session.filtered().len()),
            text::format_dashboard(&dashboard)
        )),
    }
}
