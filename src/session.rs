use std::path::Path;
use std::sync::Arc;

use log::info;

use crate::aggregate::{AggregateKind, AggregateOptions};
use crate::dashboard::Dashboard;
use crate::error::{DashError, Result};
use crate::filter::{filter, FilterParams};
use crate::loader::DatasetCache;
use crate::table::Table;

/// One viewer's state: the shared full table plus the current selection.
pub struct Session {
    full: Arc<Table>,
    params: FilterParams,
    filtered: Table,
    options: AggregateOptions,
}

impl Session {
    pub fn open(cache: &mut DatasetCache, path: &Path, options: AggregateOptions) -> Result<Self> {
        let full = cache.get(path)?;
        Self::from_table(full, options)
    }

    pub fn from_table(full: Arc<Table>, options: AggregateOptions) -> Result<Self> {
        let params = FilterParams::all(&full).ok_or_else(|| {
            DashError::data_load(full.source().path.clone(), "dataset has no rows")
        })?;
        let filtered = filter(&full, &params)?;
        info!("session opened with {} rows", full.len());
        Ok(Self {
            full,
            params,
            filtered,
            options,
        })
    }

    pub fn full(&self) -> &Table {
        &self.full
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    pub fn filtered(&self) -> &Table {
        &self.filtered
    }

    /// Apply a new selection. On error the previous selection stays current
    /// and the caller reports the error.
    pub fn apply(&mut self, params: FilterParams) -> Result<&Table> {
        let filtered = filter(&self.full, &params)?;
        self.params = params;
        self.filtered = filtered;
        Ok(&self.filtered)
    }

    pub fn dashboard(&self) -> Result<Dashboard> {
        Dashboard::build(&self.filtered, &self.options)
    }

    pub fn dashboard_for(&self, kinds: &[AggregateKind]) -> Result<Dashboard> {
        Dashboard::build_kinds(&self.filtered, kinds, &self.options)
    }
}
