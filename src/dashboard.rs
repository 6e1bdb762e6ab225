use log::debug;
use serde::Serialize;

use crate::aggregate::{self, AggregateKind, AggregateOptions, Summary, ALL_AGGREGATES};
use crate::error::Result;
use crate::table::Table;

/// One chart slot. Recoverable failures render as a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Panel {
    Ready {
        summary: Summary,
    },
    Placeholder {
        kind: AggregateKind,
        reason: String,
    },
}

impl Panel {
    pub fn kind(&self) -> AggregateKind {
        match self {
            Self::Ready { summary } => summary.kind(),
            Self::Placeholder { kind, .. } => *kind,
        }
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self {
            Self::Ready { summary } => Some(summary),
            Self::Placeholder { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub rows: usize,
    pub panels: Vec<Panel>,
}

impl Dashboard {
    pub fn build(table: &Table, options: &AggregateOptions) -> Result<Self> {
        Self::build_kinds(table, ALL_AGGREGATES, options)
    }

    pub fn build_kinds(
        table: &Table,
        kinds: &[AggregateKind],
        options: &AggregateOptions,
    ) -> Result<Self> {
        let mut panels = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let panel = match aggregate::compute(kind, table, options) {
                Ok(summary) => Panel::Ready { summary },
                Err(e) if e.is_recoverable() => {
                    debug!("{} panel placeholder: {e}", kind.key());
                    Panel::Placeholder {
                        kind,
                        reason: e.to_string(),
                    }
                }
                Err(e) => return Err(e),
            };
            panels.push(panel);
        }
        Ok(Self {
            rows: table.len(),
            panels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Branch, ProductLine};
    use crate::table::fixtures::{table, txn};

    #[test]
    fn test_build_has_panel_per_kind() {
        let t = table(vec![
            txn(Branch::A, ProductLine::HealthAndBeauty, (2019, 1, 5), 74.69, 7),
            txn(Branch::B, ProductLine::FoodAndBeverages, (2019, 1, 6), 54.84, 3),
            txn(Branch::C, ProductLine::SportsAndTravel, (2019, 1, 7), 86.31, 2),
        ]);
        let d = Dashboard::build(&t, &AggregateOptions::default()).unwrap();
        assert_eq!(d.rows, 3);
        assert_eq!(d.panels.len(), ALL_AGGREGATES.len());
        assert!(d.panels.iter().all(|p| p.summary().is_some()));
    }

    #[test]
    fn test_insufficient_rows_become_placeholder() {
        let t = table(vec![txn(Branch::A, ProductLine::HealthAndBeauty, (2019, 1, 5), 74.69, 7)]);
        let d = Dashboard::build(&t, &AggregateOptions::default()).unwrap();
        let find = |kind| d.panels.iter().find(|p| p.kind() == kind).unwrap();
        match find(AggregateKind::CorrelationMatrix) {
            Panel::Placeholder { reason, .. } => assert!(reason.contains("at least 2 rows")),
            other => panic!("expected placeholder, got {other:?}"),
        }
        assert!(find(AggregateKind::SalesOverTime).summary().is_some());
    }

    #[test]
    fn test_empty_table_builds_without_error() {
        let d = Dashboard::build(&table(vec![]), &AggregateOptions::default()).unwrap();
        assert_eq!(d.rows, 0);
        let placeholders = d.panels.iter().filter(|p| p.summary().is_none()).count();
        assert_eq!(placeholders, 1);
    }

    #[test]
    fn test_build_kinds_subset() {
        let t = table(vec![txn(Branch::A, ProductLine::HealthAndBeauty, (2019, 1, 5), 74.69, 7)]);
        let kinds = [AggregateKind::PaymentShares, AggregateKind::SalesOverTime];
        let d = Dashboard::build_kinds(&t, &kinds, &AggregateOptions::default()).unwrap();
        let got: Vec<_> = d.panels.iter().map(Panel::kind).collect();
        assert_eq!(got, kinds);
    }
}
