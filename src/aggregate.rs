use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{DashError, Result};
use crate::models::{Branch, CustomerType, PaymentMethod, ProductLine, Transaction};
use crate::stats::{self, Histogram};
use crate::table::Table;

// ---------------------------------------------------------------------------
// Aggregate kinds: enum dispatch, one entry point per chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    SalesOverTime,
    IncomeByProductLine,
    RatingDistribution,
    SpendingByCustomerType,
    CostVsIncomeDensity,
    PaymentShares,
    CorrelationMatrix,
    GrossIncomeComposition,
    QuantityVsIncome,
}

impl AggregateKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::SalesOverTime => "sales",
            Self::IncomeByProductLine => "income",
            Self::RatingDistribution => "rating",
            Self::SpendingByCustomerType => "spending",
            Self::CostVsIncomeDensity => "density",
            Self::PaymentShares => "payment",
            Self::CorrelationMatrix => "correlation",
            Self::GrossIncomeComposition => "composition",
            Self::QuantityVsIncome => "scatter",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::SalesOverTime => "Total Sales Over Time",
            Self::IncomeByProductLine => "Income by Product Line",
            Self::RatingDistribution => "Customer Rating Distribution",
            Self::SpendingByCustomerType => "Spending by Customer Type",
            Self::CostVsIncomeDensity => "Cost vs Gross Income Density",
            Self::PaymentShares => "Preferred Payment Methods",
            Self::CorrelationMatrix => "Correlation Matrix",
            Self::GrossIncomeComposition => "Gross Income by Branch and Product Line",
            Self::QuantityVsIncome => "Quantity vs Gross Income",
        }
    }

    /// The chart this summary is shaped for.
    pub fn chart(&self) -> &'static str {
        match self {
            Self::SalesOverTime => "line",
            Self::IncomeByProductLine => "horizontal bar",
            Self::RatingDistribution => "histogram",
            Self::SpendingByCustomerType => "box plot",
            Self::CostVsIncomeDensity => "density heatmap",
            Self::PaymentShares => "pie",
            Self::CorrelationMatrix => "heatmap",
            Self::GrossIncomeComposition => "stacked bar",
            Self::QuantityVsIncome => "scatter",
        }
    }
}

pub const ALL_AGGREGATES: &[AggregateKind] = &[
    AggregateKind::SalesOverTime,
    AggregateKind::IncomeByProductLine,
    AggregateKind::RatingDistribution,
    AggregateKind::SpendingByCustomerType,
    AggregateKind::CostVsIncomeDensity,
    AggregateKind::PaymentShares,
    AggregateKind::CorrelationMatrix,
    AggregateKind::GrossIncomeComposition,
    AggregateKind::QuantityVsIncome,
];

pub fn get_by_key(key: &str) -> Option<AggregateKind> {
    ALL_AGGREGATES.iter().find(|k| k.key() == key).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub histogram_bins: usize,
    pub density_bins: usize,
}

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;
pub const DEFAULT_DENSITY_BINS: usize = 30;

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            density_bins: DEFAULT_DENSITY_BINS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Summary {
    SalesOverTime(Vec<DailyTotal>),
    IncomeByProductLine(Vec<LineTotal>),
    RatingDistribution(Histogram),
    SpendingByCustomerType(Vec<BoxSummary>),
    CostVsIncomeDensity(DensityGrid),
    PaymentShares(PaymentShares),
    CorrelationMatrix(CorrelationMatrix),
    GrossIncomeComposition(GrossIncomeComposition),
    QuantityVsIncome(Vec<ScatterPoint>),
}

impl Summary {
    pub fn kind(&self) -> AggregateKind {
        match self {
            Self::SalesOverTime(_) => AggregateKind::SalesOverTime,
            Self::IncomeByProductLine(_) => AggregateKind::IncomeByProductLine,
            Self::RatingDistribution(_) => AggregateKind::RatingDistribution,
            Self::SpendingByCustomerType(_) => AggregateKind::SpendingByCustomerType,
            Self::CostVsIncomeDensity(_) => AggregateKind::CostVsIncomeDensity,
            Self::PaymentShares(_) => AggregateKind::PaymentShares,
            Self::CorrelationMatrix(_) => AggregateKind::CorrelationMatrix,
            Self::GrossIncomeComposition(_) => AggregateKind::GrossIncomeComposition,
            Self::QuantityVsIncome(_) => AggregateKind::QuantityVsIncome,
        }
    }
}

pub fn compute(kind: AggregateKind, table: &Table, options: &AggregateOptions) -> Result<Summary> {
    Ok(match kind {
        AggregateKind::SalesOverTime => Summary::SalesOverTime(sales_over_time(table)),
        AggregateKind::IncomeByProductLine => {
            Summary::IncomeByProductLine(income_by_product_line(table))
        }
        AggregateKind::RatingDistribution => {
            Summary::RatingDistribution(rating_distribution(table, options.histogram_bins))
        }
        AggregateKind::SpendingByCustomerType => {
            Summary::SpendingByCustomerType(spending_by_customer_type(table))
        }
        AggregateKind::CostVsIncomeDensity => {
            Summary::CostVsIncomeDensity(cost_vs_income_density(table, options.density_bins))
        }
        AggregateKind::PaymentShares => Summary::PaymentShares(payment_shares(table)),
        AggregateKind::CorrelationMatrix => Summary::CorrelationMatrix(correlation_matrix(table)?),
        AggregateKind::GrossIncomeComposition => {
            Summary::GrossIncomeComposition(gross_income_composition(table))
        }
        AggregateKind::QuantityVsIncome => Summary::QuantityVsIncome(quantity_vs_income(table)),
    })
}

// ---------------------------------------------------------------------------
// Sales over time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
}

/// Summed `total` per day, ascending. Days without sales are absent.
pub fn sales_over_time(table: &Table) -> Vec<DailyTotal> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for t in table.iter() {
        *by_date.entry(t.date).or_default() += t.total;
    }
    by_date
        .into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect()
}

// ---------------------------------------------------------------------------
// Income by product line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTotal {
    pub product_line: ProductLine,
    pub total: f64,
}

/// Summed `total` per product line, smallest first.
pub fn income_by_product_line(table: &Table) -> Vec<LineTotal> {
    let mut by_line: BTreeMap<ProductLine, f64> = BTreeMap::new();
    for t in table.iter() {
        *by_line.entry(t.product_line).or_default() += t.total;
    }
    let mut items: Vec<LineTotal> = by_line
        .into_iter()
        .map(|(product_line, total)| LineTotal { product_line, total })
        .collect();
    // Stable sort keeps product line order among equal totals.
    items.sort_by(|a, b| a.total.total_cmp(&b.total));
    items
}

// ---------------------------------------------------------------------------
// Rating distribution
// ---------------------------------------------------------------------------

pub fn rating_distribution(table: &Table, bins: usize) -> Histogram {
    stats::histogram(&table.column(|t| t.rating), bins)
}

// ---------------------------------------------------------------------------
// Spending by customer type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub customer_type: CustomerType,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Every `total`, in row order, for point overlays.
    pub values: Vec<f64>,
}

pub fn spending_by_customer_type(table: &Table) -> Vec<BoxSummary> {
    let mut by_type: BTreeMap<CustomerType, Vec<f64>> = BTreeMap::new();
    for t in table.iter() {
        by_type.entry(t.customer_type).or_default().push(t.total);
    }
    by_type
        .into_iter()
        .filter_map(|(customer_type, values)| {
            let s = stats::five_number(&values)?;
            Some(BoxSummary {
                customer_type,
                count: values.len(),
                min: s.min,
                q1: s.q1,
                median: s.median,
                q3: s.q3,
                max: s.max,
                values,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Cost vs income density
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DensityCell {
    pub x: usize,
    pub y: usize,
    pub count: usize,
}

/// 2-D histogram of (cogs, gross income) with the marginal 1-D counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityGrid {
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    /// Non-zero cells only, ordered by (x, y).
    pub cells: Vec<DensityCell>,
    pub x_marginal: Vec<usize>,
    pub y_marginal: Vec<usize>,
}

impl DensityGrid {
    pub fn total(&self) -> usize {
        self.cells.iter().map(|c| c.count).sum()
    }
}

pub fn cost_vs_income_density(table: &Table, bins: usize) -> DensityGrid {
    let xs = table.column(|t| t.cogs);
    let ys = table.column(|t| t.gross_income);
    let x_hist = stats::histogram(&xs, bins);
    let y_hist = stats::histogram(&ys, bins);

    let mut grid: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for (&x, &y) in xs.iter().zip(&ys) {
        if let (Some(xi), Some(yi)) = (
            stats::bin_index(&x_hist.edges, x),
            stats::bin_index(&y_hist.edges, y),
        ) {
            *grid.entry((xi, yi)).or_default() += 1;
        }
    }

    DensityGrid {
        x_edges: x_hist.edges,
        y_edges: y_hist.edges,
        cells: grid
            .into_iter()
            .map(|((x, y), count)| DensityCell { x, y, count })
            .collect(),
        x_marginal: x_hist.counts,
        y_marginal: y_hist.counts,
    }
}

// ---------------------------------------------------------------------------
// Payment shares
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentCount {
    pub method: PaymentMethod,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentShares {
    /// Most used first.
    pub counts: Vec<PaymentCount>,
    pub total: usize,
}

impl PaymentShares {
    /// Fraction of transactions paid with `method`; `None` when there are none at all.
    pub fn share(&self, method: PaymentMethod) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let count = self
            .counts
            .iter()
            .find(|c| c.method == method)
            .map_or(0, |c| c.count);
        Some(count as f64 / self.total as f64)
    }
}

pub fn payment_shares(table: &Table) -> PaymentShares {
    let mut by_method: BTreeMap<PaymentMethod, usize> = BTreeMap::new();
    for t in table.iter() {
        *by_method.entry(t.payment).or_default() += 1;
    }
    let mut counts: Vec<PaymentCount> = by_method
        .into_iter()
        .map(|(method, count)| PaymentCount { method, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    PaymentShares {
        counts,
        total: table.len(),
    }
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationColumn {
    #[serde(rename = "Unit price")]
    UnitPrice,
    Quantity,
    Tax,
    Total,
    #[serde(rename = "cogs")]
    Cogs,
    #[serde(rename = "gross income")]
    GrossIncome,
    Rating,
}

impl CorrelationColumn {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UnitPrice => "Unit price",
            Self::Quantity => "Quantity",
            Self::Tax => "Tax",
            Self::Total => "Total",
            Self::Cogs => "cogs",
            Self::GrossIncome => "gross income",
            Self::Rating => "Rating",
        }
    }

    pub fn value(&self, t: &Transaction) -> f64 {
        match self {
            Self::UnitPrice => t.unit_price,
            Self::Quantity => t.quantity as f64,
            Self::Tax => t.tax,
            Self::Total => t.total,
            Self::Cogs => t.cogs,
            Self::GrossIncome => t.gross_income,
            Self::Rating => t.rating,
        }
    }
}

/// Every numeric column except gross margin percentage, which is constant in the data.
pub const CORRELATION_COLUMNS: &[CorrelationColumn] = &[
    CorrelationColumn::UnitPrice,
    CorrelationColumn::Quantity,
    CorrelationColumn::Tax,
    CorrelationColumn::Total,
    CorrelationColumn::Cogs,
    CorrelationColumn::GrossIncome,
    CorrelationColumn::Rating,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<CorrelationColumn>,
    /// Row-major; `None` where a column has no variance.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }
}

pub fn correlation_matrix(table: &Table) -> Result<CorrelationMatrix> {
    correlation_matrix_for(table, CORRELATION_COLUMNS)
}

pub fn correlation_matrix_for(
    table: &Table,
    columns: &[CorrelationColumn],
) -> Result<CorrelationMatrix> {
    if table.len() < 2 {
        return Err(DashError::InsufficientData { rows: table.len() });
    }
    let series: Vec<Vec<f64>> = columns
        .iter()
        .map(|c| table.column(|t| c.value(t)))
        .collect();

    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        values[i][i] = Some(1.0);
        for j in (i + 1)..n {
            let r = stats::pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

// ---------------------------------------------------------------------------
// Gross income composition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GrossIncomeComposition {
    pub by_branch: BTreeMap<Branch, BTreeMap<ProductLine, f64>>,
}

impl GrossIncomeComposition {
    pub fn branch_total(&self, branch: Branch) -> f64 {
        self.by_branch
            .get(&branch)
            .map_or(0.0, |lines| lines.values().sum())
    }

    pub fn total(&self) -> f64 {
        self.by_branch.values().flat_map(|lines| lines.values()).sum()
    }
}

pub fn gross_income_composition(table: &Table) -> GrossIncomeComposition {
    let mut composition = GrossIncomeComposition::default();
    for t in table.iter() {
        *composition
            .by_branch
            .entry(t.branch)
            .or_default()
            .entry(t.product_line)
            .or_default() += t.gross_income;
    }
    composition
}

// ---------------------------------------------------------------------------
// Quantity vs gross income
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub quantity: u32,
    pub gross_income: f64,
    pub product_line: ProductLine,
}

pub fn quantity_vs_income(table: &Table) -> Vec<ScatterPoint> {
    table
        .iter()
        .map(|t| ScatterPoint {
            quantity: t.quantity,
            gross_income: t.gross_income,
            product_line: t.product_line,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter, FilterParams};
    use crate::table::fixtures::{table, txn};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Table {
        let mut rows = vec![
            txn(Branch::A, ProductLine::HealthAndBeauty, (2019, 1, 5), 74.69, 7),
            txn(Branch::C, ProductLine::ElectronicAccessories, (2019, 3, 8), 15.28, 5),
            txn(Branch::A, ProductLine::HomeAndLifestyle, (2019, 3, 3), 46.33, 7),
            txn(Branch::B, ProductLine::FoodAndBeverages, (2019, 3, 1), 54.84, 3),
            txn(Branch::B, ProductLine::FoodAndBeverages, (2019, 3, 1), 10.0, 2),
            txn(Branch::C, ProductLine::SportsAndTravel, (2019, 2, 8), 86.31, 7),
            txn(Branch::A, ProductLine::FoodAndBeverages, (2019, 1, 5), 25.51, 4),
        ];
        rows[1].customer_type = CustomerType::Normal;
        rows[3].customer_type = CustomerType::Normal;
        rows[1].payment = PaymentMethod::Ewallet;
        rows[2].payment = PaymentMethod::CreditCard;
        rows[4].payment = PaymentMethod::Ewallet;
        rows[5].payment = PaymentMethod::Ewallet;
        rows[6].payment = PaymentMethod::Ewallet;
        for (i, r) in rows.iter_mut().enumerate() {
            r.rating = 4.0 + i as f64 * 0.9;
        }
        table(rows)
    }

    #[test]
    fn test_get_by_key_round_trips_every_kind() {
        for kind in ALL_AGGREGATES {
            assert_eq!(get_by_key(kind.key()), Some(*kind));
        }
        assert_eq!(get_by_key("nope"), None);
    }

    #[test]
    fn test_sales_over_time_sorted_and_sparse() {
        let series = sales_over_time(&sample());
        let dates: Vec<_> = series.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![date(2019, 1, 5), date(2019, 2, 8), date(2019, 3, 1), date(2019, 3, 3), date(2019, 3, 8)]
        );
        let mar1 = &series[2];
        assert!(close(mar1.total, (54.84 * 3.0 + 20.0) * 1.05));
    }

    #[test]
    fn test_single_day_filter_gives_one_point() {
        let t = sample();
        let params = FilterParams::all(&t)
            .unwrap()
            .with_dates(date(2019, 3, 1), date(2019, 3, 1));
        let series = sales_over_time(&filter(&t, &params).unwrap());
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, date(2019, 3, 1));
        let expected: f64 = t.iter().filter(|r| r.date == date(2019, 3, 1)).map(|r| r.total).sum();
        assert!(close(series[0].total, expected));
    }

    #[test]
    fn test_income_by_product_line_ascending_and_conserves_total() {
        let t = sample();
        let items = income_by_product_line(&t);
        assert_eq!(items.len(), 5);
        assert!(items.windows(2).all(|w| w[0].total <= w[1].total));
        let grouped: f64 = items.iter().map(|i| i.total).sum();
        let direct: f64 = t.iter().map(|r| r.total).sum();
        assert!(close(grouped, direct));
        assert_eq!(items[0].product_line, ProductLine::ElectronicAccessories);
    }

    #[test]
    fn test_rating_distribution_uses_observed_range() {
        let h = rating_distribution(&sample(), 20);
        assert_eq!(h.counts.len(), 20);
        assert!(close(h.edges[0], 4.0));
        assert!(close(h.edges[20], 4.0 + 6.0 * 0.9));
        assert_eq!(h.total(), 7);
    }

    #[test]
    fn test_spending_by_customer_type() {
        let t = sample();
        let boxes = spending_by_customer_type(&t);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].customer_type, CustomerType::Member);
        assert_eq!(boxes[0].count, 5);
        assert_eq!(boxes[1].customer_type, CustomerType::Normal);
        let normal: Vec<f64> = t
            .iter()
            .filter(|r| r.customer_type == CustomerType::Normal)
            .map(|r| r.total)
            .collect();
        assert_eq!(boxes[1].values, normal);
        for b in &boxes {
            assert!(b.min <= b.q1 && b.q1 <= b.median && b.median <= b.q3 && b.q3 <= b.max);
        }
    }

    #[test]
    fn test_density_grid_counts_every_row() {
        let t = sample();
        let grid = cost_vs_income_density(&t, 30);
        assert_eq!(grid.x_edges.len(), 31);
        assert_eq!(grid.y_edges.len(), 31);
        assert_eq!(grid.total(), t.len());
        assert_eq!(grid.x_marginal.iter().sum::<usize>(), t.len());
        assert_eq!(grid.y_marginal.iter().sum::<usize>(), t.len());
        // Smallest cogs row sits in the bottom-left cell (gross income tracks cogs here).
        assert_eq!(grid.cells[0], DensityCell { x: 0, y: 0, count: 1 });
        assert!(grid.cells.windows(2).all(|w| (w[0].x, w[0].y) < (w[1].x, w[1].y)));
    }

    #[test]
    fn test_payment_shares() {
        let shares = payment_shares(&sample());
        assert_eq!(shares.total, 7);
        assert_eq!(shares.counts[0].method, PaymentMethod::Ewallet);
        assert_eq!(shares.counts[0].count, 4);
        assert!(close(shares.share(PaymentMethod::Cash).unwrap(), 2.0 / 7.0));
        let sum: usize = shares.counts.iter().map(|c| c.count).sum();
        assert_eq!(sum, shares.total);
    }

    #[test]
    fn test_correlation_matrix_symmetric_unit_diagonal() {
        let m = correlation_matrix(&sample()).unwrap();
        let n = CORRELATION_COLUMNS.len();
        assert_eq!(m.values.len(), n);
        for i in 0..n {
            assert_eq!(m.get(i, i), Some(1.0));
            for j in 0..n {
                assert_eq!(m.values[i][j], m.values[j][i]);
            }
        }
        // Tax, total, cogs and gross income are proportional in the fixture.
        let tax = 2;
        let cogs = 4;
        assert!(close(m.get(tax, cogs).unwrap(), 1.0));
    }

    #[test]
    fn test_correlation_constant_column_is_undefined() {
        let t = table(vec![
            txn(Branch::A, ProductLine::HealthAndBeauty, (2019, 1, 5), 74.69, 3),
            txn(Branch::B, ProductLine::FoodAndBeverages, (2019, 1, 6), 54.84, 3),
            txn(Branch::C, ProductLine::SportsAndTravel, (2019, 1, 7), 86.31, 3),
        ]);
        let cols = [CorrelationColumn::Quantity, CorrelationColumn::Total];
        let m = correlation_matrix_for(&t, &cols).unwrap();
        assert_eq!(m.get(0, 0), Some(1.0));
        assert_eq!(m.get(0, 1), None);
        assert_eq!(m.get(1, 0), None);
    }

    #[test]
    fn test_correlation_needs_two_rows() {
        let one = table(vec![txn(Branch::A, ProductLine::HealthAndBeauty, (2019, 1, 5), 1.0, 1)]);
        let err = correlation_matrix(&one).unwrap_err();
        assert!(matches!(err, DashError::InsufficientData { rows: 1 }));
    }

    #[test]
    fn test_gross_income_composition() {
        let t = sample();
        let c = gross_income_composition(&t);
        assert_eq!(c.by_branch.len(), 3);
        assert_eq!(c.by_branch[&Branch::B].len(), 1);
        let direct: f64 = t.iter().filter(|r| r.branch == Branch::A).map(|r| r.gross_income).sum();
        assert!(close(c.branch_total(Branch::A), direct));
        let all: f64 = t.iter().map(|r| r.gross_income).sum();
        assert!(close(c.total(), all));
    }

    #[test]
    fn test_quantity_vs_income_keeps_row_order() {
        let t = sample();
        let points = quantity_vs_income(&t);
        assert_eq!(points.len(), t.len());
        assert_eq!(points[0].quantity, 7);
        assert_eq!(points[0].product_line, ProductLine::HealthAndBeauty);
    }

    #[test]
    fn test_empty_table_defined_results() {
        let empty = table(vec![]);
        let options = AggregateOptions::default();
        for kind in ALL_AGGREGATES {
            let result = compute(*kind, &empty, &options);
            match (kind, result) {
                (AggregateKind::CorrelationMatrix, Err(DashError::InsufficientData { rows: 0 })) => {}
                (_, Ok(summary)) => assert_eq!(summary.kind(), *kind),
                (_, Err(e)) => panic!("{} failed on empty input: {e}", kind.key()),
            }
        }
        assert_eq!(rating_distribution(&empty, 20), Histogram::empty());
        let grid = cost_vs_income_density(&empty, 30);
        assert!(grid.cells.is_empty() && grid.x_edges.is_empty());
        assert!(payment_shares(&empty).share(PaymentMethod::Cash).is_none());
    }

    #[test]
    fn test_full_selection_matches_unfiltered() {
        let t = sample();
        let filtered = filter(&t, &FilterParams::all(&t).unwrap()).unwrap();
        let options = AggregateOptions::default();
        for kind in ALL_AGGREGATES {
            assert_eq!(
                compute(*kind, &filtered, &options).unwrap(),
                compute(*kind, &t, &options).unwrap()
            );
        }
    }

    #[test]
    fn test_summary_json_is_tagged() {
        let summary = compute(AggregateKind::PaymentShares, &sample(), &AggregateOptions::default()).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["kind"], "payment_shares");
        assert_eq!(json["data"]["total"], 7);
        assert_eq!(json["data"]["counts"][0]["method"], "Ewallet");
    }
}
