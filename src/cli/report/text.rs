use std::collections::BTreeMap;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::aggregate::{
    AggregateKind, BoxSummary, CorrelationMatrix, DailyTotal, DensityGrid,
    GrossIncomeComposition, LineTotal, PaymentShares, ScatterPoint, Summary,
};
use crate::dashboard::{Dashboard, Panel};
use crate::filter::FilterParams;
use crate::fmt::{bin_range, coefficient, money, percent};
use crate::stats::Histogram;

/// One line describing the active selection.
pub fn format_selection(params: &FilterParams, rows: usize) -> String {
    let branches: Vec<&str> = params.branches.iter().map(|b| b.key()).collect();
    let lines: Vec<&str> = params.product_lines.iter().map(|p| p.name()).collect();
    format!(
        "{rows} transactions | branches: {} | product lines: {} | {} to {}",
        if branches.is_empty() { "none".to_string() } else { branches.join(", ") },
        if lines.is_empty() { "none".to_string() } else { lines.join(", ") },
        params.date_from,
        params.date_to,
    )
}

pub fn format_dashboard(dashboard: &Dashboard) -> String {
    dashboard
        .panels
        .iter()
        .map(format_panel)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_panel(panel: &Panel) -> String {
    match panel {
        Panel::Ready { summary } => format_summary(summary),
        Panel::Placeholder { reason, .. } => format_placeholder(panel.kind(), reason),
    }
}

pub fn format_placeholder(kind: AggregateKind, reason: &str) -> String {
    format!("{}\n{}", kind.title(), format!("  {reason}").yellow())
}

pub fn format_summary(summary: &Summary) -> String {
    match summary {
        Summary::SalesOverTime(days) => format_sales_over_time(days),
        Summary::IncomeByProductLine(items) => format_income_by_product_line(items),
        Summary::RatingDistribution(hist) => format_rating_distribution(hist),
        Summary::SpendingByCustomerType(boxes) => format_spending(boxes),
        Summary::CostVsIncomeDensity(grid) => format_density(grid),
        Summary::PaymentShares(shares) => format_payment_shares(shares),
        Summary::CorrelationMatrix(matrix) => format_correlation(matrix),
        Summary::GrossIncomeComposition(comp) => format_composition(comp),
        Summary::QuantityVsIncome(points) => format_scatter(points),
    }
}

fn no_data(kind: AggregateKind) -> String {
    format!("{}\n  No transactions in this selection.", kind.title())
}

pub fn format_sales_over_time(days: &[DailyTotal]) -> String {
    let kind = AggregateKind::SalesOverTime;
    if days.is_empty() {
        return no_data(kind);
    }
    let mut table = Table::new();
    table.set_header(vec!["Date", "Total"]);
    for d in days {
        table.add_row(vec![Cell::new(d.date), Cell::new(money(d.total))]);
    }
    let sum: f64 = days.iter().map(|d| d.total).sum();
    table.add_row(vec![Cell::new("Total".bold()), Cell::new(money(sum))]);
    format!("{} ({} days)\n{table}", kind.title(), days.len())
}

pub fn format_income_by_product_line(items: &[LineTotal]) -> String {
    let kind = AggregateKind::IncomeByProductLine;
    if items.is_empty() {
        return no_data(kind);
    }
    let mut table = Table::new();
    table.set_header(vec!["Product line", "Total"]);
    for item in items {
        table.add_row(vec![
            Cell::new(item.product_line.name()),
            Cell::new(money(item.total)),
        ]);
    }
    format!("{}\n{table}", kind.title())
}

pub fn format_rating_distribution(hist: &Histogram) -> String {
    let kind = AggregateKind::RatingDistribution;
    if hist.total() == 0 {
        return no_data(kind);
    }
    let mut table = Table::new();
    table.set_header(vec!["Rating", "Count"]);
    let last = hist.counts.len().saturating_sub(1);
    for (i, count) in hist.counts.iter().enumerate() {
        table.add_row(vec![
            Cell::new(bin_range(hist.edges[i], hist.edges[i + 1], i == last)),
            Cell::new(count),
        ]);
    }
    format!("{}\n{table}", kind.title())
}

pub fn format_spending(boxes: &[BoxSummary]) -> String {
    let kind = AggregateKind::SpendingByCustomerType;
    if boxes.is_empty() {
        return no_data(kind);
    }
    let mut table = Table::new();
    table.set_header(vec!["Customer type", "Count", "Min", "Q1", "Median", "Q3", "Max"]);
    for b in boxes {
        table.add_row(vec![
            Cell::new(b.customer_type.name()),
            Cell::new(b.count),
            Cell::new(money(b.min)),
            Cell::new(money(b.q1)),
            Cell::new(money(b.median)),
            Cell::new(money(b.q3)),
            Cell::new(money(b.max)),
        ]);
    }
    format!("{}\n{table}", kind.title())
}

pub fn format_density(grid: &DensityGrid) -> String {
    let kind = AggregateKind::CostVsIncomeDensity;
    if grid.cells.is_empty() {
        return no_data(kind);
    }
    let x_last = grid.x_marginal.len().saturating_sub(1);
    let y_last = grid.y_marginal.len().saturating_sub(1);
    let mut table = Table::new();
    table.set_header(vec!["COGS", "Gross income", "Count"]);
    for c in &grid.cells {
        table.add_row(vec![
            Cell::new(bin_range(grid.x_edges[c.x], grid.x_edges[c.x + 1], c.x == x_last)),
            Cell::new(bin_range(grid.y_edges[c.y], grid.y_edges[c.y + 1], c.y == y_last)),
            Cell::new(c.count),
        ]);
    }
    format!(
        "{} ({} transactions in {} occupied cells)\n{table}",
        kind.title(),
        grid.total(),
        grid.cells.len()
    )
}

pub fn format_payment_shares(shares: &PaymentShares) -> String {
    let kind = AggregateKind::PaymentShares;
    if shares.total == 0 {
        return no_data(kind);
    }
    let mut table = Table::new();
    table.set_header(vec!["Payment", "Count", "Share"]);
    for p in &shares.counts {
        table.add_row(vec![
            Cell::new(p.method.name()),
            Cell::new(p.count),
            Cell::new(shares.share(p.method).map(percent).unwrap_or_default()),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(shares.total),
        Cell::new(""),
    ]);
    format!("{}\n{table}", kind.title())
}

pub fn format_correlation(matrix: &CorrelationMatrix) -> String {
    let mut header = vec![String::new()];
    header.extend(matrix.columns.iter().map(|c| c.name().to_string()));
    let mut table = Table::new();
    table.set_header(header);
    for (i, col) in matrix.columns.iter().enumerate() {
        let mut row = vec![Cell::new(col.name().bold())];
        for j in 0..matrix.columns.len() {
            let r = matrix.get(i, j);
            let text = coefficient(r);
            let cell = match r {
                Some(v) if i != j && v >= 0.7 => text.green().to_string(),
                Some(v) if i != j && v <= -0.7 => text.red().to_string(),
                _ => text,
            };
            row.push(Cell::new(cell));
        }
        table.add_row(row);
    }
    format!("{}\n{table}", AggregateKind::CorrelationMatrix.title())
}

pub fn format_composition(comp: &GrossIncomeComposition) -> String {
    let kind = AggregateKind::GrossIncomeComposition;
    if comp.by_branch.is_empty() {
        return no_data(kind);
    }
    let total = comp.total();
    let mut table = Table::new();
    table.set_header(vec!["Branch", "Product line", "Gross income", "Share"]);
    for (branch, lines) in &comp.by_branch {
        for (line, income) in lines {
            table.add_row(vec![
                Cell::new(branch.key()),
                Cell::new(line.name()),
                Cell::new(money(*income)),
                Cell::new(share_of(*income, total)),
            ]);
        }
        let branch_total = comp.branch_total(*branch);
        table.add_row(vec![
            Cell::new(format!("{} total", branch.key()).bold()),
            Cell::new(""),
            Cell::new(money(branch_total)),
            Cell::new(share_of(branch_total, total)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(money(total)),
        Cell::new(""),
    ]);
    format!("{}\n{table}", kind.title())
}

fn share_of(part: f64, total: f64) -> String {
    if total > 0.0 {
        percent(part / total)
    } else {
        String::new()
    }
}

/// Points grouped by quantity; the chart itself plots every point.
pub fn format_scatter(points: &[ScatterPoint]) -> String {
    let kind = AggregateKind::QuantityVsIncome;
    if points.is_empty() {
        return no_data(kind);
    }
    let mut by_qty: BTreeMap<u32, (usize, f64, f64)> = BTreeMap::new();
    for p in points {
        let entry = by_qty
            .entry(p.quantity)
            .or_insert((0, f64::INFINITY, f64::NEG_INFINITY));
        entry.0 += 1;
        entry.1 = entry.1.min(p.gross_income);
        entry.2 = entry.2.max(p.gross_income);
    }
    let mut table = Table::new();
    table.set_header(vec!["Quantity", "Points", "Min gross income", "Max gross income"]);
    for (qty, (count, lo, hi)) in by_qty {
        table.add_row(vec![
            Cell::new(qty),
            Cell::new(count),
            Cell::new(money(lo)),
            Cell::new(money(hi)),
        ]);
    }
    format!("{} ({} points)\n{table}", kind.title(), points.len())
}
