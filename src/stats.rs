use serde::Serialize;

/// Equal-width bins. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            counts: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Evenly spaced bin boundaries over the finite range of `values`.
/// A zero-width range is widened by 0.5 on each side.
pub fn bin_edges(values: &[f64], bins: usize) -> Vec<f64> {
    if bins == 0 || !values.iter().any(|v| v.is_finite()) {
        return Vec::new();
    }
    let (mut lo, mut hi) = min_max(values);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);
    edges
}

/// Bin for `value`; the last bin is closed on the right. Non-finite values have none.
pub fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
    let bins = edges.len().checked_sub(1)?;
    if bins == 0 || !value.is_finite() || value < edges[0] || value > edges[bins] {
        return None;
    }
    let width = (edges[bins] - edges[0]) / bins as f64;
    let idx = ((value - edges[0]) / width).floor() as usize;
    Some(idx.min(bins - 1))
}

pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let edges = bin_edges(values, bins);
    if edges.is_empty() {
        return Histogram::empty();
    }
    let mut counts = vec![0usize; edges.len() - 1];
    for &v in values {
        if let Some(i) = bin_index(&edges, v) {
            counts[i] += 1;
        }
    }
    Histogram { edges, counts }
}

/// Range of the finite values; `(inf, -inf)` when there are none.
pub fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Quantile of sorted data, interpolating linearly between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

pub fn five_number(values: &[f64]) -> Option<FiveNumber> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(FiveNumber {
        min: *sorted.first()?,
        q1: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q3: quantile(&sorted, 0.75)?,
        max: *sorted.last()?,
    })
}

// Checked exactly: a constant column's mean can round away from its values.
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

/// Pearson correlation. `None` for fewer than 2 pairs or a zero-variance input.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 || is_constant(&xs[..n]) || is_constant(&ys[..n]) {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}
