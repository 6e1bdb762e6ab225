/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Correlation cell: two decimals, or a dash when undefined.
pub fn coefficient(val: Option<f64>) -> String {
    val.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Inclusive-exclusive bin label, e.g. `[4.00, 4.30)`.
pub fn bin_range(lo: f64, hi: f64, last: bool) -> String {
    let close = if last { ']' } else { ')' };
    format!("[{lo:.2}, {hi:.2}{close}")
}
