use std::path::PathBuf;

use crate::error::Result;
use crate::loader;
use crate::settings::load_settings;
use crate::table::Table;

pub fn run(data: Option<String>) -> Result<()> {
    let settings = load_settings();
    let path = PathBuf::from(data.unwrap_or(settings.data_path));
    let table = loader::load(&path)?;
    println!("{}", format_info(&table));
    Ok(())
}

pub fn format_info(table: &Table) -> String {
    let source = table.source();
    let mut out = String::new();
    out.push_str(&format!("File:          {}\n", source.path));
    out.push_str(&format!("Checksum:      {}\n", source.checksum));
    out.push_str(&format!("Transactions:  {}\n", table.len()));
    match table.date_bounds() {
        Some((from, to)) => out.push_str(&format!("Dates:         {from} to {to}\n")),
        None => out.push_str("Dates:         (no rows)\n"),
    }
    let branches: Vec<&str> = table.branches().iter().map(|b| b.key()).collect();
    out.push_str(&format!("Branches:      {}\n", branches.join(", ")));
    let lines: Vec<&str> = table.product_lines().iter().map(|p| p.name()).collect();
    out.push_str(&format!("Product lines: {}", lines.join(", ")));
    out
}
