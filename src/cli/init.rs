use std::path::Path;

use colored::Colorize;

use crate::error::{DashError, Result};
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

pub fn run(data: &str) -> Result<()> {
    let resolved = shellexpand_path(data);
    if !Path::new(&resolved).is_file() {
        return Err(DashError::data_load(resolved, "file not found"));
    }
    let mut settings = load_settings();
    settings.data_path = resolved;
    save_settings(&settings)?;
    println!(
        "{} default sales file: {}",
        "Saved".green(),
        settings.data_path
    );
    println!("Settings:  {}", settings_path().display());
    Ok(())
}
