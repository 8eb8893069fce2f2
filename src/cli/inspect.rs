use anyhow::{Context, Result};
use std::path::PathBuf;

use qms_ice::reader::read_qms_file;

/// Display information about a QMS file
pub fn run(file: PathBuf, time_key: &str) -> Result<()> {
    let table = read_qms_file(&file)
        .with_context(|| format!("Failed to read QMS file {}", file.display()))?;

    println!("File: {}", file.display());
    println!("{}", table.summary(time_key));

    Ok(())
}
