use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tally_core::CanonicalTable;
use tally_finance::{to_json, write_csv};
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// How an existing output file is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    #[default]
    Overwrite,
    /// Add rows; the header is written only if the file is new or empty
    Append,
}

/// Write the table to `dest`, or stdout when `dest` is None.
pub fn write_table(
    table: &CanonicalTable,
    dest: Option<&Path>,
    format: OutputFormat,
    mode: WriteMode,
) -> Result<()> {
    let Some(path) = dest else {
        if mode == WriteMode::Append {
            bail!("append needs an output file (--out or output.path in config)");
        }
        match format {
            OutputFormat::Csv => write_csv(table, io::stdout().lock(), true)?,
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(table))?),
        }
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }

    match (format, mode) {
        (OutputFormat::Json, WriteMode::Append) => {
            bail!("append is only supported for CSV output");
        }
        (OutputFormat::Json, WriteMode::Overwrite) => {
            let s = serde_json::to_string_pretty(&to_json(table))?;
            fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        }
        (OutputFormat::Csv, WriteMode::Overwrite) => {
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            write_csv(table, file, true).with_context(|| format!("write {}", path.display()))?;
        }
        (OutputFormat::Csv, WriteMode::Append) => {
            let needs_header = is_missing_or_empty(path);
            if !needs_header {
                check_header_matches(table, path)?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open {}", path.display()))?;
            write_csv(table, &mut file, needs_header)
                .with_context(|| format!("append {}", path.display()))?;
            file.flush()?;
        }
    }

    info!(path = %path.display(), rows = table.len(), ?mode, "wrote canonical table");
    Ok(())
}

fn is_missing_or_empty(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true)
}

/// Appending rows under a different header would corrupt the file.
fn check_header_matches(table: &CanonicalTable, path: &Path) -> Result<()> {
    let mut rdr = csv::Reader::from_path(path).with_context(|| format!("read {}", path.display()))?;
    let existing: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let expected: Vec<&str> = table.columns().iter().map(|c| c.name()).collect();

    if existing != expected {
        bail!(
            "cannot append to {}: existing columns [{}] differ from [{}]",
            path.display(),
            existing.join(", "),
            expected.join(", ")
        );
    }
    Ok(())
}
