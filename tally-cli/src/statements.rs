use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tally_core::CanonicalTable;
use tally_finance::Normalizer;
use tally_ingest::{RawTable, ensure_supported_extension};
use tracing::{info, warn};

/// Canonical rows from every accepted statement, in argument order
#[derive(Debug)]
pub struct Loaded {
    pub table: CanonicalTable,
    pub files: usize,
}

/// Read and normalize each statement. Files with a disallowed extension are
/// skipped; any other failure aborts the whole load.
pub fn load_statements(
    paths: &[PathBuf],
    allowed_extensions: &[String],
    normalizer: &Normalizer,
) -> Result<Loaded> {
    let mut table = CanonicalTable::default();
    let mut files = 0usize;

    for path in paths {
        if let Err(e) = ensure_supported_extension(path, allowed_extensions) {
            warn!("skipping {}: {}", path.display(), e);
            continue;
        }

        let raw = RawTable::from_path(path).with_context(|| format!("reading {}", path.display()))?;
        let part = normalizer
            .normalize(&raw)
            .with_context(|| format!("normalizing {}", path.display()))?;

        info!(file = %path.display(), rows = part.len(), "loaded statement");
        table.extend(part);
        files += 1;
    }

    if files == 0 {
        bail!("No valid CSV files were provided");
    }

    Ok(Loaded { table, files })
}
