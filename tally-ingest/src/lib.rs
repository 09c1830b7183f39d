//! tally-ingest: raw statement tables, header aliasing and cell parsers.

pub mod error;
pub mod fields;
pub mod headers;
pub mod types;

use std::path::Path;

pub use error::{IngestionError, Result};
pub use fields::{parse_amount, parse_date};
pub use headers::{CanonicalField, ColumnMap, canonical_header, resolve_alias};
pub use types::{RawRecord, RawTable};

/// Reject files whose extension is not in `allowed` (case-insensitive).
pub fn ensure_supported_extension(path: &Path, allowed: &[String]) -> Result<()> {
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)));

    if ok {
        Ok(())
    } else {
        Err(IngestionError::UnsupportedExtension {
            path: path.to_path_buf(),
            allowed: allowed.to_vec(),
        })
    }
}
