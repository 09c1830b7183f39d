use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{IngestionError, Result};

/// Untyped statement table as read from a CSV export.
///
/// Headers keep their original case and whitespace; canonicalization is
/// the normalizer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// One row of a [`RawTable`], viewed as header -> value.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl RawTable {
    /// Build a table from in-memory headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a comma-separated table with a mandatory header row.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(IngestionError::MissingHeader);
        }

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(columns = headers.len(), rows = rows.len(), "read raw statement table");
        Ok(Self { headers, rows })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = RawRecord<'_>> {
        self.rows.iter().map(|values| RawRecord {
            headers: &self.headers,
            values,
        })
    }
}

impl<'a> RawRecord<'a> {
    /// Value under an exact (un-canonicalized) header.
    pub fn get(&self, header: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == header)?;
        self.values.get(idx).map(String::as_str)
    }

    pub fn get_index(&self, column: usize) -> Option<&'a str> {
        self.values.get(column).map(String::as_str)
    }
}
