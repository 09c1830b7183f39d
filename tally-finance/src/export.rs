//! Serialize a canonical table as CSV or JSON for downstream views.

use std::io::Write;

use serde_json::{Map, Value};
use tally_core::{CanonicalColumn, CanonicalTable, CanonicalTransaction};

fn cell(row: &CanonicalTransaction, column: CanonicalColumn) -> String {
    match column {
        CanonicalColumn::Date => row.date.format("%Y-%m-%d").to_string(),
        CanonicalColumn::Description => row.description.clone(),
        CanonicalColumn::Amount => row.amount.to_string(),
        CanonicalColumn::AutoCategory => row.auto_category.clone(),
        CanonicalColumn::BankCategory => row.bank_category.clone().unwrap_or_default(),
        CanonicalColumn::TransactionType => row
            .transaction_type
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        CanonicalColumn::NeedsReview => row.needs_review.to_string(),
    }
}

/// Write the table as CSV. The header row lists exactly the projected
/// columns; pass `include_header = false` when appending to an existing file.
pub fn write_csv<W: Write>(table: &CanonicalTable, writer: W, include_header: bool) -> csv::Result<()> {
    let columns = table.columns();
    let mut wtr = csv::Writer::from_writer(writer);

    if include_header {
        wtr.write_record(columns.iter().map(|c| c.name()))?;
    }
    for row in table.rows() {
        wtr.write_record(columns.iter().map(|c| cell(row, *c)))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Array of row objects keyed by the projected columns.
pub fn to_json(table: &CanonicalTable) -> Value {
    let columns = table.columns();
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            for column in &columns {
                let value = match column {
                    CanonicalColumn::NeedsReview => Value::Bool(row.needs_review),
                    CanonicalColumn::BankCategory => row
                        .bank_category
                        .clone()
                        .map(Value::String)
                        .unwrap_or(Value::Null),
                    _ => Value::String(cell(row, *column)),
                };
                obj.insert(column.name().to_string(), value);
            }
            Value::Object(obj)
        })
        .collect();

    Value::Array(rows)
}
