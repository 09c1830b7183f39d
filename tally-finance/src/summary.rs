//! Spending summaries over a canonical table.
//!
//! Loads a previously written canonical CSV back as stored (categories are
//! not recomputed, so manual edits survive) and aggregates it the way the
//! dashboard views need: spend per auto-category over absolute amounts, and
//! daily expense totals with a running cumulative total.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_core::{CanonicalColumn, CanonicalTable, CanonicalTransaction, TransactionType, UNCATEGORIZED};
use tally_ingest::{RawTable, canonical_header, parse_amount, parse_date};
use tracing::info;

use crate::error::{Result, SchemaError};

/// Columns a canonical CSV must carry to be summarized
const SUMMARY_REQUIRED: [CanonicalColumn; 3] = [
    CanonicalColumn::Date,
    CanonicalColumn::Amount,
    CanonicalColumn::AutoCategory,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    /// Sum of absolute amounts
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Decimal,
    pub cumulative: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub transactions: usize,
    /// Sum of positive amounts
    pub inflow: Decimal,
    /// Sum of absolute negative amounts
    pub outflow: Decimal,
    pub needs_review: usize,
    /// Ordered by category name
    pub by_category: Vec<CategoryTotal>,
    /// Expense rows only, ordered by date; empty without a type column
    pub daily_expenses: Vec<DailyTotal>,
}

fn header_for(raw: &RawTable, column: CanonicalColumn) -> Option<&str> {
    raw.headers()
        .iter()
        .map(String::as_str)
        .find(|h| canonical_header(h) == column.name())
}

/// Read a canonical CSV as stored. `date`, `amount` and `auto_category` are
/// required; an empty auto-category reads as "Uncategorized".
pub fn load_canonical(raw: &RawTable) -> Result<CanonicalTable> {
    let missing: Vec<&'static str> = SUMMARY_REQUIRED
        .iter()
        .filter(|c| header_for(raw, **c).is_none())
        .map(|c| c.name())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns(missing));
    }

    let date_h = header_for(raw, CanonicalColumn::Date);
    let desc_h = header_for(raw, CanonicalColumn::Description);
    let amount_h = header_for(raw, CanonicalColumn::Amount);
    let auto_h = header_for(raw, CanonicalColumn::AutoCategory);
    let bank_h = header_for(raw, CanonicalColumn::BankCategory);
    let type_h = header_for(raw, CanonicalColumn::TransactionType);
    let review_h = header_for(raw, CanonicalColumn::NeedsReview);

    let mut table = CanonicalTable::new(bank_h.is_some(), type_h.is_some());

    for (i, rec) in raw.records().enumerate() {
        let field = |h: Option<&str>| h.and_then(|h| rec.get(h)).unwrap_or("");

        let amount_raw = field(amount_h);
        let amount = parse_amount(amount_raw).ok_or_else(|| SchemaError::InvalidAmount {
            row: i + 1,
            value: amount_raw.to_string(),
        })?;

        let date_raw = field(date_h);
        let date = parse_date(date_raw).ok_or_else(|| SchemaError::InvalidDate {
            row: i + 1,
            value: date_raw.to_string(),
        })?;

        let auto_category = match field(auto_h) {
            "" => UNCATEGORIZED.to_string(),
            c => c.to_string(),
        };

        table.push(CanonicalTransaction {
            date,
            description: field(desc_h).to_string(),
            amount,
            auto_category,
            bank_category: bank_h
                .map(|h| field(Some(h)))
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            transaction_type: type_h.map(|h| {
                TransactionType::from_label(field(Some(h))).unwrap_or(TransactionType::Unknown)
            }),
            needs_review: field(review_h).trim().eq_ignore_ascii_case("true"),
        });
    }

    Ok(table)
}

pub fn summarize(table: &CanonicalTable) -> Summary {
    let mut by_category: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    let mut inflow = Decimal::ZERO;
    let mut outflow = Decimal::ZERO;

    for row in table.rows() {
        let entry = by_category
            .entry(row.auto_category.as_str())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += row.abs_amount();
        entry.1 += 1;

        if row.is_negative() {
            outflow += row.abs_amount();
        } else {
            inflow += row.amount;
        }

        if row.transaction_type == Some(TransactionType::Expense) {
            *daily.entry(row.date).or_insert(Decimal::ZERO) += row.abs_amount();
        }
    }

    let mut cumulative = Decimal::ZERO;
    let daily_expenses = daily
        .into_iter()
        .map(|(date, total)| {
            cumulative += total;
            DailyTotal {
                date,
                total,
                cumulative,
            }
        })
        .collect();

    let summary = Summary {
        transactions: table.len(),
        inflow,
        outflow,
        needs_review: table.review_count(),
        by_category: by_category
            .into_iter()
            .map(|(category, (total, count))| CategoryTotal {
                category: category.to_string(),
                total,
                count,
            })
            .collect(),
        daily_expenses,
    };

    info!(
        transactions = summary.transactions,
        categories = summary.by_category.len(),
        expense_days = summary.daily_expenses.len(),
        "summarized canonical table"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::write_csv;
    use crate::normalize;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn canonical(csv: &str) -> CanonicalTable {
        load_canonical(&RawTable::from_reader(csv.as_bytes()).unwrap()).unwrap()
    }

    const PROCESSED: &str = "\
date,description,amount,auto_category,bank_category,transaction_type,needs_review
2024-01-05,STARBUCKS,-4.50,Eating Out,Dining,Expense,false
2024-01-05,PEETS,-3.25,Eating Out,Dining,Expense,false
2024-01-06,AMAZON MKTPL,-36.99,Amazon,Shopping,Expense,true
2024-01-07,AMZN RETURN,19.99,Shopping,Shopping,Income,false
2024-01-08,KING SOOPERS,-61.00,Cat,,Expense,false
";

    #[test]
    fn test_category_totals_use_absolute_amounts() {
        let summary = summarize(&canonical(PROCESSED));
        let totals: Vec<_> = summary
            .by_category
            .iter()
            .map(|c| (c.category.as_str(), c.total, c.count))
            .collect();
        assert_eq!(
            totals,
            vec![
                ("Amazon", dec("36.99"), 1),
                ("Cat", dec("61.00"), 1),
                ("Eating Out", dec("7.75"), 2),
                ("Shopping", dec("19.99"), 1),
            ]
        );
    }

    #[test]
    fn test_daily_expenses_accumulate() {
        let summary = summarize(&canonical(PROCESSED));
        let daily: Vec<_> = summary
            .daily_expenses
            .iter()
            .map(|d| (d.date.to_string(), d.total, d.cumulative))
            .collect();
        assert_eq!(
            daily,
            vec![
                ("2024-01-05".to_string(), dec("7.75"), dec("7.75")),
                ("2024-01-06".to_string(), dec("36.99"), dec("44.74")),
                ("2024-01-08".to_string(), dec("61.00"), dec("105.74")),
            ]
        );
    }

    #[test]
    fn test_flows_and_review_count() {
        let summary = summarize(&canonical(PROCESSED));
        assert_eq!(summary.transactions, 5);
        assert_eq!(summary.inflow, dec("19.99"));
        assert_eq!(summary.outflow, dec("105.74"));
        assert_eq!(summary.needs_review, 1);
    }

    #[test]
    fn test_edited_categories_are_kept() {
        // "KING SOOPERS" would be re-tagged Groceries by the rules
        let table = canonical(PROCESSED);
        assert_eq!(table.rows()[4].auto_category, "Cat");
        assert_eq!(table.rows()[4].bank_category, None);
    }

    #[test]
    fn test_no_type_column_has_no_daily_expenses() {
        let table = canonical("date,amount,auto_category\n2024-01-05,-4.50,\n");
        assert_eq!(table.rows()[0].auto_category, UNCATEGORIZED);
        assert_eq!(table.rows()[0].description, "");

        let summary = summarize(&table);
        assert!(summary.daily_expenses.is_empty());
        assert_eq!(summary.by_category[0].category, UNCATEGORIZED);
    }

    #[test]
    fn test_missing_summary_columns() {
        let raw = RawTable::from_reader("date,description,amount\n2024-01-05,X,1\n".as_bytes()).unwrap();
        let err = load_canonical(&raw).unwrap_err();
        assert_eq!(err.to_string(), "Missing required columns: auto_category");
    }

    #[test]
    fn test_bad_amount_in_processed_file() {
        let raw = RawTable::from_reader("date,amount,auto_category\n2024-01-05,abc,X\n".as_bytes()).unwrap();
        assert!(matches!(
            load_canonical(&raw).unwrap_err(),
            SchemaError::InvalidAmount { row: 1, .. }
        ));
    }

    #[test]
    fn test_loads_what_the_writer_wrote() {
        let raw = RawTable::from_reader(
            "Date,Description,Amount,Type\n2024-01-05,AMAZON FRESH,-54.10,Sale\n".as_bytes(),
        )
        .unwrap();
        let table = normalize(&raw).unwrap();

        let mut buf = Vec::new();
        write_csv(&table, &mut buf, true).unwrap();
        let reread = load_canonical(&RawTable::from_reader(buf.as_slice()).unwrap()).unwrap();
        assert_eq!(reread, table);
    }

    #[test]
    fn test_empty_table() {
        let summary = summarize(&CanonicalTable::default());
        assert_eq!(summary.transactions, 0);
        assert_eq!(summary.inflow, Decimal::ZERO);
        assert!(summary.by_category.is_empty());
    }
}
