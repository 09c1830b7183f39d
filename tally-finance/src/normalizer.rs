//! Statement normalization: raw CSV table in, canonical transaction table out.
//!
//! The transform is pure. It borrows the raw table, never mutates it, and
//! either produces a whole table or fails for the whole batch.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::{CanonicalTable, CanonicalTransaction, TransactionType, UNCATEGORIZED};
use tally_ingest::{CanonicalField, ColumnMap, RawTable, parse_amount, parse_date};
use tracing::{debug, info};

use crate::category_rules::CategoryRules;
use crate::error::{Result, SchemaError};

/// What to do with rows whose type is "payment".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentPolicy {
    /// Remove payment rows (card payoffs are transfers, not income).
    #[default]
    Drop,
    /// Keep payment rows and count them as income.
    Income,
}

impl PaymentPolicy {
    /// Map a lowercased, trimmed type cell to a transaction type.
    fn map_type(self, lowered: &str) -> TransactionType {
        match (lowered, self) {
            ("sale", _) => TransactionType::Expense,
            ("return", _) => TransactionType::Income,
            ("payment", PaymentPolicy::Income) => TransactionType::Income,
            _ => TransactionType::from_label(lowered).unwrap_or(TransactionType::Unknown),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentPolicy::Drop => "drop",
            PaymentPolicy::Income => "income",
        }
    }
}

impl fmt::Display for PaymentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(PaymentPolicy::Drop),
            "income" => Ok(PaymentPolicy::Income),
            other => Err(format!("unknown payment policy '{other}' (expected drop or income)")),
        }
    }
}

/// Knobs for a normalization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub payment_policy: PaymentPolicy,
}

/// Reusable normalizer holding its options and rule set.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
    rules: CategoryRules,
}

/// Normalize with the default options and the standard rules.
pub fn normalize(raw: &RawTable) -> Result<CanonicalTable> {
    Normalizer::default().normalize(raw)
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            rules: CategoryRules::standard(),
        }
    }

    pub fn with_rules(options: NormalizeOptions, rules: CategoryRules) -> Self {
        Self { options, rules }
    }

    pub fn normalize(&self, raw: &RawTable) -> Result<CanonicalTable> {
        let columns = ColumnMap::from_headers(raw.headers());

        let (Some(date_col), Some(desc_col), Some(amount_col)) = (
            columns.get(CanonicalField::Date),
            columns.get(CanonicalField::Description),
            columns.get(CanonicalField::Amount),
        ) else {
            let missing = columns
                .missing_required()
                .iter()
                .map(|f| f.name())
                .collect();
            return Err(SchemaError::MissingColumns(missing));
        };
        let category_col = columns.get(CanonicalField::BankCategory);
        let type_col = columns.get(CanonicalField::TransactionType);

        // Every amount is validated before any date, so a batch reports the
        // same failure regardless of which row it sits in.
        let amounts = raw
            .records()
            .enumerate()
            .map(|(i, rec)| {
                let value = rec.get_index(amount_col).unwrap_or("");
                parse_amount(value).ok_or_else(|| SchemaError::InvalidAmount {
                    row: i + 1,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<Decimal>>>()?;

        let dates = raw
            .records()
            .enumerate()
            .map(|(i, rec)| {
                let value = rec.get_index(date_col).unwrap_or("");
                parse_date(value).ok_or_else(|| SchemaError::InvalidDate {
                    row: i + 1,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<NaiveDate>>>()?;

        let mut table = CanonicalTable::new(category_col.is_some(), type_col.is_some());
        let mut payments_dropped = 0usize;

        for ((rec, amount), date) in raw.records().zip(amounts).zip(dates) {
            let description = rec.get_index(desc_col).unwrap_or("").to_string();

            let bank_category = category_col
                .and_then(|c| rec.get_index(c))
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            // A blank label is kept as-is but is no category to seed from
            let seed = bank_category
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(UNCATEGORIZED);
            let categorized = self.rules.categorize(&description, seed);

            let transaction_type = match type_col {
                Some(c) => {
                    let lowered = rec.get_index(c).unwrap_or("").trim().to_lowercase();
                    if lowered == "payment" && self.options.payment_policy == PaymentPolicy::Drop {
                        payments_dropped += 1;
                        debug!(description = %description, "dropping payment row");
                        continue;
                    }
                    Some(self.options.payment_policy.map_type(&lowered))
                }
                None => None,
            };

            table.push(CanonicalTransaction {
                date,
                description,
                amount,
                auto_category: categorized.category,
                bank_category,
                transaction_type,
                needs_review: categorized.needs_review,
            });
        }

        info!(
            rows_in = raw.len(),
            rows_out = table.len(),
            payments_dropped,
            needs_review = table.review_count(),
            policy = %self.options.payment_policy,
            "normalized statement"
        );

        Ok(table)
    }
}
