//! Canonical transaction record produced by statement normalization

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default auto-category when no bank label or keyword rule applies
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One normalized statement row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalTransaction {
    /// Calendar date of the transaction
    pub date: NaiveDate,
    /// Statement description, unmodified
    pub description: String,
    /// Signed amount exactly as the bank reported it (sign preserved)
    pub amount: Decimal,
    /// System-assigned spending category
    pub auto_category: String,
    /// Category label supplied by the bank, if the cell had one
    pub bank_category: Option<String>,
    /// Normalized type; `None` when the statement had no type column
    pub transaction_type: Option<TransactionType>,
    /// Set when the categorizer is not confident (vendor-level match)
    pub needs_review: bool,
}

/// Normalized transaction direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Expense,
    Income,
    Unknown,
}

impl TransactionType {
    /// Label written to the canonical table
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "Expense",
            TransactionType::Income => "Income",
            TransactionType::Unknown => "Unknown",
        }
    }

    /// Recognize an already-canonical label (any case).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "expense" => Some(TransactionType::Expense),
            "income" => Some(TransactionType::Income),
            "unknown" => Some(TransactionType::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CanonicalTransaction {
    /// Returns true if the bank reported a negative amount
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Absolute amount, as spending summaries total it
    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}
