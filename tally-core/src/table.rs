//! Canonical transaction table and its column projection.

use crate::transaction::CanonicalTransaction;

/// Output columns, in the fixed order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalColumn {
    Date,
    Description,
    Amount,
    AutoCategory,
    BankCategory,
    TransactionType,
    NeedsReview,
}

impl CanonicalColumn {
    pub const ALL: [CanonicalColumn; 7] = [
        CanonicalColumn::Date,
        CanonicalColumn::Description,
        CanonicalColumn::Amount,
        CanonicalColumn::AutoCategory,
        CanonicalColumn::BankCategory,
        CanonicalColumn::TransactionType,
        CanonicalColumn::NeedsReview,
    ];

    /// Header name in the canonical table
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalColumn::Date => "date",
            CanonicalColumn::Description => "description",
            CanonicalColumn::Amount => "amount",
            CanonicalColumn::AutoCategory => "auto_category",
            CanonicalColumn::BankCategory => "bank_category",
            CanonicalColumn::TransactionType => "transaction_type",
            CanonicalColumn::NeedsReview => "needs_review",
        }
    }
}

/// Normalized statement: rows plus which optional columns the source carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalTable {
    has_bank_category: bool,
    has_transaction_type: bool,
    rows: Vec<CanonicalTransaction>,
}

impl CanonicalTable {
    pub fn new(has_bank_category: bool, has_transaction_type: bool) -> Self {
        Self {
            has_bank_category,
            has_transaction_type,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: CanonicalTransaction) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[CanonicalTransaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: CanonicalColumn) -> bool {
        match column {
            CanonicalColumn::BankCategory => self.has_bank_category,
            CanonicalColumn::TransactionType => self.has_transaction_type,
            _ => true,
        }
    }

    /// Columns present in this table, in output order.
    pub fn columns(&self) -> Vec<CanonicalColumn> {
        CanonicalColumn::ALL
            .into_iter()
            .filter(|c| self.has_column(*c))
            .collect()
    }

    /// Append another statement's rows. An optional column present in
    /// either table is present in the result.
    pub fn extend(&mut self, other: CanonicalTable) {
        self.has_bank_category |= other.has_bank_category;
        self.has_transaction_type |= other.has_transaction_type;
        self.rows.extend(other.rows);
    }

    /// Number of rows flagged for manual review
    pub fn review_count(&self) -> usize {
        self.rows.iter().filter(|r| r.needs_review).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{TransactionType, UNCATEGORIZED};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn row(description: &str, needs_review: bool) -> CanonicalTransaction {
        CanonicalTransaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: description.to_string(),
            amount: Decimal::new(-1999, 2),
            auto_category: UNCATEGORIZED.to_string(),
            bank_category: None,
            transaction_type: Some(TransactionType::Unknown),
            needs_review,
        }
    }

    #[test]
    fn test_projection_omits_absent_columns() {
        let table = CanonicalTable::new(false, false);
        let names: Vec<_> = table.columns().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["date", "description", "amount", "auto_category", "needs_review"]
        );

        let full = CanonicalTable::new(true, true);
        assert_eq!(full.columns(), CanonicalColumn::ALL.to_vec());
    }

    #[test]
    fn test_extend_merges_columns_and_rows() {
        let mut a = CanonicalTable::new(true, false);
        a.push(row("AMAZON MKTPL", true));
        let mut b = CanonicalTable::new(false, true);
        b.push(row("SHELL OIL", false));

        a.extend(b);
        assert_eq!(a.len(), 2);
        assert!(a.has_column(CanonicalColumn::BankCategory));
        assert!(a.has_column(CanonicalColumn::TransactionType));
        assert_eq!(a.review_count(), 1);
        assert_eq!(a.rows()[1].description, "SHELL OIL");
    }
}
