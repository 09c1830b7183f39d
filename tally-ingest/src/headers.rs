//! Header canonicalization and the fixed alias table.
//!
//! Bank exports disagree on header spelling ("Transaction Date", " AMOUNT ",
//! "Type"). Headers are lowercased and trimmed first, then looked up in the
//! alias table; anything unmapped is dropped.

use tracing::debug;

/// Canonical input fields the normalizer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Date,
    Description,
    Amount,
    BankCategory,
    TransactionType,
}

impl CanonicalField {
    /// Fields that must be present, in the order they are reported missing.
    pub const REQUIRED: [CanonicalField; 3] = [
        CanonicalField::Date,
        CanonicalField::Description,
        CanonicalField::Amount,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::Date => "date",
            CanonicalField::Description => "description",
            CanonicalField::Amount => "amount",
            CanonicalField::BankCategory => "bank_category",
            CanonicalField::TransactionType => "transaction_type",
        }
    }
}

/// Known header spellings. Canonical names map to themselves so a
/// normalized table can be fed back in unchanged.
const ALIASES: &[(&str, CanonicalField)] = &[
    ("transaction date", CanonicalField::Date),
    ("description", CanonicalField::Description),
    ("amount", CanonicalField::Amount),
    ("category", CanonicalField::BankCategory),
    ("type", CanonicalField::TransactionType),
    ("date", CanonicalField::Date),
    ("bank_category", CanonicalField::BankCategory),
    ("transaction_type", CanonicalField::TransactionType),
];

/// Lowercase and trim a raw header.
pub fn canonical_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Look up an already-canonicalized header in the alias table.
pub fn resolve_alias(header: &str) -> Option<CanonicalField> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == header)
        .map(|(_, field)| *field)
}

/// Column index of each canonical field within a raw table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    date: Option<usize>,
    description: Option<usize>,
    amount: Option<usize>,
    bank_category: Option<usize>,
    transaction_type: Option<usize>,
}

impl ColumnMap {
    /// Map raw headers to canonical fields. When two headers resolve to the
    /// same field the leftmost one is kept.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut map = ColumnMap::default();

        for (idx, raw) in headers.iter().enumerate() {
            let header = canonical_header(raw.as_ref());
            let Some(field) = resolve_alias(&header) else {
                debug!(header = %header, "dropping unmapped column");
                continue;
            };

            let slot = map.slot_mut(field);
            if slot.is_some() {
                debug!(header = %header, field = field.name(), "ignoring duplicate column");
                continue;
            }
            *slot = Some(idx);
        }

        map
    }

    fn slot_mut(&mut self, field: CanonicalField) -> &mut Option<usize> {
        match field {
            CanonicalField::Date => &mut self.date,
            CanonicalField::Description => &mut self.description,
            CanonicalField::Amount => &mut self.amount,
            CanonicalField::BankCategory => &mut self.bank_category,
            CanonicalField::TransactionType => &mut self.transaction_type,
        }
    }

    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        match field {
            CanonicalField::Date => self.date,
            CanonicalField::Description => self.description,
            CanonicalField::Amount => self.amount,
            CanonicalField::BankCategory => self.bank_category,
            CanonicalField::TransactionType => self.transaction_type,
        }
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.get(field).is_some()
    }

    /// Required fields with no column, in reporting order.
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::REQUIRED
            .into_iter()
            .filter(|f| !self.contains(*f))
            .collect()
    }
}
