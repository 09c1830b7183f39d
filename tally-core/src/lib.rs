//! tally-core: canonical transaction model shared by the ingest, finance and CLI crates

pub mod table;
pub mod transaction;

pub use table::{CanonicalColumn, CanonicalTable};
pub use transaction::{CanonicalTransaction, TransactionType, UNCATEGORIZED};
