//! tally-finance: statement normalization, keyword category rules, canonical table export and spending summaries

pub mod category_rules;
pub mod error;
pub mod export;
pub mod normalizer;
pub mod summary;

pub use category_rules::{Categorized, CategoryRules, KeywordRule};
pub use error::SchemaError;
pub use export::{to_json, write_csv};
pub use normalizer::{NormalizeOptions, Normalizer, PaymentPolicy, normalize};
pub use summary::{CategoryTotal, DailyTotal, Summary, load_canonical, summarize};
