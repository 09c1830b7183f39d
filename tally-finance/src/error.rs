use thiserror::Error;

/// Statement cannot be turned into a canonical table. Always fatal for the
/// whole batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("Invalid amount {value:?} in row {row}")]
    InvalidAmount { row: usize, value: String },

    #[error("Invalid date {value:?} in row {row}")]
    InvalidDate { row: usize, value: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
