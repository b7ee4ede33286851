use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid filters provided")]
    InvalidFilters,

    #[error("invalid limit provided {0}")]
    InvalidLimit(String),

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),
}
