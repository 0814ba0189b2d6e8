use thiserror::Error;

use crate::domain::EntryError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount '{0}': expected a non-negative number")]
    InvalidAmount(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("Unknown city: {0}")]
    InvalidCity(String),

    #[error("Unsupported currency: {0}")]
    InvalidCurrency(String),

    #[error("Storage unavailable: {0:#}")]
    StorageUnavailable(#[from] anyhow::Error),
}

impl AppError {
    /// True for input errors the caller can fix by re-entering the value.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, AppError::StorageUnavailable(_))
    }
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        match err {
            EntryError::InvalidAmount(s) => AppError::InvalidAmount(s),
            EntryError::InvalidDate(s) => AppError::InvalidDate(s),
            EntryError::InvalidCategory(s) => AppError::InvalidCategory(s),
            EntryError::InvalidCity(s) => AppError::InvalidCity(s),
            EntryError::InvalidCurrency(s) => AppError::InvalidCurrency(s),
        }
    }
}
