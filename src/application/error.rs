use thiserror::Error;

use crate::domain::Amount;

/// Errors surfaced by the ledger. The `Display` text is written to be shown
/// to the user as-is.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid Account Number or PIN.")]
    AuthenticationFailed,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient balance: available {balance}, requested {required}")]
    InsufficientFunds { balance: Amount, required: Amount },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
