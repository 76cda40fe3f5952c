use thiserror::Error;

use crate::domain::{Cents, ExpenseId, LedgerError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Expense title must not be empty")]
    EmptyTitle,

    #[error("Insufficient wallet balance: {balance} cents available, {required} cents required")]
    InsufficientBalance { balance: Cents, required: Cents },

    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount { amount } => {
                AppError::InvalidAmount(format!("{} cents (must be positive)", amount))
            }
            LedgerError::EmptyTitle => AppError::EmptyTitle,
            LedgerError::InsufficientBalance { balance, required } => {
                AppError::InsufficientBalance { balance, required }
            }
            LedgerError::ExpenseNotFound(id) => AppError::ExpenseNotFound(id),
        }
    }
}
