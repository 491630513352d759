use thiserror::Error;

use crate::models::{BankName, SourceFormat};

/// Document-level failures. Any of these aborts the whole import and no
/// partial result is produced. Malformed individual rows are not errors in
/// this sense; they are collected as [`crate::models::RowError`] values.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("No schema registered for {0}")]
    UnsupportedBank(BankName),

    #[error("{bank} statements are not supported as {format}")]
    UnsupportedFormat { bank: BankName, format: SourceFormat },

    #[error("A schema for {0} is already registered")]
    DuplicateSchema(BankName),

    #[error("Invalid schema for {bank}: {reason}")]
    InvalidSchema { bank: BankName, reason: String },

    #[error("Password problem: {0}")]
    InvalidPassword(String),

    #[error("Document could not be decoded: {0}")]
    CorruptDocument(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
