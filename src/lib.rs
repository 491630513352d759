//! Ingestion and normalization of Nigerian bank statements.
//!
//! Takes a statement document (CSV export or PDF, sometimes
//! password-protected), recognizes the bank's layout through a registered
//! schema, and produces a deduplicated, categorized sequence of canonical
//! transactions for the downstream tax calculator and store. Malformed rows
//! are isolated and reported per row; only document-level problems (unknown
//! bank, wrong password, corrupt bytes) abort an import.
//!
//! ```no_run
//! use kobo::{BankName, Importer, SourceFormat};
//!
//! let importer = Importer::default();
//! let bytes = std::fs::read("statement.csv").unwrap();
//! let result = importer
//!     .import(&bytes, BankName::Zenith, SourceFormat::Csv, None)
//!     .unwrap();
//! for txn in &result.transactions {
//!     println!("{} {} {}", txn.date, txn.amount, txn.description);
//! }
//! ```

pub mod amount;
pub mod categorizer;
pub mod dates;
pub mod error;
pub mod extractor;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod schema;

pub use categorizer::CategoryRules;
pub use error::{ImportError, Result};
pub use models::{
    BalanceWarning, BankName, CanonicalTransaction, Category, ImportResult, RawRow, RowError,
    RowErrorKind, SourceFormat,
};
pub use pipeline::Importer;
pub use schema::{BankSchema, ColumnRole, DateFormat, SchemaRegistry};
