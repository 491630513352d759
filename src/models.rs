use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Banks with a registered statement layout, plus a catch-all for generic
/// exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankName {
    Zenith,
    GtBank,
    Access,
    Uba,
    FirstBank,
    Fcmb,
    Fidelity,
    Sterling,
    Wema,
    StanbicIbtc,
    Other,
}

impl BankName {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Zenith => "Zenith Bank",
            Self::GtBank => "GTBank",
            Self::Access => "Access Bank",
            Self::Uba => "UBA",
            Self::FirstBank => "First Bank",
            Self::Fcmb => "FCMB",
            Self::Fidelity => "Fidelity Bank",
            Self::Sterling => "Sterling Bank",
            Self::Wema => "Wema Bank",
            Self::StanbicIbtc => "Stanbic IBTC",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for BankName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Declared format of an uploaded statement document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Csv,
    Pdf,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "CSV",
            Self::Pdf => "PDF",
        })
    }
}

/// Categories consumed by the downstream CIT/VAT/WHT calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Income,
    DirectExpenses,
    OperatingExpenses,
    CapitalExpenses,
    NonDeductible,
    Uncategorized,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::DirectExpenses => "Direct Expenses",
            Self::OperatingExpenses => "Operating Expenses",
            Self::CapitalExpenses => "Capital Expenses",
            Self::NonDeductible => "Non-Deductible",
            Self::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row exactly as it appeared in the source document. Lives only between
/// extraction and normalization.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based position in the source, counting every physical row/line.
    pub position: usize,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new(position: usize, fields: Vec<String>) -> Self {
        Self { position, fields }
    }

    /// Raw content for error reports.
    pub fn joined(&self) -> String {
        self.fields.join(" | ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowErrorKind {
    ColumnCountMismatch,
    MalformedRow,
    DateParse,
    AmountParse,
}

impl fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ColumnCountMismatch => "column count mismatch",
            Self::MalformedRow => "malformed row",
            Self::DateParse => "unparseable date",
            Self::AmountParse => "unparseable amount",
        })
    }
}

/// A row the pipeline could not turn into a transaction. Collected, never
/// fatal: callers surface these for manual review and re-entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    pub position: usize,
    pub raw: String,
    pub kind: RowErrorKind,
    pub message: String,
}

/// The normalized, bank-agnostic transaction record this pipeline exists to
/// produce. Handed by value to the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    pub date: NaiveDate,
    pub description: String,
    /// Exact signed amount: positive = credit/inflow, negative = debit/outflow.
    pub amount: Decimal,
    pub bank: BankName,
    pub category: Category,
    /// Source row position, for traceability back to the statement.
    pub position: usize,
    /// Set by the pipeline's duplicate-flagging pass, never by normalization.
    pub duplicate: bool,
}

/// Advisory mismatch between a row's stated amount and the delta of the
/// running balance column. Never an error: the balance column is not
/// authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceWarning {
    pub position: usize,
    pub expected_delta: Decimal,
    pub actual_delta: Decimal,
}

/// Complete outcome of one import invocation. Immutable after construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResult {
    /// Transactions in source order, duplicates retained but flagged.
    pub transactions: Vec<CanonicalTransaction>,
    /// Row-level failures in source order.
    pub errors: Vec<RowError>,
    /// Balance-consistency warnings in source order.
    pub warnings: Vec<BalanceWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_labels() {
        assert_eq!(BankName::Zenith.label(), "Zenith Bank");
        assert_eq!(BankName::StanbicIbtc.to_string(), "Stanbic IBTC");
    }

    #[test]
    fn test_category_labels_match_tax_calculator_names() {
        assert_eq!(Category::DirectExpenses.label(), "Direct Expenses");
        assert_eq!(Category::NonDeductible.label(), "Non-Deductible");
        assert_eq!(Category::Uncategorized.label(), "Uncategorized");
    }

    #[test]
    fn test_raw_row_joined() {
        let row = RawRow::new(3, vec!["01/02/2024".into(), "RENT".into(), "5,000.00".into()]);
        assert_eq!(row.joined(), "01/02/2024 | RENT | 5,000.00");
    }
}
