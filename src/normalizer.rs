use rust_decimal::Decimal;

use crate::amount;
use crate::dates;
use crate::models::{CanonicalTransaction, Category, RawRow, RowError, RowErrorKind};
use crate::schema::{BankSchema, ColumnRole};

/// A normalized row still carrying its advisory balance reading for the
/// pipeline's consistency pass. The balance never leaves the pipeline.
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub transaction: CanonicalTransaction,
    pub balance: Option<Decimal>,
}

/// Convert one raw row into a canonical transaction under the given schema.
///
/// Every resolver failure becomes a [`RowError`] carrying the row's position
/// and raw content; nothing here aborts the surrounding import. One bad line
/// in a 500-line statement must not take the other 499 with it.
pub fn normalize(row: &RawRow, schema: &BankSchema) -> Result<NormalizedRow, RowError> {
    let fail = |kind: RowErrorKind, message: String| RowError {
        position: row.position,
        raw: row.joined(),
        kind,
        message,
    };

    if row.fields.len() != schema.column_count() {
        return Err(fail(
            RowErrorKind::ColumnCountMismatch,
            format!(
                "expected {} columns, found {}",
                schema.column_count(),
                row.fields.len()
            ),
        ));
    }

    let date_idx = schema
        .column(ColumnRole::Date)
        .expect("schema validated at registration");
    let desc_idx = schema
        .column(ColumnRole::Description)
        .expect("schema validated at registration");

    let date = dates::resolve(&row.fields[date_idx], schema.date_format)
        .map_err(|e| fail(RowErrorKind::DateParse, e.to_string()))?;

    let (amount, balance) = amount::resolve(&row.fields, schema)
        .map_err(|e| fail(RowErrorKind::AmountParse, e.to_string()))?;

    // Collapse wrapped-line whitespace; an empty description is data, not
    // an error.
    let description = row.fields[desc_idx]
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    Ok(NormalizedRow {
        transaction: CanonicalTransaction {
            date,
            description,
            amount,
            bank: schema.bank,
            category: Category::Uncategorized,
            position: row.position,
            duplicate: false,
        },
        balance,
    })
}
