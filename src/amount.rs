use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::schema::{BankSchema, ColumnRole};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Not a numeric amount: {0}")]
    Unparseable(String),

    #[error("Debit and credit are both populated")]
    BothPopulated,

    #[error("Neither debit nor credit carries a value")]
    NeitherPopulated,

    #[error("Missing field for column {0}")]
    MissingField(usize),
}

/// Whether a debit/credit cell counts as empty. Nigerian statements pad the
/// unused side with "-" or "0.00" rather than leaving it blank.
pub fn is_blank(raw: &str) -> bool {
    matches!(raw.trim(), "" | "-" | "0.00")
}

/// Strip currency adornments and parse an exact decimal. Handles the naira
/// sign, NGN prefixes, comma separators, surrounding quotes, parenthesized
/// negatives and trailing DR/CR markers.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let mut s = raw.trim().trim_matches('"').trim().to_string();

    let mut negate = false;
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        negate = true;
        s = inner.trim().to_string();
    }

    let upper = s.to_ascii_uppercase();
    if let Some(stripped) = upper.strip_suffix("DR") {
        negate = true;
        s = stripped.trim().to_string();
    } else if let Some(stripped) = upper.strip_suffix("CR") {
        s = stripped.trim().to_string();
    }

    s = s.replace(',', "").replace('\u{20a6}', "").replace(' ', "");
    if let Some(stripped) = s.to_ascii_uppercase().strip_prefix("NGN") {
        s = stripped.to_string();
    }

    let value =
        Decimal::from_str(&s).map_err(|_| AmountError::Unparseable(raw.trim().to_string()))?;
    if negate && value.is_sign_positive() {
        Ok(-value)
    } else {
        Ok(value)
    }
}

/// Derive the signed amount (and the advisory running balance, when the
/// layout has one) from a row's raw fields.
///
/// Debit/credit layouts require exactly one populated side: credit yields a
/// positive amount, debit a negative one. Single-amount layouts take the sign
/// literally. The balance never participates in deriving the amount.
pub fn resolve(
    fields: &[String],
    schema: &BankSchema,
) -> Result<(Decimal, Option<Decimal>), AmountError> {
    let amount = if let Some(idx) = schema.column(ColumnRole::Amount) {
        let raw = field(fields, idx)?;
        if is_blank(raw) {
            return Err(AmountError::NeitherPopulated);
        }
        parse_amount(raw)?
    } else {
        let debit_idx = schema
            .column(ColumnRole::Debit)
            .ok_or(AmountError::NeitherPopulated)?;
        let credit_idx = schema
            .column(ColumnRole::Credit)
            .ok_or(AmountError::NeitherPopulated)?;
        let debit = field(fields, debit_idx)?;
        let credit = field(fields, credit_idx)?;
        match (is_blank(debit), is_blank(credit)) {
            (false, false) => return Err(AmountError::BothPopulated),
            (true, true) => return Err(AmountError::NeitherPopulated),
            (false, true) => -parse_amount(debit)?.abs(),
            (true, false) => parse_amount(credit)?.abs(),
        }
    };

    // Unparseable balances degrade to None: the column is advisory only.
    let balance = schema
        .column(ColumnRole::Balance)
        .and_then(|idx| fields.get(idx))
        .filter(|raw| !is_blank(raw))
        .and_then(|raw| parse_amount(raw).ok());

    Ok((amount, balance))
}

fn field(fields: &[String], idx: usize) -> Result<&str, AmountError> {
    fields
        .get(idx)
        .map(|s| s.as_str())
        .ok_or(AmountError::MissingField(idx))
}
