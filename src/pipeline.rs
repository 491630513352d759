use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::categorizer::CategoryRules;
use crate::error::{ImportError, Result};
use crate::extractor;
use crate::models::{
    BalanceWarning, BankName, CanonicalTransaction, ImportResult, SourceFormat,
};
use crate::normalizer::{self, NormalizedRow};
use crate::schema::SchemaRegistry;

/// The import pipeline: schema lookup, extraction, per-row normalization,
/// categorization, balance consistency and duplicate flagging. One complete
/// statement document per invocation; no state survives between calls beyond
/// the read-only registry and rules.
#[derive(Debug, Clone)]
pub struct Importer {
    registry: SchemaRegistry,
    rules: CategoryRules,
    balance_tolerance: Decimal,
}

impl Default for Importer {
    fn default() -> Self {
        Self {
            registry: SchemaRegistry::with_builtin_banks(),
            rules: CategoryRules::default(),
            // One kobo. Anything beyond rounding noise earns a warning.
            balance_tolerance: Decimal::new(1, 2),
        }
    }
}

impl Importer {
    pub fn new(registry: SchemaRegistry, rules: CategoryRules, balance_tolerance: Decimal) -> Self {
        Self {
            registry,
            rules,
            balance_tolerance,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Registration entry point for banks not built in.
    pub fn registry_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.registry
    }

    /// Run one complete import. Document-level failures abort with an error;
    /// malformed rows are collected in the result and never stop the run.
    pub fn import(
        &self,
        bytes: &[u8],
        bank: BankName,
        format: SourceFormat,
        password: Option<&str>,
    ) -> Result<ImportResult> {
        let schema = self.registry.schema_for(bank)?;
        if !schema.supports(format) {
            return Err(ImportError::UnsupportedFormat { bank, format });
        }

        let extraction = extractor::extract(bytes, format, schema, password)?;
        let mut errors = extraction.errors;

        let mut normalized: Vec<NormalizedRow> = Vec::with_capacity(extraction.rows.len());
        for row in &extraction.rows {
            match normalizer::normalize(row, schema) {
                Ok(n) => normalized.push(n),
                Err(e) => {
                    tracing::warn!(position = e.position, kind = %e.kind, "row rejected");
                    errors.push(e);
                }
            }
        }

        for n in &mut normalized {
            n.transaction.category = self
                .rules
                .categorize(n.transaction.amount, &n.transaction.description);
        }

        let warnings = balance_warnings(&normalized, self.balance_tolerance);

        let mut transactions: Vec<CanonicalTransaction> =
            normalized.into_iter().map(|n| n.transaction).collect();
        flag_duplicates(&mut transactions);

        // Extraction and normalization errors interleave; restore source order.
        errors.sort_by_key(|e| e.position);

        tracing::debug!(
            bank = %bank,
            transactions = transactions.len(),
            errors = errors.len(),
            warnings = warnings.len(),
            "import complete"
        );
        Ok(ImportResult {
            transactions,
            errors,
            warnings,
        })
    }
}

/// Compare each consecutive balance delta against the row's stated amount.
/// The balance column is advisory: mismatches warn, never fail.
fn balance_warnings(rows: &[NormalizedRow], tolerance: Decimal) -> Vec<BalanceWarning> {
    let mut warnings = Vec::new();
    let mut prev: Option<Decimal> = None;
    for row in rows {
        let Some(balance) = row.balance else { continue };
        if let Some(prev_balance) = prev {
            let actual = balance - prev_balance;
            let expected = row.transaction.amount;
            if (actual - expected).abs() > tolerance {
                warnings.push(BalanceWarning {
                    position: row.transaction.position,
                    expected_delta: expected,
                    actual_delta: actual,
                });
            }
        }
        prev = Some(balance);
    }
    warnings
}

/// Flag all but the first member of every (date, description, amount, bank)
/// group. Duplicates stay in the output; dropping them is the caller's call.
fn flag_duplicates(transactions: &mut [CanonicalTransaction]) {
    let mut seen: HashMap<(NaiveDate, String, Decimal, BankName), bool> = HashMap::new();
    for txn in transactions {
        let key = (
            txn.date,
            txn.description.to_lowercase(),
            txn.amount,
            txn.bank,
        );
        if seen.insert(key, true).is_some() {
            txn.duplicate = true;
        }
    }
}
