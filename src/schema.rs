use std::collections::HashMap;

use crate::error::{ImportError, Result};
use crate::models::{BankName, SourceFormat};

/// Role a column plays in a bank's statement layout. Columns the pipeline has
/// no use for (value dates, branch names, references) still get a role so the
/// layout's column count is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Date,
    Description,
    Debit,
    Credit,
    /// Single signed-amount column; mutually exclusive with Debit/Credit.
    Amount,
    Balance,
    ValueDate,
    Reference,
    Branch,
}

/// Date format family a bank prints. Resolution lives in [`crate::dates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// Numeric day/month/year: 31/12/2024, 31-12-2024, and ISO 2024-12-31.
    DayMonthYear,
    /// Day, three-letter month abbreviation, year: 01-Dec-2024, 01 Dec 2024.
    DayMonthAbbrYear,
}

/// Immutable per-bank structural description. Registered once at process
/// start; extraction and normalization are parameterized by these fields and
/// carry no per-bank code of their own.
#[derive(Debug, Clone)]
pub struct BankSchema {
    pub bank: BankName,
    pub formats: Vec<SourceFormat>,
    /// Ordered column roles, one per physical column.
    pub columns: Vec<ColumnRole>,
    pub date_format: DateFormat,
    pub delimiter: u8,
    /// Rows to drop from the top of a CSV before data begins.
    pub header_rows: usize,
    /// Rows to drop from the bottom of a CSV (totals, footers).
    pub footer_rows: usize,
    /// Whether this bank issues password-protected PDF statements.
    pub password_protected: bool,
}

impl BankSchema {
    pub fn supports(&self, format: SourceFormat) -> bool {
        self.formats.contains(&format)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the first column with the given role.
    pub fn column(&self, role: ColumnRole) -> Option<usize> {
        self.columns.iter().position(|&r| r == role)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.column(ColumnRole::Date).is_none() {
            return Err("no date column".into());
        }
        if self.column(ColumnRole::Description).is_none() {
            return Err("no description column".into());
        }
        let has_debit = self.column(ColumnRole::Debit).is_some();
        let has_credit = self.column(ColumnRole::Credit).is_some();
        let has_single = self.column(ColumnRole::Amount).is_some();
        if has_single {
            if has_debit || has_credit {
                return Err("both debit/credit and amount columns declared".into());
            }
            return Ok(());
        }
        match (has_debit, has_credit) {
            (true, true) => Ok(()),
            (true, false) => Err("debit column without a credit column".into()),
            (false, true) => Err("credit column without a debit column".into()),
            (false, false) => Err("no amount columns declared".into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Process-wide table of bank schemas. Read-mostly after startup; adding a new
/// bank means registering a schema here, never touching the pipeline.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<BankName, BankSchema>,
}

impl SchemaRegistry {
    pub fn empty() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Registry pre-loaded with every bank layout this crate knows.
    pub fn with_builtin_banks() -> Self {
        let mut registry = Self::empty();
        for schema in builtin_schemas() {
            registry
                .register(schema)
                .expect("built-in schemas are disjoint and well-formed");
        }
        registry
    }

    pub fn register(&mut self, schema: BankSchema) -> Result<()> {
        schema.validate().map_err(|reason| ImportError::InvalidSchema {
            bank: schema.bank,
            reason,
        })?;
        if self.schemas.contains_key(&schema.bank) {
            return Err(ImportError::DuplicateSchema(schema.bank));
        }
        self.schemas.insert(schema.bank, schema);
        Ok(())
    }

    pub fn schema_for(&self, bank: BankName) -> Result<&BankSchema> {
        self.schemas
            .get(&bank)
            .ok_or(ImportError::UnsupportedBank(bank))
    }

    pub fn banks(&self) -> impl Iterator<Item = BankName> + '_ {
        self.schemas.keys().copied()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_builtin_banks()
    }
}

// ---------------------------------------------------------------------------
// Built-in Nigerian bank layouts
// ---------------------------------------------------------------------------

fn debit_credit_csv(bank: BankName) -> BankSchema {
    BankSchema {
        bank,
        formats: vec![SourceFormat::Csv],
        columns: vec![
            ColumnRole::Date,
            ColumnRole::Description,
            ColumnRole::Debit,
            ColumnRole::Credit,
            ColumnRole::Balance,
        ],
        date_format: DateFormat::DayMonthYear,
        delimiter: b',',
        header_rows: 1,
        footer_rows: 0,
        password_protected: false,
    }
}

fn builtin_schemas() -> Vec<BankSchema> {
    let mut schemas = vec![
        // Zenith: DATE, DESCRIPTION, DEBIT, CREDIT, VALUE DATE, BALANCE.
        BankSchema {
            bank: BankName::Zenith,
            formats: vec![SourceFormat::Csv, SourceFormat::Pdf],
            columns: vec![
                ColumnRole::Date,
                ColumnRole::Description,
                ColumnRole::Debit,
                ColumnRole::Credit,
                ColumnRole::ValueDate,
                ColumnRole::Balance,
            ],
            date_format: DateFormat::DayMonthYear,
            delimiter: b',',
            header_rows: 1,
            footer_rows: 0,
            password_protected: false,
        },
        // GTBank: Trans. Date, Value Date, Reference, Debits, Credits,
        // Balance, Originating Branch, Remarks. PDFs ship encrypted.
        BankSchema {
            bank: BankName::GtBank,
            formats: vec![SourceFormat::Csv, SourceFormat::Pdf],
            columns: vec![
                ColumnRole::Date,
                ColumnRole::ValueDate,
                ColumnRole::Reference,
                ColumnRole::Debit,
                ColumnRole::Credit,
                ColumnRole::Balance,
                ColumnRole::Branch,
                ColumnRole::Description,
            ],
            date_format: DateFormat::DayMonthAbbrYear,
            delimiter: b',',
            header_rows: 1,
            footer_rows: 0,
            password_protected: true,
        },
        // Generic export: Transaction Date, Narration, Amount, Running Balance.
        BankSchema {
            bank: BankName::Other,
            formats: vec![SourceFormat::Csv],
            columns: vec![
                ColumnRole::Date,
                ColumnRole::Description,
                ColumnRole::Amount,
                ColumnRole::Balance,
            ],
            date_format: DateFormat::DayMonthYear,
            delimiter: b',',
            header_rows: 1,
            footer_rows: 0,
            password_protected: false,
        },
    ];
    for bank in [
        BankName::Access,
        BankName::Uba,
        BankName::FirstBank,
        BankName::Fcmb,
        BankName::Fidelity,
        BankName::Sterling,
        BankName::Wema,
        BankName::StanbicIbtc,
    ] {
        schemas.push(debit_credit_csv(bank));
    }
    schemas
}
