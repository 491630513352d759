use lopdf::Document;
use regex::Regex;
use rust_decimal::Decimal;

use crate::amount::parse_amount;
use crate::error::{ImportError, Result};
use crate::models::{RawRow, RowError, RowErrorKind, SourceFormat};
use crate::schema::{BankSchema, ColumnRole, DateFormat};

/// Raw rows pulled out of one document, in original statement order, plus the
/// rows that could not be shaped into the schema's column layout.
#[derive(Debug, Default)]
pub struct Extraction {
    pub rows: Vec<RawRow>,
    pub errors: Vec<RowError>,
}

/// Extract ordered raw rows from a statement document. Document-level
/// problems (undecodable bytes, missing or wrong password) are fatal;
/// individually malformed rows are collected in the returned
/// [`Extraction::errors`].
pub fn extract(
    bytes: &[u8],
    format: SourceFormat,
    schema: &BankSchema,
    password: Option<&str>,
) -> Result<Extraction> {
    match format {
        SourceFormat::Csv => extract_csv(bytes, schema),
        SourceFormat::Pdf => extract_pdf(bytes, schema, password),
    }
}

fn row_error(position: usize, raw: &str, kind: RowErrorKind, message: String) -> RowError {
    RowError {
        position,
        raw: raw.to_string(),
        kind,
        message,
    }
}

// ---------------------------------------------------------------------------
// CSV extraction
// ---------------------------------------------------------------------------

fn extract_csv(bytes: &[u8], schema: &BankSchema) -> Result<Extraction> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ImportError::CorruptDocument(format!("not valid UTF-8: {e}")))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(schema.delimiter)
        .from_reader(text.as_bytes());

    // Materialize everything first so footer rows can be dropped from the end.
    // Positions are physical line numbers, not record indices: the reader
    // skips blank lines, and reported positions must still line up with what
    // the user sees in the file.
    let mut records: Vec<(usize, std::result::Result<Vec<String>, csv::Error>)> = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = match &result {
            Ok(rec) => rec.position().map(|p| p.line() as usize),
            Err(e) => e.position().map(|p| p.line() as usize),
        };
        records.push((
            line.unwrap_or(i + 1),
            result.map(|rec| rec.iter().map(|f| f.to_string()).collect()),
        ));
    }

    let body_end = records.len().saturating_sub(schema.footer_rows);
    let mut extraction = Extraction::default();

    for (position, result) in records.drain(..).take(body_end).skip(schema.header_rows) {
        let fields = match result {
            Ok(fields) => fields,
            Err(e) => {
                extraction.errors.push(row_error(
                    position,
                    "",
                    RowErrorKind::MalformedRow,
                    e.to_string(),
                ));
                continue;
            }
        };
        if fields.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if fields.len() != schema.column_count() {
            extraction.errors.push(row_error(
                position,
                &fields.join(" | "),
                RowErrorKind::ColumnCountMismatch,
                format!(
                    "expected {} columns, found {}",
                    schema.column_count(),
                    fields.len()
                ),
            ));
            continue;
        }
        extraction.rows.push(RawRow::new(position, fields));
    }

    Ok(extraction)
}

// ---------------------------------------------------------------------------
// PDF extraction
// ---------------------------------------------------------------------------

fn extract_pdf(bytes: &[u8], schema: &BankSchema, password: Option<&str>) -> Result<Extraction> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|e| ImportError::CorruptDocument(e.to_string()))?;

    let encrypted = doc.is_encrypted();
    if schema.password_protected || encrypted {
        let password = password
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                ImportError::InvalidPassword(format!(
                    "{} statements require a password",
                    schema.bank
                ))
            })?;
        if encrypted {
            doc.decrypt(password).map_err(|_| {
                ImportError::InvalidPassword(
                    "the supplied password does not unlock this document".into(),
                )
            })?;
        }
    }

    // Page numbers come back ordered, so chronological row order is preserved
    // across page boundaries.
    let mut pages = Vec::new();
    for (number, _) in doc.get_pages() {
        let text = doc
            .extract_text(&[number])
            .map_err(|e| ImportError::CorruptDocument(e.to_string()))?;
        pages.push(text);
    }
    // Decrypted handle released here, before any row-level work.
    drop(doc);

    tracing::debug!(bank = %schema.bank, pages = pages.len(), "extracted pdf text");
    Ok(reconstruct_rows(&pages, schema))
}

fn date_token_pattern(format: DateFormat) -> &'static str {
    match format {
        DateFormat::DayMonthYear => r"^\d{1,2}[/-]\d{1,2}[/-]\d{4}$",
        DateFormat::DayMonthAbbrYear => r"^\d{1,2}[- ][A-Za-z]{3}[- ]\d{4}$",
    }
}

fn is_noise_line(line: &str) -> bool {
    let l = line.to_lowercase();
    (l.contains("debit") && l.contains("credit"))
        || l.contains("opening balance")
        || l.contains("closing balance")
        || l.contains("totals")
        || l.contains("statement period")
        || l.contains("account no")
        || l.contains("account type")
        || l.contains("branch name")
        || l.contains("internal reference")
}

/// Rebuild schema-shaped rows from flat page text. A line opening with a date
/// token starts a transaction; following non-noise lines without one extend
/// its description, mirroring how statement printers wrap long narrations.
fn reconstruct_rows(pages: &[String], schema: &BankSchema) -> Extraction {
    let date_re =
        Regex::new(date_token_pattern(schema.date_format)).expect("date token pattern compiles");
    let amount_re = Regex::new(r"^\(?-?[\d,]+\.\d{2}\)?$").expect("amount token pattern compiles");
    let desc_idx = schema
        .column(ColumnRole::Description)
        .expect("schema validated at registration");

    let mut extraction = Extraction::default();
    let mut current: Option<RawRow> = None;
    let mut prev_balance: Option<Decimal> = None;
    let mut position = 0usize;

    for page in pages {
        for raw_line in page.lines() {
            position += 1;
            let line = raw_line.split_whitespace().collect::<Vec<_>>().join(" ");
            if line.is_empty() {
                continue;
            }
            if is_noise_line(&line) {
                // The opening balance row seeds the debit/credit
                // disambiguator for the first transaction.
                if line.to_lowercase().contains("opening balance") {
                    if let Some(balance) = trailing_amount(&line, &amount_re) {
                        prev_balance = Some(balance);
                    }
                }
                continue;
            }

            let starts_transaction = line
                .split_whitespace()
                .next()
                .is_some_and(|tok| date_re.is_match(tok));

            if starts_transaction {
                if let Some(done) = current.take() {
                    extraction.rows.push(done);
                }
                match parse_statement_line(&line, position, schema, &date_re, &amount_re, prev_balance)
                {
                    Ok((row, balance)) => {
                        if balance.is_some() {
                            prev_balance = balance;
                        }
                        current = Some(row);
                    }
                    Err(err) => extraction.errors.push(err),
                }
            } else if let Some(cur) = current.as_mut() {
                let desc = &mut cur.fields[desc_idx];
                if !desc.is_empty() {
                    desc.push(' ');
                }
                desc.push_str(&line);
            }
        }
    }
    if let Some(done) = current.take() {
        extraction.rows.push(done);
    }
    extraction
}

fn trailing_amount(line: &str, amount_re: &Regex) -> Option<Decimal> {
    line.split_whitespace()
        .rev()
        .find(|tok| amount_re.is_match(tok))
        .and_then(|tok| parse_amount(tok).ok())
}

/// Shape one anchored text line into the schema's column layout. The schema's
/// column order drives everything; the only two textual arrangements printed
/// by the known banks are free text in the middle (Zenith) or trailing free
/// text (GTBank remarks).
fn parse_statement_line(
    line: &str,
    position: usize,
    schema: &BankSchema,
    date_re: &Regex,
    amount_re: &Regex,
    prev_balance: Option<Decimal>,
) -> std::result::Result<(RawRow, Option<Decimal>), RowError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let desc_idx = schema
        .column(ColumnRole::Description)
        .expect("schema validated at registration");
    let malformed = |message: String| row_error(position, line, RowErrorKind::MalformedRow, message);

    let mut fields = vec![String::new(); schema.column_count()];
    let mut balance_reading = None;

    if desc_idx + 1 == schema.column_count() {
        // Fixed leading columns, free text at the end.
        let mut cursor = 0usize;
        for (i, role) in schema.columns.iter().enumerate() {
            match role {
                ColumnRole::Date | ColumnRole::ValueDate => {
                    let tok = tokens
                        .get(cursor)
                        .filter(|t| date_re.is_match(t))
                        .ok_or_else(|| malformed("expected a date column".into()))?;
                    fields[i] = tok.to_string();
                    cursor += 1;
                }
                ColumnRole::Reference | ColumnRole::Branch => {
                    let tok = tokens
                        .get(cursor)
                        .ok_or_else(|| malformed("line ends before all columns".into()))?;
                    fields[i] = tok.to_string();
                    cursor += 1;
                }
                ColumnRole::Debit | ColumnRole::Amount => {
                    let run_len = tokens[cursor..]
                        .iter()
                        .take_while(|t| amount_re.is_match(t))
                        .count();
                    balance_reading = place_amounts(
                        &tokens[cursor..cursor + run_len],
                        schema,
                        prev_balance,
                        &mut fields,
                    )
                    .map_err(&malformed)?;
                    cursor += run_len;
                }
                // Consumed together with the amount run.
                ColumnRole::Credit | ColumnRole::Balance => {}
                ColumnRole::Description => {
                    fields[i] = tokens[cursor.min(tokens.len())..].join(" ");
                }
            }
        }
    } else {
        // Date first, free text in the middle, numeric tail. Consume the tail
        // in reverse column order down to the description.
        let date_idx = schema
            .column(ColumnRole::Date)
            .expect("schema validated at registration");
        fields[date_idx] = tokens[0].to_string();

        let mut end = tokens.len();
        let mut tail_roles: Vec<(usize, ColumnRole)> = schema
            .columns
            .iter()
            .enumerate()
            .skip(desc_idx + 1)
            .map(|(i, &r)| (i, r))
            .collect();
        tail_roles.reverse();

        let mut amounts_pending = false;
        for (i, role) in tail_roles {
            match role {
                ColumnRole::Balance | ColumnRole::Amount => {
                    let tok = tokens
                        .get(end.wrapping_sub(1))
                        .filter(|t| amount_re.is_match(t))
                        .ok_or_else(|| malformed(format!("expected a numeric {role:?} column")))?;
                    fields[i] = tok.to_string();
                    end -= 1;
                }
                ColumnRole::ValueDate => {
                    let tok = tokens
                        .get(end.wrapping_sub(1))
                        .filter(|t| date_re.is_match(t))
                        .ok_or_else(|| malformed("expected a value date column".into()))?;
                    fields[i] = tok.to_string();
                    end -= 1;
                }
                ColumnRole::Reference | ColumnRole::Branch => {
                    if end <= 1 {
                        return Err(malformed("line ends before all columns".into()));
                    }
                    fields[i] = tokens[end - 1].to_string();
                    end -= 1;
                }
                ColumnRole::Credit => {
                    // The debit/credit run sits just before the consumed
                    // tail. Replay the balance token so the run carries the
                    // delta needed to pick the side.
                    let run_start = (1..end)
                        .rev()
                        .take_while(|&j| amount_re.is_match(tokens[j]))
                        .last()
                        .unwrap_or(end);
                    let balance_token = fields_balance_token(&fields, schema).to_string();
                    let mut run: Vec<&str> = tokens[run_start.min(end)..end].to_vec();
                    run.push(&balance_token);
                    balance_reading = place_amounts(&run, schema, prev_balance, &mut fields)
                        .map_err(&malformed)?;
                    end = run_start.min(end);
                    amounts_pending = true;
                }
                ColumnRole::Debit => {
                    if !amounts_pending {
                        return Err(malformed("no debit/credit columns found".into()));
                    }
                }
                ColumnRole::Date | ColumnRole::Description => {}
            }
        }

        if end < 1 {
            return Err(malformed("line ends before all columns".into()));
        }
        fields[desc_idx] = tokens[1..end].join(" ");
    }

    Ok((RawRow::new(position, fields), balance_reading))
}

fn fields_balance_token<'a>(fields: &'a [String], schema: &BankSchema) -> &'a str {
    schema
        .column(ColumnRole::Balance)
        .map(|i| fields[i].as_str())
        .unwrap_or("")
}

/// Place a run of amount tokens into the debit/credit (or single amount) and
/// balance columns. With one amount and a balance, the side is decided by the
/// balance delta; without a prior balance reading the side is undecidable and
/// the row is rejected rather than guessed.
fn place_amounts(
    run: &[&str],
    schema: &BankSchema,
    prev_balance: Option<Decimal>,
    fields: &mut [String],
) -> std::result::Result<Option<Decimal>, String> {
    let balance_idx = schema.column(ColumnRole::Balance);

    if let Some(amount_idx) = schema.column(ColumnRole::Amount) {
        return match run {
            [amount] => {
                fields[amount_idx] = amount.to_string();
                Ok(None)
            }
            [amount, balance] => {
                fields[amount_idx] = amount.to_string();
                if let Some(i) = balance_idx {
                    fields[i] = balance.to_string();
                }
                Ok(parse_amount(balance).ok())
            }
            _ => Err("expected amount and balance columns".into()),
        };
    }

    let debit_idx = schema
        .column(ColumnRole::Debit)
        .expect("schema validated at registration");
    let credit_idx = schema
        .column(ColumnRole::Credit)
        .expect("schema validated at registration");

    match run {
        [debit, credit, balance] => {
            fields[debit_idx] = debit.to_string();
            fields[credit_idx] = credit.to_string();
            if let Some(i) = balance_idx {
                fields[i] = balance.to_string();
            }
            Ok(parse_amount(balance).ok())
        }
        [amount, balance] => {
            let balance_value =
                parse_amount(balance).map_err(|_| "unreadable balance".to_string())?;
            let amount_value =
                parse_amount(amount).map_err(|_| "unreadable amount".to_string())?;
            let is_debit = if amount_value.is_sign_negative() {
                true
            } else if let Some(prev) = prev_balance {
                balance_value < prev
            } else {
                return Err(
                    "cannot tell debit from credit without a prior balance reading".into(),
                );
            };
            if is_debit {
                fields[debit_idx] = amount.to_string();
            } else {
                fields[credit_idx] = amount.to_string();
            }
            if let Some(i) = balance_idx {
                fields[i] = balance.to_string();
            }
            Ok(Some(balance_value))
        }
        _ => Err(format!(
            "expected 2 or 3 numeric columns, found {}",
            run.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BankName;
    use crate::schema::SchemaRegistry;
    use rust_decimal_macros::dec;

    fn schema(bank: BankName) -> BankSchema {
        SchemaRegistry::with_builtin_banks()
            .schema_for(bank)
            .unwrap()
            .clone()
    }

    // -- CSV ---------------------------------------------------------------

    #[test]
    fn test_csv_rows_in_source_order() {
        let csv = "\
DATE,DESCRIPTION,DEBIT,CREDIT,VALUE DATE,BALANCE
02/01/2024,POS PURCHASE,5000.00,,02/01/2024,95000.00
03/01/2024,TRANSFER FROM ACME,,25000.00,03/01/2024,120000.00
";
        let extraction = extract(
            csv.as_bytes(),
            SourceFormat::Csv,
            &schema(BankName::Zenith),
            None,
        )
        .unwrap();
        assert!(extraction.errors.is_empty());
        assert_eq!(extraction.rows.len(), 2);
        assert_eq!(extraction.rows[0].position, 2);
        assert_eq!(extraction.rows[0].fields[1], "POS PURCHASE");
        assert_eq!(extraction.rows[1].position, 3);
    }

    #[test]
    fn test_csv_column_count_mismatch_is_isolated() {
        let csv = "\
DATE,DESCRIPTION,DEBIT,CREDIT,VALUE DATE,BALANCE
02/01/2024,POS PURCHASE,5000.00,,02/01/2024,95000.00
03/01/2024,SHORT ROW,100.00
04/01/2024,TRANSFER,,25000.00,04/01/2024,120000.00
";
        let extraction = extract(
            csv.as_bytes(),
            SourceFormat::Csv,
            &schema(BankName::Zenith),
            None,
        )
        .unwrap();
        assert_eq!(extraction.rows.len(), 2);
        assert_eq!(extraction.errors.len(), 1);
        assert_eq!(extraction.errors[0].kind, RowErrorKind::ColumnCountMismatch);
        assert_eq!(extraction.errors[0].position, 3);
    }

    #[test]
    fn test_csv_blank_rows_and_footer_skip() {
        let csv = "\
DATE,DESCRIPTION,DEBIT,CREDIT,BALANCE
02/01/2024,AIRTIME,500.00,,99500.00
,,,,
TOTALS,,500.00,0.00,
";
        let mut sch = schema(BankName::Access);
        sch.footer_rows = 1;
        let extraction = extract(csv.as_bytes(), SourceFormat::Csv, &sch, None).unwrap();
        assert_eq!(extraction.rows.len(), 1);
        assert!(extraction.errors.is_empty());
    }

    #[test]
    fn test_csv_positions_survive_blank_lines() {
        // The reader drops blank lines entirely; positions must still match
        // the physical line numbers a user would count in the file.
        let csv = "\
DATE,DESCRIPTION,DEBIT,CREDIT,VALUE DATE,BALANCE

02/01/2024,POS PURCHASE,5000.00,,02/01/2024,95000.00
03/01/2024,SHORT ROW,100.00
";
        let extraction = extract(
            csv.as_bytes(),
            SourceFormat::Csv,
            &schema(BankName::Zenith),
            None,
        )
        .unwrap();
        assert_eq!(extraction.rows.len(), 1);
        assert_eq!(extraction.rows[0].position, 3);
        assert_eq!(extraction.errors.len(), 1);
        assert_eq!(extraction.errors[0].position, 4);
    }

    #[test]
    fn test_csv_invalid_utf8_is_a_corrupt_document() {
        let err = extract(
            &[0xff, 0xfe, 0x00],
            SourceFormat::Csv,
            &schema(BankName::Zenith),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::CorruptDocument(_)));
    }

    // -- PDF row reconstruction (page text level) --------------------------

    fn reconstruct(pages: &[&str], bank: BankName) -> Extraction {
        let pages: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
        reconstruct_rows(&pages, &schema(bank))
    }

    #[test]
    fn test_zenith_page_reconstruction() {
        let page = "\
Zenith Bank Plc
Statement of Account
DATE DESCRIPTION DEBIT CREDIT VALUE DATE BALANCE
Opening Balance 100,000.00
02/01/2024 POS PURCHASE SHOPRITE 5,000.00 02/01/2024 95,000.00
03/01/2024 NIP TRANSFER FROM ACME LTD 25,000.00 03/01/2024 120,000.00
";
        let extraction = reconstruct(&[page], BankName::Zenith);
        assert!(extraction.errors.is_empty(), "{:?}", extraction.errors);
        assert_eq!(extraction.rows.len(), 2);

        let first = &extraction.rows[0];
        assert_eq!(first.fields[0], "02/01/2024");
        assert_eq!(first.fields[1], "POS PURCHASE SHOPRITE");
        // Balance fell, so the single amount is a debit.
        assert_eq!(first.fields[2], "5,000.00");
        assert_eq!(first.fields[3], "");
        assert_eq!(first.fields[5], "95,000.00");

        let second = &extraction.rows[1];
        // Balance rose, so this one is a credit.
        assert_eq!(second.fields[2], "");
        assert_eq!(second.fields[3], "25,000.00");
    }

    #[test]
    fn test_continuation_lines_extend_description() {
        let page = "\
DATE DESCRIPTION DEBIT CREDIT VALUE DATE BALANCE
Opening Balance 100,000.00
02/01/2024 TRANSFER TO 5,000.00 02/01/2024 95,000.00
OLUWASEUN ADEYEMI
REF 00012345
";
        let extraction = reconstruct(&[page], BankName::Zenith);
        assert_eq!(extraction.rows.len(), 1);
        assert_eq!(
            extraction.rows[0].fields[1],
            "TRANSFER TO OLUWASEUN ADEYEMI REF 00012345"
        );
    }

    #[test]
    fn test_rows_concatenate_across_pages_in_order() {
        let page1 = "\
Opening Balance 50,000.00
02/01/2024 FIRST 1,000.00 02/01/2024 49,000.00
";
        let page2 = "03/01/2024 SECOND 2,000.00 03/01/2024 51,000.00\n";
        let extraction = reconstruct(&[page1, page2], BankName::Zenith);
        assert_eq!(extraction.rows.len(), 2);
        assert_eq!(extraction.rows[0].fields[1], "FIRST");
        assert_eq!(extraction.rows[1].fields[1], "SECOND");
        // Delta carried across the page break: 49,000 -> 51,000 is a credit.
        assert_eq!(extraction.rows[1].fields[3], "2,000.00");
    }

    #[test]
    fn test_gtbank_remarks_and_geometry() {
        let page = "\
Trans. Date Value Date Reference Debits Credits Balance Originating Branch Remarks
Opening Balance 200,000.00
02-Jan-2024 02-Jan-2024 REF001 15,000.00 185,000.00 IKEJA USSD AIRTIME PURCHASE
03-Jan-2024 03-Jan-2024 REF002 40,000.00 225,000.00 IKEJA NIP INWARD ACME LTD
";
        let extraction = reconstruct(&[page], BankName::GtBank);
        assert!(extraction.errors.is_empty(), "{:?}", extraction.errors);
        assert_eq!(extraction.rows.len(), 2);

        let first = &extraction.rows[0];
        assert_eq!(first.fields[0], "02-Jan-2024");
        assert_eq!(first.fields[2], "REF001");
        assert_eq!(first.fields[3], "15,000.00"); // debit: balance fell
        assert_eq!(first.fields[4], "");
        assert_eq!(first.fields[7], "USSD AIRTIME PURCHASE");

        let second = &extraction.rows[1];
        assert_eq!(second.fields[3], "");
        assert_eq!(second.fields[4], "40,000.00"); // credit: balance rose
        assert_eq!(second.fields[7], "NIP INWARD ACME LTD");
    }

    #[test]
    fn test_first_row_without_prior_balance_is_rejected_not_guessed() {
        let page = "02/01/2024 MYSTERY MOVEMENT 5,000.00 02/01/2024 95,000.00\n";
        let extraction = reconstruct(&[page], BankName::Zenith);
        assert!(extraction.rows.is_empty());
        assert_eq!(extraction.errors.len(), 1);
        assert_eq!(extraction.errors[0].kind, RowErrorKind::MalformedRow);
    }

    #[test]
    fn test_noise_lines_are_skipped() {
        let page = "\
Account No: 1234567890
Statement Period: 01/01/2024 - 31/01/2024
Opening Balance 10,000.00
02/01/2024 LEVY 50.00 02/01/2024 9,950.00
Totals 50.00 0.00
";
        let extraction = reconstruct(&[page], BankName::Zenith);
        assert_eq!(extraction.rows.len(), 1);
        assert!(extraction.errors.is_empty());
    }

    // -- PDF document level ------------------------------------------------

    fn minimal_pdf() -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal("Statement of Account")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_corrupt_pdf_bytes_are_fatal() {
        let err = extract(
            b"definitely not a pdf",
            SourceFormat::Pdf,
            &schema(BankName::Zenith),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::CorruptDocument(_)));
    }

    #[test]
    fn test_password_required_when_schema_says_so() {
        let bytes = minimal_pdf();
        let err = extract(&bytes, SourceFormat::Pdf, &schema(BankName::GtBank), None).unwrap_err();
        assert!(matches!(err, ImportError::InvalidPassword(_)));

        // Blank passwords do not count as supplied.
        let err = extract(
            &bytes,
            SourceFormat::Pdf,
            &schema(BankName::GtBank),
            Some("   "),
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::InvalidPassword(_)));
    }

    // RC4-encrypted single-page statement, user password "gtb-2024".
    const ENCRYPTED_PDF: &[u8] = include_bytes!("../tests/fixtures/encrypted_statement.pdf");

    #[test]
    fn test_wrong_password_is_rejected_with_no_rows() {
        let err = extract(
            ENCRYPTED_PDF,
            SourceFormat::Pdf,
            &schema(BankName::GtBank),
            Some("letmein"),
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::InvalidPassword(_)));
    }

    #[test]
    fn test_correct_password_unlocks_the_document() {
        let extraction = extract(
            ENCRYPTED_PDF,
            SourceFormat::Pdf,
            &schema(BankName::GtBank),
            Some("gtb-2024"),
        )
        .unwrap();
        // The fixture carries no transaction lines; decryption itself is the
        // point.
        assert!(extraction.rows.is_empty());
        assert!(extraction.errors.is_empty());
    }

    #[test]
    fn test_pdf_without_transaction_lines_yields_no_rows() {
        let bytes = minimal_pdf();
        let extraction =
            extract(&bytes, SourceFormat::Pdf, &schema(BankName::Zenith), None).unwrap();
        assert!(extraction.rows.is_empty());
        assert!(extraction.errors.is_empty());
    }

    #[test]
    fn test_trailing_amount_helper() {
        let re = Regex::new(r"^\(?-?[\d,]+\.\d{2}\)?$").unwrap();
        assert_eq!(
            trailing_amount("Opening Balance 100,000.00", &re),
            Some(dec!(100000.00))
        );
        assert_eq!(trailing_amount("Opening Balance", &re), None);
    }
}
