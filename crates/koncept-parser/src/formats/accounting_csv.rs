use crate::decode::decode_text;
use crate::errors::ParserError;
use crate::model::AccountingEntries;

use super::schema::ACCOUNTING_COLUMNS;
use super::{build_frame, is_missing, parse_number, read_records, text_column};
use polars::prelude::*;

pub struct AccountingCsvParser;

impl AccountingCsvParser {
    const NAME: &'static str = "ACCOUNTING_CSV";

    pub fn parse(&self, bytes: &[u8]) -> Result<AccountingEntries, ParserError> {
        let decoded = decode_text(bytes);
        let (header, records) = read_records(Self::NAME, &decoded.text)?;

        if header.is_empty() {
            return Err(ParserError::EmptyData { format: Self::NAME });
        }
        if header.len() != ACCOUNTING_COLUMNS.len() {
            return Err(ParserError::ColumnCount {
                format: Self::NAME,
                expected: ACCOUNTING_COLUMNS.len(),
                found: header.len(),
            });
        }
        if records.is_empty() {
            return Err(ParserError::EmptyData { format: Self::NAME });
        }

        let mut accounts = Vec::with_capacity(records.len());
        let mut concepts = Vec::with_capacity(records.len());
        let mut amounts = Vec::with_capacity(records.len());
        let mut dropped_rows = 0usize;

        for record in &records {
            let (Some(account), Some(concept), Some(amount)) =
                (record.get(0), record.get(1), record.get(2))
            else {
                dropped_rows += 1;
                continue;
            };
            if is_missing(account) || is_missing(concept) || is_missing(amount) {
                dropped_rows += 1;
                continue;
            }
            let Some(amount) = parse_number(amount) else {
                dropped_rows += 1;
                continue;
            };

            accounts.push(account.to_string());
            concepts.push(concept.to_string());
            amounts.push(amount);
        }

        let df = build_frame(
            Self::NAME,
            vec![
                text_column(ACCOUNTING_COLUMNS[0], accounts),
                text_column(ACCOUNTING_COLUMNS[1], concepts),
                Series::new(ACCOUNTING_COLUMNS[2].into(), amounts).into(),
            ],
        )?;

        Ok(AccountingEntries {
            encoding: decoded.encoding,
            df,
            dropped_rows,
        })
    }
}

pub fn parse_accounting_csv(bytes: &[u8]) -> Result<AccountingEntries, ParserError> {
    AccountingCsvParser.parse(bytes)
}
