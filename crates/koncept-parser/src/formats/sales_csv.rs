use tracing::debug;

use crate::decode::decode_text;
use crate::errors::ParserError;
use crate::model::RawTable;

use super::schema::classify_sales_header;
use super::{build_frame, is_missing, read_records, text_column, unique_column_names};

pub struct SalesCsvParser;

impl SalesCsvParser {
    const NAME: &'static str = "SALES_CSV";

    fn column_names(header: &csv::StringRecord) -> Vec<String> {
        let names = header.iter().map(|cell| match classify_sales_header(cell) {
            Some(column) => column.canonical_name().to_string(),
            None => cell.trim().to_string(),
        });
        unique_column_names(names)
    }

    /// Missing cells take the literal `0`, whatever the column.
    fn zero_fill(value: &str) -> String {
        if is_missing(value) {
            "0".to_string()
        } else {
            value.to_string()
        }
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<RawTable, ParserError> {
        let decoded = decode_text(bytes);
        let (header, records) = read_records(Self::NAME, &decoded.text)?;

        if header.is_empty() || records.is_empty() {
            return Err(ParserError::EmptyData { format: Self::NAME });
        }

        let names = Self::column_names(&header);
        let mut values: Vec<Vec<String>> = names
            .iter()
            .map(|_| Vec::with_capacity(records.len()))
            .collect();

        for record in &records {
            for (idx, column) in values.iter_mut().enumerate() {
                column.push(Self::zero_fill(record.get(idx).unwrap_or("")));
            }
        }

        let columns = names
            .iter()
            .zip(values)
            .map(|(name, data)| text_column(name, data))
            .collect();
        let df = build_frame(Self::NAME, columns)?;

        debug!(
            rows = df.height(),
            columns = df.width(),
            encoding = %decoded.encoding,
            "parsed sales upload"
        );

        Ok(RawTable {
            encoding: decoded.encoding,
            df,
        })
    }
}

pub fn parse_sales_csv(bytes: &[u8]) -> Result<RawTable, ParserError> {
    SalesCsvParser.parse(bytes)
}
