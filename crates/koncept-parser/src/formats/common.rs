use std::collections::HashSet;

use csv::StringRecord;
use polars::prelude::*;

use crate::errors::ParserError;

/// Cell values read as missing, matching the markers common spreadsheet exports emit.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

pub(crate) fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

pub(crate) fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

/// Reads a delimited text body with a header row. Records may be shorter or longer
/// than the header; callers decide how to treat the gap.
pub(crate) fn read_records(
    format: &'static str,
    content: &str,
) -> Result<(StringRecord, Vec<StringRecord>), ParserError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let header = reader
        .headers()
        .map_err(|err| ParserError::Csv {
            format,
            source: err,
        })?
        .clone();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| ParserError::Csv {
            format,
            source: err,
        })?;
        records.push(record);
    }

    Ok((header, records))
}

/// Makes header names usable as DataFrame column names: blank headers become
/// `unnamed_<idx>` and repeated names get a `.1`, `.2`, ... suffix.
pub(crate) fn unique_column_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for (idx, name) in names.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("unnamed_{idx}")
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        unique.push(candidate);
    }

    unique
}

pub(crate) fn build_frame(
    format: &'static str,
    columns: Vec<Column>,
) -> Result<DataFrame, ParserError> {
    DataFrame::new(columns).map_err(|err| ParserError::Validation {
        format,
        message: format!("failed to build dataframe: {err}"),
    })
}

pub(crate) fn text_column(name: &str, values: Vec<String>) -> Column {
    Series::new(name.into(), values).into()
}
