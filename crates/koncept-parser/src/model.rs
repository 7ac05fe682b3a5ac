use std::fmt;

use polars::prelude::*;

use crate::errors::DecodeAttempt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl TextEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text recovered from an upload together with the encoding that produced it and
/// every encoding that was tried and rejected first.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
    pub attempts: Vec<DecodeAttempt>,
}

/// Columns of a transactional sales export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesColumn {
    Client,
    Year,
    Month,
    Sku,
    Product,
    Amount,
    Quantity,
    UnitPrice,
}

impl SalesColumn {
    pub const ALL: [SalesColumn; 8] = [
        SalesColumn::Client,
        SalesColumn::Year,
        SalesColumn::Month,
        SalesColumn::Sku,
        SalesColumn::Product,
        SalesColumn::Amount,
        SalesColumn::Quantity,
        SalesColumn::UnitPrice,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            SalesColumn::Client => "client",
            SalesColumn::Year => "year",
            SalesColumn::Month => "month",
            SalesColumn::Sku => "sku",
            SalesColumn::Product => "product",
            SalesColumn::Amount => "amount",
            SalesColumn::Quantity => "quantity",
            SalesColumn::UnitPrice => "unit_price",
        }
    }
}

impl fmt::Display for SalesColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// A sales upload before normalization. Every column is text and every missing
/// cell already holds the literal `"0"`.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub encoding: TextEncoding,
    pub df: DataFrame,
}

impl RawTable {
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn has_column(&self, column: SalesColumn) -> bool {
        self.df.column(column.canonical_name()).is_ok()
    }
}

/// Rows of an accounting export (`account`, `concept`, `amount`). Incomplete rows
/// are dropped rather than zero-filled.
#[derive(Debug, Clone)]
pub struct AccountingEntries {
    pub encoding: TextEncoding,
    pub df: DataFrame,
    pub dropped_rows: usize,
}

/// An annual budget sheet with positionally named columns.
#[derive(Debug, Clone)]
pub struct BudgetTable {
    pub df: DataFrame,
}
