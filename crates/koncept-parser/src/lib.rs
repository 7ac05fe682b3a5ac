mod decode;
pub mod errors;
pub mod formats;
pub mod model;

pub use decode::decode_text;
pub use errors::{DecodeAttempt, ParserError};
pub use formats::{
    parse_accounting_csv, parse_budget_workbook, parse_sales_csv, ACCOUNTING_COLUMNS,
    BUDGET_COLUMN_TEMPLATE,
};
pub use model::{AccountingEntries, BudgetTable, DecodedText, RawTable, SalesColumn, TextEncoding};

#[cfg(test)]
mod tests;
