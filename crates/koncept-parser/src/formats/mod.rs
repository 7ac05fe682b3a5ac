mod accounting_csv;
mod budget_workbook;
mod common;
mod sales_csv;
pub(crate) mod schema;

pub use accounting_csv::{parse_accounting_csv, AccountingCsvParser};
pub use budget_workbook::{parse_budget_workbook, BudgetWorkbookParser};
pub use sales_csv::{parse_sales_csv, SalesCsvParser};
pub use schema::{classify_sales_header, ACCOUNTING_COLUMNS, BUDGET_COLUMN_TEMPLATE};

pub(crate) use common::{
    build_frame, is_missing, parse_number, read_records, text_column, unique_column_names,
};
