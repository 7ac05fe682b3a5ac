// crates/koncept-core/src/error.rs

use koncept_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KonceptError {
    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("required column '{column}' is missing from the sales data")]
    MissingColumn { column: String },

    #[error("no sales file has been loaded")]
    NoData,

    #[error("Invalid selection: {0}")]
    Selection(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Spreadsheet export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KonceptError>;
