use std::fmt;

use thiserror::Error;

use crate::model::TextEncoding;

#[derive(Debug, Clone)]
pub struct DecodeAttempt {
    pub encoding: TextEncoding,
    pub message: String,
}

impl DecodeAttempt {
    pub fn new(encoding: TextEncoding, message: impl Into<String>) -> Self {
        Self {
            encoding,
            message: message.into(),
        }
    }
}

impl fmt::Display for DecodeAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.encoding, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{format} CSV error: {source}")]
    Csv {
        format: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{format} file is empty")]
    EmptyData { format: &'static str },

    #[error("{format} expected {expected} columns, found {found}")]
    ColumnCount {
        format: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{format} workbook could not be read: {message}")]
    Workbook {
        format: &'static str,
        message: String,
    },

    #[error("{format} validation error: {message}")]
    Validation {
        format: &'static str,
        message: String,
    },
}
