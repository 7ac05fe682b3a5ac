use polars::prelude::{DataFrame, JsonFormat, JsonWriter, SerWriter};
use serde_json::{json, Value};

use crate::error::Result;

/// A finished report as handed to a rendering layer.
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub title: String,
    pub caption: Option<String>,
    pub frame: DataFrame,
}

impl ReportTable {
    pub fn new(title: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            title: title.into(),
            caption: None,
            frame,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

/// `{"title": .., "caption": .., "rows": [{column: value, ..}, ..]}`.
pub fn to_json_value(table: &ReportTable) -> Result<Value> {
    let mut frame = table.frame.clone();
    let mut buffer = Vec::new();
    JsonWriter::new(&mut buffer)
        .with_json_format(JsonFormat::Json)
        .finish(&mut frame)?;
    let rows: Value = if buffer.is_empty() {
        Value::Array(Vec::new())
    } else {
        serde_json::from_slice(&buffer)?
    };

    Ok(json!({
        "title": table.title,
        "caption": table.caption,
        "rows": rows,
    }))
}

pub fn to_json(table: &ReportTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_json_value(table)?)?)
}
