use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::model::SalesColumn;

/// Positional names given to the columns of an annual budget sheet.
pub const BUDGET_COLUMN_TEMPLATE: [&str; 14] = [
    "account",
    "concept",
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

pub const ACCOUNTING_COLUMNS: [&str; 3] = ["account", "concept", "amount"];

static SALES_HEADER_ALIASES: Lazy<HashMap<&'static str, SalesColumn>> = Lazy::new(|| {
    use SalesColumn::*;
    HashMap::from([
        ("cliete", Client),
        ("cliente", Client),
        ("client", Client),
        ("customer", Client),
        ("ano", Year),
        ("anio", Year),
        ("year", Year),
        ("mes", Month),
        ("month", Month),
        ("sku", Sku),
        ("producto", Product),
        ("product", Product),
        ("importe", Amount),
        ("monto", Amount),
        ("amount", Amount),
        ("cantidad", Quantity),
        ("quantity", Quantity),
        ("qty", Quantity),
        ("preciou", UnitPrice),
        ("preciounitario", UnitPrice),
        ("unitprice", UnitPrice),
        ("price", UnitPrice),
    ])
});

/// Maps a header cell of a sales export to its canonical column, ignoring case,
/// accents, spaces and underscores.
pub fn classify_sales_header(header: &str) -> Option<SalesColumn> {
    SALES_HEADER_ALIASES
        .get(header_key(header).as_str())
        .copied()
}

fn header_key(header: &str) -> String {
    header
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}
