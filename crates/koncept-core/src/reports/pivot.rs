use std::collections::{BTreeSet, HashMap, HashSet};

use polars::prelude::*;
use tracing::debug;

use super::common::{any_of_i32, any_of_str, filtered, require_columns, safe_pct_change, ClientFilter};
use crate::error::Result;
use crate::format::{percent, thousands};
use crate::normalize::{normalize_sku, SalesFrame};

#[derive(Debug, Clone, Default)]
pub struct SkuPivotRequest {
    pub client: ClientFilter,
    pub years: Vec<i32>,
    pub skus: Vec<String>,
}

pub fn amount_column(year: i32) -> String {
    format!("amount_{year}")
}

pub fn change_column(from: i32, to: i32) -> String {
    format!("change_pct_{from}_{to}")
}

/// One row per requested SKU and one `amount_<year>` column per requested year, with
/// every SKU/year pair present (0 when nothing was sold). Adjacent years are compared
/// in `change_pct_<y1>_<y2>` columns. Every numeric column has a `_formatted` twin.
pub fn sku_year_pivot(frame: &SalesFrame, request: &SkuPivotRequest) -> Result<DataFrame> {
    require_columns(frame, &["sku", "year", "amount"])?;
    if request.client.client().is_some() {
        require_columns(frame, &["client"])?;
    }

    let years: Vec<i32> = request
        .years
        .iter()
        .copied()
        .collect::<BTreeSet<i32>>()
        .into_iter()
        .collect();
    let mut seen = HashSet::new();
    let skus: Vec<String> = request
        .skus
        .iter()
        .map(|sku| normalize_sku(sku))
        .filter(|sku| seen.insert(sku.clone()))
        .collect();

    let mut predicates = vec![any_of_i32("year", &years), any_of_str("sku", &skus)];
    predicates.extend(request.client.predicate());
    let sums = filtered(frame, predicates)
        .group_by([col("sku"), col("year")])
        .agg([col("amount").sum().alias("amount")])
        .collect()?;

    let mut totals: HashMap<(String, i32), f64> = HashMap::with_capacity(sums.height());
    let sum_skus = sums.column("sku")?.str()?;
    let sum_years = sums.column("year")?.i32()?;
    let sum_amounts = sums.column("amount")?.f64()?;
    for idx in 0..sums.height() {
        if let (Some(sku), Some(year)) = (sum_skus.get(idx), sum_years.get(idx)) {
            totals.insert((sku.to_string(), year), sum_amounts.get(idx).unwrap_or(0.0));
        }
    }
    debug!(skus = skus.len(), years = years.len(), cells = totals.len(), "pivoting sku sales");

    let mut columns: Vec<Column> = vec![Series::new("sku".into(), skus.clone()).into()];
    let mut per_year: Vec<Vec<f64>> = Vec::with_capacity(years.len());
    for year in &years {
        let amounts: Vec<f64> = skus
            .iter()
            .map(|sku| totals.get(&(sku.clone(), *year)).copied().unwrap_or(0.0))
            .collect();
        let formatted: Vec<String> = amounts.iter().map(|amount| thousands(*amount)).collect();
        let name = amount_column(*year);
        columns.push(Series::new(name.as_str().into(), amounts.clone()).into());
        columns.push(Series::new(format!("{name}_formatted").into(), formatted).into());
        per_year.push(amounts);
    }

    for (idx, pair) in years.windows(2).enumerate() {
        let changes: Vec<f64> = per_year[idx]
            .iter()
            .zip(&per_year[idx + 1])
            .map(|(previous, current)| safe_pct_change(*previous, *current))
            .collect();
        let formatted: Vec<String> = changes.iter().map(|change| percent(*change)).collect();
        let name = change_column(pair[0], pair[1]);
        columns.push(Series::new(name.as_str().into(), changes).into());
        columns.push(Series::new(format!("{name}_formatted").into(), formatted).into());
    }

    Ok(DataFrame::new(columns)?)
}
