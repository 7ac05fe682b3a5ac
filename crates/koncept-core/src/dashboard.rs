use tracing::{debug, warn};

use crate::error::{KonceptError, Result};
use crate::format::{percent, thousands};
use crate::normalize::SalesFrame;
use crate::present::ReportTable;
use crate::reports::{
    average_monthly_sales, client_share, client_yearly_totals, compare_periods, monthly_totals,
    sku_year_pivot, top_products, unit_prices, yearly_totals, ClientFilter, MonthlyRequest,
    SkuPivotRequest, TopProductsRequest, UnitPriceGrouping,
};

/// The state of every filter widget on the dashboards.
#[derive(Debug, Clone, Default)]
pub struct ViewSelection {
    pub client: Option<String>,
    pub comparison_years: Option<(i32, i32)>,
    pub monthly_years: Vec<i32>,
    pub monthly_client: ClientFilter,
    pub top_client: ClientFilter,
    pub top_year: Option<i32>,
    pub top_limit: usize,
    pub pivot_client: ClientFilter,
    pub pivot_years: Vec<i32>,
    pub pivot_skus: Vec<String>,
    pub unit_price_client: ClientFilter,
    pub unit_price_grouping: UnitPriceGrouping,
    pub share_years: Vec<i32>,
    pub share_clients: Vec<String>,
}

impl ViewSelection {
    /// First client in the file, latest year against the one before it, and every
    /// year for the share and pivot views. A missing column leaves its selections
    /// empty; the sections that need it report the error themselves.
    pub fn defaults_for(frame: &SalesFrame, top_limit: usize) -> Self {
        let years = selection_values("year", frame.years());
        let latest = years.last().copied();
        let previous = years.iter().rev().nth(1).copied().or(latest);

        Self {
            client: selection_values("client", frame.clients())
                .into_iter()
                .next(),
            comparison_years: previous.zip(latest),
            monthly_years: latest.into_iter().collect(),
            top_year: latest,
            top_limit,
            pivot_years: years[years.len().saturating_sub(2)..].to_vec(),
            pivot_skus: selection_values("sku", frame.skus()),
            share_years: years,
            ..Self::default()
        }
    }
}

fn selection_values<T>(column: &str, values: Result<Vec<T>>) -> Vec<T> {
    values.unwrap_or_else(|err| {
        debug!(column, error = %err, "no default selection for column");
        Vec::new()
    })
}

/// One titled block of a dashboard. A failed section carries its error and does not
/// prevent the others from rendering.
#[derive(Debug)]
pub struct Section {
    pub title: String,
    pub outcome: Result<ReportTable>,
}

impl Section {
    fn compute(title: &str, build: impl FnOnce() -> Result<ReportTable>) -> Self {
        let outcome = build();
        if let Err(err) = &outcome {
            warn!(section = title, error = %err, "dashboard section failed");
        }
        Self {
            title: title.to_string(),
            outcome,
        }
    }
}

/// Yearly totals captioned with the last month the data covers.
pub fn yearly_report(frame: &SalesFrame) -> Result<ReportTable> {
    let table = ReportTable::new("Total sales by year", yearly_totals(frame)?);
    Ok(match frame.latest_period()? {
        Some(period) => table.with_caption(format!("Data through {period}")),
        None => table,
    })
}

/// Monthly totals captioned with each year's total.
pub fn monthly_report(frame: &SalesFrame, request: &MonthlyRequest) -> Result<ReportTable> {
    let series = monthly_totals(frame, request)?;
    let totals = series
        .years()?
        .into_iter()
        .map(|year| -> Result<String> {
            Ok(format!("{year} total: {}", thousands(series.total_for(year)?)))
        })
        .collect::<Result<Vec<String>>>()?;

    let table = ReportTable::new(
        format!("Monthly sales: {}", request.client.label()),
        series.frame,
    );
    Ok(if totals.is_empty() {
        table
    } else {
        table.with_caption(totals.join(", "))
    })
}

/// Top products captioned with how much of the scope the listed rows cover.
pub fn top_products_report(frame: &SalesFrame, request: &TopProductsRequest) -> Result<ReportTable> {
    let top = top_products(frame, request)?;
    let title = match request.year {
        Some(year) => format!("Top products: {} {year}", request.client.label()),
        None => format!("Top products: {}", request.client.label()),
    };
    Ok(ReportTable::new(title, top.frame).with_caption(format!(
        "Shown: {} ({} of {})",
        thousands(top.shown_amount),
        percent(top.shown_share_pct),
        thousands(top.total_amount)
    )))
}

fn selected_client(selection: &ViewSelection) -> Result<&str> {
    selection
        .client
        .as_deref()
        .ok_or_else(|| KonceptError::Selection("no client selected".to_string()))
}

/// Yearly totals, per-client totals, the two-year comparison, monthly sales, average
/// monthly sales and client share.
pub fn sales_analysis(frame: &SalesFrame, selection: &ViewSelection) -> Vec<Section> {
    vec![
        Section::compute("Total sales by year", || yearly_report(frame)),
        Section::compute("Sales by client", || {
            let client = selected_client(selection)?;
            Ok(ReportTable::new(
                format!("Sales by year: {client}"),
                client_yearly_totals(frame, client)?,
            ))
        }),
        Section::compute("Year comparison", || {
            let client = selected_client(selection)?;
            let (first, second) = selection.comparison_years.ok_or_else(|| {
                KonceptError::Selection("two years are needed to compare".to_string())
            })?;
            Ok(ReportTable::new(
                format!("{client}: {first} vs {second}"),
                compare_periods(frame, client, first, second)?,
            ))
        }),
        Section::compute("Monthly sales", || {
            monthly_report(
                frame,
                &MonthlyRequest {
                    years: selection.monthly_years.clone(),
                    client: selection.monthly_client.clone(),
                },
            )
        }),
        Section::compute("Average monthly sales", || {
            Ok(ReportTable::new(
                format!("Average monthly sales: {}", selection.monthly_client.label()),
                average_monthly_sales(frame, &selection.monthly_client)?,
            ))
        }),
        Section::compute("Client share", || {
            Ok(ReportTable::new(
                "Client share of sales",
                client_share(frame, &selection.share_years, &selection.share_clients)?,
            ))
        }),
    ]
}

/// Top products, the SKU by year comparison and unit prices.
pub fn sku_analysis(frame: &SalesFrame, selection: &ViewSelection) -> Vec<Section> {
    vec![
        Section::compute("Top products", || {
            top_products_report(
                frame,
                &TopProductsRequest {
                    client: selection.top_client.clone(),
                    year: selection.top_year,
                    limit: selection.top_limit,
                },
            )
        }),
        Section::compute("SKU comparison by year", || {
            Ok(ReportTable::new(
                format!("SKU sales by year: {}", selection.pivot_client.label()),
                sku_year_pivot(
                    frame,
                    &SkuPivotRequest {
                        client: selection.pivot_client.clone(),
                        years: selection.pivot_years.clone(),
                        skus: selection.pivot_skus.clone(),
                    },
                )?,
            ))
        }),
        Section::compute("Unit price", || {
            Ok(ReportTable::new(
                format!(
                    "Unit price by {}: {}",
                    selection.unit_price_grouping,
                    selection.unit_price_client.label()
                ),
                unit_prices(
                    frame,
                    &selection.unit_price_client,
                    selection.unit_price_grouping,
                )?,
            ))
        }),
    ]
}
