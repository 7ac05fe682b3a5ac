//! Aggregations over a normalized [`SalesFrame`](crate::normalize::SalesFrame).
//!
//! Every report checks its required columns up front and returns numeric columns
//! together with `*_formatted` display twins.

mod clients;
mod common;
mod monthly;
mod pivot;
mod products;
mod yearly;

pub use clients::{average_monthly_sales, client_share};
pub use common::{safe_pct_change, safe_share, ClientFilter, ALL_CLIENTS_LABEL};
pub(crate) use common::with_formatted;
pub use monthly::{monthly_totals, MonthlyRequest, MonthlySeries};
pub use pivot::{amount_column, change_column, sku_year_pivot, SkuPivotRequest};
pub use products::{top_products, unit_prices, TopProducts, TopProductsRequest, UnitPriceGrouping};
pub use yearly::{client_yearly_totals, compare_periods, yearly_totals};
