pub mod clients;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod format;
pub mod investor;
pub mod normalize;
pub mod present;
pub mod reports;
pub mod session;

pub use clients::{title_case, ClientMap, UNKNOWN_CLIENT};
pub use config::{AppConfig, ClientDirectory};
pub use dashboard::{sales_analysis, sku_analysis, Section, ViewSelection};
pub use error::{KonceptError, Result};
pub use normalize::{normalize_sales, Period, SalesFrame};
pub use present::ReportTable;
pub use session::{ingest_sales, LoadedSales, Session};
