use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use koncept_core::dashboard::{
    monthly_report, sales_analysis, sku_analysis, top_products_report, yearly_report, Section,
    ViewSelection,
};
use koncept_core::investor::{accounting_table, budget_table};
use koncept_core::reports::{
    average_monthly_sales, client_share, client_yearly_totals, compare_periods, sku_year_pivot,
    unit_prices, ClientFilter, MonthlyRequest, SkuPivotRequest, TopProductsRequest,
    UnitPriceGrouping,
};
use koncept_core::{AppConfig, ReportTable, SalesFrame, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod output;

use output::Output;

const DEFAULT_CONFIG_PATH: &str = "koncept.toml";

/// Sales and investor reports for Manufactura Koncept
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Client directory and defaults (koncept.toml)
    #[arg(long, global = true, env = "KONCEPT_CONFIG")]
    config: Option<PathBuf>,

    /// Print tables as JSON instead of terminal tables
    #[arg(long, global = true)]
    json: bool,

    /// Also save every table as an .xlsx workbook in this directory
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Total sales per year
    Yearly(SalesArgs),
    /// Total sales per year for one client
    ClientYearly {
        #[command(flatten)]
        sales: SalesArgs,
        #[arg(short, long)]
        client: String,
    },
    /// One client's sales in two years side by side
    Compare {
        #[command(flatten)]
        sales: SalesArgs,
        #[arg(short, long)]
        client: String,
        #[arg(long)]
        first: i32,
        #[arg(long)]
        second: i32,
    },
    /// Sales per month, every month shown, with month-over-month change
    Monthly {
        #[command(flatten)]
        sales: SalesArgs,
        #[arg(short, long = "year", required = true)]
        years: Vec<i32>,
        #[arg(short, long)]
        client: Option<String>,
    },
    /// Best-selling products
    TopProducts {
        #[command(flatten)]
        sales: SalesArgs,
        #[arg(short, long)]
        client: Option<String>,
        #[arg(short, long)]
        year: Option<i32>,
        /// Number of products to list, 0 for all (defaults to `default_top_n`)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// SKU sales by year with the change between consecutive years
    SkuPivot {
        #[command(flatten)]
        sales: SalesArgs,
        #[arg(short, long = "year", required = true)]
        years: Vec<i32>,
        #[arg(short, long = "sku", required = true)]
        skus: Vec<String>,
        #[arg(short, long)]
        client: Option<String>,
    },
    /// Mean unit price per SKU
    UnitPrices {
        #[command(flatten)]
        sales: SalesArgs,
        #[arg(short, long)]
        client: Option<String>,
        #[arg(long, value_enum, default_value_t = GroupBy::Product)]
        by: GroupBy,
    },
    /// Average monthly sales per client and year
    AverageMonthly {
        #[command(flatten)]
        sales: SalesArgs,
        #[arg(short, long)]
        client: Option<String>,
    },
    /// Each client's share of sales
    ClientShare {
        #[command(flatten)]
        sales: SalesArgs,
        #[arg(short, long = "year", required = true)]
        years: Vec<i32>,
        #[arg(short, long = "client")]
        clients: Vec<String>,
    },
    /// Every sales and SKU section with the default selections
    Dashboard(SalesArgs),
    /// Actuals exported from the accounting system
    Accounting {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Annual budget workbook
    Budget {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SalesArgs {
    /// Sales CSV export
    #[arg(short, long)]
    file: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GroupBy {
    Product,
    Year,
}

impl From<GroupBy> for UnitPriceGrouping {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::Product => UnitPriceGrouping::Product,
            GroupBy::Year => UnitPriceGrouping::Year,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let out = Output::new(cli.json, cli.export_dir.clone());

    match cli.command {
        Command::Yearly(sales) => {
            let session = open_sales(&config, &sales.file)?;
            let table = yearly_report(session.sales()?)?;
            out.table(&table, "ventas_anuales", None)
        }
        Command::ClientYearly { sales, client } => {
            let session = open_sales(&config, &sales.file)?;
            let table = ReportTable::new(
                format!("Sales by year: {client}"),
                client_yearly_totals(session.sales()?, &client)?,
            );
            out.table(&table, "ventas_cliente", Some(client.as_str()))
        }
        Command::Compare {
            sales,
            client,
            first,
            second,
        } => {
            let session = open_sales(&config, &sales.file)?;
            let table = ReportTable::new(
                format!("{client}: {first} vs {second}"),
                compare_periods(session.sales()?, &client, first, second)?,
            );
            out.table(&table, "comparativa", Some(client.as_str()))
        }
        Command::Monthly {
            sales,
            years,
            client,
        } => {
            let session = open_sales(&config, &sales.file)?;
            let filter = ClientFilter::from(client);
            let table = monthly_report(
                session.sales()?,
                &MonthlyRequest {
                    years,
                    client: filter.clone(),
                },
            )?;
            out.table(&table, "ventas_mensuales", filter.client())
        }
        Command::TopProducts {
            sales,
            client,
            year,
            limit,
        } => {
            let session = open_sales(&config, &sales.file)?;
            let filter = ClientFilter::from(client);
            let table = top_products_report(
                session.sales()?,
                &TopProductsRequest {
                    client: filter.clone(),
                    year,
                    limit: limit.unwrap_or(config.default_top_n),
                },
            )?;
            out.table(&table, "top_productos", filter.client())
        }
        Command::SkuPivot {
            sales,
            years,
            skus,
            client,
        } => {
            let session = open_sales(&config, &sales.file)?;
            let filter = ClientFilter::from(client);
            let pivot = sku_year_pivot(
                session.sales()?,
                &SkuPivotRequest {
                    client: filter.clone(),
                    years,
                    skus,
                },
            )?;
            let table = ReportTable::new(format!("SKU sales by year: {}", filter.label()), pivot);
            out.table(&table, "comparativa_skus", filter.client())
        }
        Command::UnitPrices { sales, client, by } => {
            let session = open_sales(&config, &sales.file)?;
            let filter = ClientFilter::from(client);
            let grouping = UnitPriceGrouping::from(by);
            let table = ReportTable::new(
                format!("Unit price by {grouping}: {}", filter.label()),
                unit_prices(session.sales()?, &filter, grouping)?,
            );
            out.table(&table, "precio_unitario", filter.client())
        }
        Command::AverageMonthly { sales, client } => {
            let session = open_sales(&config, &sales.file)?;
            let filter = ClientFilter::from(client);
            let table = ReportTable::new(
                format!("Average monthly sales: {}", filter.label()),
                average_monthly_sales(session.sales()?, &filter)?,
            );
            out.table(&table, "promedio_mensual", filter.client())
        }
        Command::ClientShare {
            sales,
            years,
            clients,
        } => {
            let session = open_sales(&config, &sales.file)?;
            let table = ReportTable::new(
                "Client share of sales",
                client_share(session.sales()?, &years, &clients)?,
            );
            out.table(&table, "participacion_clientes", None)
        }
        Command::Dashboard(sales) => {
            let session = open_sales(&config, &sales.file)?;
            run_dashboard(&out, session.sales()?, config.default_top_n)
        }
        Command::Accounting { file } => {
            let contents = read_file(&file)?;
            let table = accounting_table("Accounting actuals", &contents)?;
            out.table(&table, "odoo_real", None)
        }
        Command::Budget { file } => {
            let contents = read_file(&file)?;
            let table = budget_table("Annual budget", &contents)?;
            out.table(&table, "presupuesto", None)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => AppConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))
            .context("failed to load koncept.toml"),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn open_sales(config: &AppConfig, path: &Path) -> Result<Session> {
    let contents = read_file(path)?;
    let mut session = Session::new(config.client_map());
    session
        .upload(&path.display().to_string(), &contents)
        .with_context(|| format!("could not load sales file {}", path.display()))?;
    Ok(session)
}

fn run_dashboard(out: &Output, frame: &SalesFrame, top_limit: usize) -> Result<()> {
    let selection = ViewSelection::defaults_for(frame, top_limit);
    let sections: Vec<Section> = sales_analysis(frame, &selection)
        .into_iter()
        .chain(sku_analysis(frame, &selection))
        .collect();

    let failed = sections
        .iter()
        .filter(|section| section.outcome.is_err())
        .count();
    out.sections(&sections, selection.client.as_deref())?;
    info!(sections = sections.len(), failed, "dashboard rendered");
    Ok(())
}
