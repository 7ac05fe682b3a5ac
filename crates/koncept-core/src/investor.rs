use koncept_parser::{parse_accounting_csv, parse_budget_workbook};
use tracing::info;

use crate::error::Result;
use crate::format::thousands_2dp;
use crate::present::ReportTable;
use crate::reports::with_formatted;

/// Actuals exported from the accounting system, with a caption counting the rows that
/// were left out for being incomplete.
pub fn accounting_table(title: &str, contents: &[u8]) -> Result<ReportTable> {
    let entries = parse_accounting_csv(contents)?;
    info!(
        rows = entries.df.height(),
        dropped = entries.dropped_rows,
        encoding = %entries.encoding,
        "accounting export loaded"
    );

    let frame = with_formatted(entries.df, "amount", "amount_formatted", thousands_2dp)?;
    let table = ReportTable::new(title, frame);
    Ok(match entries.dropped_rows {
        0 => table,
        1 => table.with_caption("1 incomplete row dropped"),
        dropped => table.with_caption(format!("{dropped} incomplete rows dropped")),
    })
}

pub fn budget_table(title: &str, contents: &[u8]) -> Result<ReportTable> {
    let budget = parse_budget_workbook(contents)?;
    info!(
        rows = budget.df.height(),
        columns = budget.df.width(),
        "budget workbook loaded"
    );
    Ok(ReportTable::new(title, budget.df))
}
