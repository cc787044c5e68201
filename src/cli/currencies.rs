use super::ui;
use crate::core::Dashboard;
use anyhow::Result;
use comfy_table::Cell;

/// Prints every known currency, sorted by code.
pub async fn run(dashboard: &mut Dashboard<'_>) -> Result<()> {
    let pb = ui::new_spinner("Fetching currencies...");
    let loaded = dashboard.load_symbols().await;
    pb.finish_and_clear();
    loaded?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Name")]);
    for (code, name) in &dashboard.state().symbols {
        table.add_row(vec![Cell::new(code), Cell::new(name)]);
    }
    println!("{table}");
    Ok(())
}
