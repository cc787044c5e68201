use super::ui;
use crate::core::Dashboard;
use crate::core::state::{Placeholder, RateView};
use anyhow::Result;
use comfy_table::Cell;

impl RateView {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Rate (1 {})", self.base)),
        ]);

        match self.placeholder {
            Some(placeholder) => {
                let is_error = placeholder == Placeholder::LoadFailed;
                table.add_row(vec![
                    ui::placeholder_cell(&placeholder.to_string(), is_error),
                    Cell::new(""),
                ]);
            }
            None => {
                for row in &self.rows {
                    table.add_row(vec![Cell::new(row.label()), ui::value_cell(&row.formatted)]);
                }
            }
        }

        let updated = self.updated.as_deref().unwrap_or("-");
        let mut output = format!(
            "Base: {}    Last updated: {}\n\n",
            ui::style_text(&self.base, ui::StyleType::Title),
            ui::style_text(updated, ui::StyleType::Subtle)
        );
        output.push_str(&table.to_string());
        output
    }
}

/// Runs a full refresh cycle and prints the rate table.
pub async fn run(
    dashboard: &mut Dashboard<'_>,
    base: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching rates...");
    let loaded = dashboard.init_with_base(base).await;
    pb.finish_and_clear();

    if let Err(e) = loaded {
        if dashboard.view().placeholder == Some(Placeholder::LoadFailed) {
            println!("{}", dashboard.view().display_as_table());
        }
        return Err(e);
    }

    if let Some(search) = search {
        dashboard.set_search(search);
    }

    println!("{}", dashboard.view().display_as_table());
    Ok(())
}
