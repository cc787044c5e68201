use super::ui;
use crate::core::Dashboard;
use anyhow::Result;

/// Converts `amount` once, using the configured pickers unless overridden.
pub async fn run(
    dashboard: &mut Dashboard<'_>,
    amount: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching currencies...");
    let loaded = dashboard.load_symbols().await;
    pb.finish_and_clear();
    loaded?;

    if let Some(from) = from {
        dashboard.select_from(from)?;
    }
    if let Some(to) = to {
        dashboard.select_to(to)?;
    }

    let pb = ui::new_spinner("Converting...");
    let result = dashboard.convert(amount).await;
    pb.finish_and_clear();

    println!("{}", ui::style_text(&result?, ui::StyleType::Value));
    Ok(())
}
