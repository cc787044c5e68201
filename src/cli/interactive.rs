use super::ui;
use crate::core::Dashboard;
use anyhow::{Result, anyhow, bail};
use comfy_table::Cell;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  base CODE               change the base currency and refetch rates
  search [TERM]           filter rates by code (empty clears the filter)
  refresh                 refetch rates for the current base
  from CODE | to CODE     choose conversion currencies
  convert AMOUNT [F T]    convert AMOUNT, optionally from F to T
  list                    show the currency codes the pickers accept
  show                    print the rate table again
  help                    show this message
  quit                    leave";

/// One line of user input in an interactive session.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Base(String),
    Search(String),
    Refresh,
    From(String),
    To(String),
    Convert {
        amount: String,
        pair: Option<(String, String)>,
    },
    List,
    Show,
    Help,
    Quit,
}

pub fn parse_action(line: &str) -> Result<Action> {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, r)| (c, r.trim()));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let action = match (command.to_lowercase().as_str(), args.as_slice()) {
        ("base", [code]) => Action::Base(code.to_string()),
        ("search", _) => Action::Search(rest.to_string()),
        ("refresh", []) => Action::Refresh,
        ("from", [code]) => Action::From(code.to_string()),
        ("to", [code]) => Action::To(code.to_string()),
        ("convert", [amount]) => Action::Convert {
            amount: amount.to_string(),
            pair: None,
        },
        ("convert", [amount, from, to]) => Action::Convert {
            amount: amount.to_string(),
            pair: Some((from.to_string(), to.to_string())),
        },
        ("list", []) => Action::List,
        ("show", []) | ("", []) => Action::Show,
        ("help", _) | ("?", _) => Action::Help,
        ("quit", []) | ("exit", []) => Action::Quit,
        ("base" | "from" | "to" | "convert" | "refresh" | "list" | "show" | "quit" | "exit", _) => {
            bail!("Wrong arguments for '{}', type 'help' for usage", command)
        }
        _ => return Err(anyhow!("Unknown command: {}", command)),
    };
    Ok(action)
}

/// Runs a session on stdin until `quit` or end of input.
pub async fn run(dashboard: &mut Dashboard<'_>) -> Result<()> {
    run_session(dashboard, BufReader::new(tokio::io::stdin())).await
}

pub async fn run_session<R>(dashboard: &mut Dashboard<'_>, reader: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let pb = ui::new_spinner("Fetching rates...");
    let loaded = dashboard.init().await;
    pb.finish_and_clear();

    println!("{}", dashboard.view().display_as_table());
    loaded?;
    print_pair(dashboard);

    let mut lines = reader.lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(e) => {
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                prompt()?;
                continue;
            }
        };
        debug!(?action, "Handling action");
        if action == Action::Quit {
            break;
        }
        handle(dashboard, action).await;
        prompt()?;
    }
    Ok(())
}

async fn handle(dashboard: &mut Dashboard<'_>, action: Action) {
    match action {
        Action::Base(code) => {
            let pb = ui::new_spinner("Fetching rates...");
            let selected = dashboard.select_base(&code).await;
            pb.finish_and_clear();
            match selected {
                Ok(()) => println!("{}", dashboard.view().display_as_table()),
                Err(e) => print_error(&e.to_string()),
            }
        }
        Action::Search(term) => {
            dashboard.set_search(&term);
            println!("{}", dashboard.view().display_as_table());
        }
        Action::Refresh => {
            let pb = ui::new_spinner("Fetching rates...");
            dashboard.refresh().await;
            pb.finish_and_clear();
            println!("{}", dashboard.view().display_as_table());
        }
        Action::From(code) => match dashboard.select_from(&code) {
            Ok(()) => print_pair(dashboard),
            Err(e) => print_error(&e.to_string()),
        },
        Action::To(code) => match dashboard.select_to(&code) {
            Ok(()) => print_pair(dashboard),
            Err(e) => print_error(&e.to_string()),
        },
        Action::Convert { amount, pair } => {
            if let Some((from, to)) = pair {
                if let Err(e) = dashboard.select_pair(&from, &to) {
                    print_error(&e.to_string());
                    return;
                }
            }
            convert(dashboard, &amount).await;
        }
        Action::List => println!("{}", currency_list(dashboard)),
        Action::Show => println!("{}", dashboard.view().display_as_table()),
        Action::Help => println!("{HELP}"),
        Action::Quit => {}
    }
}

async fn convert(dashboard: &Dashboard<'_>, amount: &str) {
    let pb = ui::new_spinner("Converting...");
    let result = dashboard.convert(amount).await;
    pb.finish_and_clear();
    match result {
        Ok(text) => println!("{}", ui::style_text(&text, ui::StyleType::Value)),
        Err(e) => print_error(&e.to_string()),
    }
}

/// Picker options with the current base/from/to selections marked.
fn currency_list(dashboard: &Dashboard<'_>) -> String {
    let state = dashboard.state();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Base"),
        ui::header_cell("From"),
        ui::header_cell("To"),
    ]);
    let mark = |selected: Option<&str>, code: &str| {
        Cell::new(if selected == Some(code) { "*" } else { "" })
    };
    for option in state.base_picker.options() {
        table.add_row(vec![
            Cell::new(&option.label),
            mark(state.base_picker.selected(), &option.code),
            mark(state.from_picker.selected(), &option.code),
            mark(state.to_picker.selected(), &option.code),
        ]);
    }
    table.to_string()
}

fn print_pair(dashboard: &Dashboard<'_>) {
    let state = dashboard.state();
    println!(
        "Converting {} -> {}",
        state.from_picker.selected().unwrap_or("-"),
        state.to_picker.selected().unwrap_or("-")
    );
}

fn print_error(message: &str) {
    println!("{}", ui::style_text(message, ui::StyleType::Error));
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::core::{ConversionProvider, RateProvider, RateSnapshot, SymbolTable};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[test]
    fn test_parse_actions() {
        assert_eq!(parse_action("base eur").unwrap(), Action::Base("eur".to_string()));
        assert_eq!(parse_action("search").unwrap(), Action::Search(String::new()));
        assert_eq!(
            parse_action("  search  gb ").unwrap(),
            Action::Search("gb".to_string())
        );
        assert_eq!(parse_action("REFRESH").unwrap(), Action::Refresh);
        assert_eq!(parse_action("from GBP").unwrap(), Action::From("GBP".to_string()));
        assert_eq!(parse_action("to JPY").unwrap(), Action::To("JPY".to_string()));
        assert_eq!(
            parse_action("convert 100").unwrap(),
            Action::Convert {
                amount: "100".to_string(),
                pair: None
            }
        );
        assert_eq!(
            parse_action("convert 5 USD YER").unwrap(),
            Action::Convert {
                amount: "5".to_string(),
                pair: Some(("USD".to_string(), "YER".to_string()))
            }
        );
        assert_eq!(parse_action("list").unwrap(), Action::List);
        assert_eq!(parse_action("").unwrap(), Action::Show);
        assert_eq!(parse_action("help").unwrap(), Action::Help);
        assert_eq!(parse_action("exit").unwrap(), Action::Quit);
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_action("base").unwrap_err();
        assert!(err.to_string().contains("Wrong arguments for 'base'"));
        let err = parse_action("convert 1 USD").unwrap_err();
        assert!(err.to_string().contains("Wrong arguments for 'convert'"));
        let err = parse_action("launch rockets").unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: launch");
    }

    struct RecordingProvider {
        bases: Mutex<Vec<String>>,
        conversions: Mutex<Vec<(f64, String, String)>>,
    }

    #[async_trait]
    impl RateProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn list_currencies(&self) -> Result<SymbolTable> {
            Ok(["EUR", "GBP", "USD", "YER"]
                .into_iter()
                .map(|c| (c.to_string(), format!("{c} name")))
                .collect())
        }

        async fn get_rates(&self, base: &str) -> Result<RateSnapshot> {
            self.bases.lock().unwrap().push(base.to_string());
            Ok(RateSnapshot {
                rates: [("EUR".to_string(), 0.93), ("GBP".to_string(), 0.78)].into(),
                date: None,
            })
        }
    }

    #[async_trait]
    impl ConversionProvider for RecordingProvider {
        async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Option<f64>> {
            self.conversions
                .lock()
                .unwrap()
                .push((amount, from.to_string(), to.to_string()));
            Ok(Some(amount * 2.0))
        }
    }

    #[tokio::test]
    async fn test_session_drives_dashboard() {
        let provider = RecordingProvider {
            bases: Mutex::new(Vec::new()),
            conversions: Mutex::new(Vec::new()),
        };
        let config = AppConfig::default();
        let mut dashboard = Dashboard::new(&provider, &provider, &config);

        let input: &[u8] =
            b"search g\nbase EUR\nbase CHF\nconvert -5\nconvert 10 GBP USD\nconvert 1 EUR CHF\nlist\nbogus\nquit\nrefresh\n";
        run_session(&mut dashboard, input).await.unwrap();

        // `refresh` after `quit` is never handled
        assert_eq!(*provider.bases.lock().unwrap(), vec!["USD", "EUR"]);
        assert_eq!(
            *provider.conversions.lock().unwrap(),
            vec![(10.0, "GBP".to_string(), "USD".to_string())]
        );
        let state = dashboard.state();
        assert_eq!(state.base, "EUR");
        assert_eq!(state.search, "g");
        // an unknown target leaves the previous pair in place
        assert_eq!(state.from_picker.selected(), Some("GBP"));
        assert_eq!(state.to_picker.selected(), Some("USD"));
    }

    #[tokio::test]
    async fn test_currency_list_marks_selections() {
        let provider = RecordingProvider {
            bases: Mutex::new(Vec::new()),
            conversions: Mutex::new(Vec::new()),
        };
        let config = AppConfig::default();
        let mut dashboard = Dashboard::new(&provider, &provider, &config);
        dashboard.init().await.unwrap();
        dashboard.select_pair("gbp", "eur").unwrap();

        let listing = currency_list(&dashboard);
        let rows: Vec<&str> = listing.lines().filter(|l| l.contains(" name")).collect();
        assert_eq!(rows.len(), 4);

        let marks = |code: &str| {
            let row = rows
                .iter()
                .find(|r| r.contains(&format!("{code} - {code} name")))
                .unwrap();
            row.matches('*').count()
        };
        assert_eq!(marks("EUR"), 1);
        assert_eq!(marks("GBP"), 1);
        assert_eq!(marks("USD"), 1);
        assert_eq!(marks("YER"), 0);
    }
}
