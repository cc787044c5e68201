//! Application state and its projection into a displayable view.

use super::config::NumberFormat;
use super::currency::{RateTable, SymbolTable};
use super::format::format_number;
use anyhow::{Result, anyhow};
use chrono::{DateTime, Local, NaiveDate};
use std::fmt::Display;

/// When the rate table was last replaced.
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    /// Date string as supplied by the provider.
    Provider(String),
    /// Local time the fetch completed.
    Local(DateTime<Local>),
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Provider(raw) => {
                if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    write!(f, "{}", date.format("%Y-%m-%d"))
                } else if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                    write!(
                        f,
                        "{}",
                        dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
                    )
                } else {
                    write!(f, "{raw}")
                }
            }
            Timestamp::Local(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub code: String,
    pub label: String,
}

/// A currency selector filled from the symbol table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Picker {
    options: Vec<PickerOption>,
    selected: Option<String>,
}

impl Picker {
    /// Builds options sorted by code and selects `default` if it is one of them.
    pub fn populate(symbols: &SymbolTable, default: &str) -> Self {
        let options: Vec<PickerOption> = symbols
            .iter()
            .map(|(code, name)| PickerOption {
                code: code.clone(),
                label: format!("{code} - {name}"),
            })
            .collect();
        let selected = options
            .iter()
            .any(|o| o.code == default)
            .then(|| default.to_string());
        Picker { options, selected }
    }

    pub fn options(&self) -> &[PickerOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Normalizes `code` and checks that it is one of the options.
    pub fn resolve(&self, code: &str) -> Result<String> {
        let code = code.trim().to_uppercase();
        if !self.options.iter().any(|o| o.code == code) {
            return Err(anyhow!("Unknown currency: {}", code));
        }
        Ok(code)
    }

    pub fn select(&mut self, code: &str) -> Result<()> {
        self.selected = Some(self.resolve(code)?);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Loading,
    Ready,
    Failed,
}

/// Everything the dashboard displays. Mutated only through
/// [`crate::core::Dashboard`].
#[derive(Debug, Clone)]
pub struct AppState {
    pub base: String,
    pub symbols: SymbolTable,
    pub rates: RateTable,
    pub updated: Option<Timestamp>,
    pub search: String,
    pub base_picker: Picker,
    pub from_picker: Picker,
    pub to_picker: Picker,
    pub phase: Phase,
    /// Token of the latest refresh that was started.
    pub request_token: u64,
}

impl AppState {
    pub fn new(base: &str) -> Self {
        AppState {
            base: base.to_uppercase(),
            symbols: SymbolTable::new(),
            rates: RateTable::new(),
            updated: None,
            search: String::new(),
            base_picker: Picker::default(),
            from_picker: Picker::default(),
            to_picker: Picker::default(),
            phase: Phase::Starting,
            request_token: 0,
        }
    }

    /// Projects the rate table through the current search term.
    pub fn view(&self, format: &NumberFormat) -> RateView {
        let query = self.search.trim().to_uppercase();

        let rows: Vec<RateRow> = self
            .rates
            .iter()
            .filter(|(code, _)| query.is_empty() || code.to_uppercase().contains(&query))
            .map(|(code, value)| RateRow {
                code: code.clone(),
                name: self.symbols.get(code).cloned().unwrap_or_default(),
                formatted: format_number(*value, format),
            })
            .collect();

        let placeholder = if self.phase == Phase::Loading {
            Some(Placeholder::Loading)
        } else if self.phase == Phase::Failed {
            Some(Placeholder::LoadFailed)
        } else if !rows.is_empty() {
            None
        } else if query.is_empty() {
            Some(Placeholder::NoRates)
        } else {
            Some(Placeholder::NoMatch)
        };

        RateView {
            base: self.base.clone(),
            updated: self.updated.as_ref().map(ToString::to_string),
            rows: if placeholder.is_some() { Vec::new() } else { rows },
            placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub code: String,
    /// Empty when the code is missing from the symbol table.
    pub name: String,
    pub formatted: String,
}

impl RateRow {
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.code.clone()
        } else {
            format!("{} - {}", self.code, self.name)
        }
    }
}

/// Shown in place of rows when there is nothing to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Loading,
    LoadFailed,
    NoMatch,
    NoRates,
}

impl Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Placeholder::Loading => "Fetching rates...",
            Placeholder::LoadFailed => {
                "Failed to load data. Check your connection and try again."
            }
            Placeholder::NoMatch => "No currency matches this code",
            Placeholder::NoRates => "No rates available right now",
        };
        write!(f, "{message}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateView {
    pub base: String,
    pub updated: Option<String>,
    pub rows: Vec<RateRow>,
    pub placeholder: Option<Placeholder>,
}
