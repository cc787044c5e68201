//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod log;
pub mod state;

// Re-export main types for cleaner imports
pub use currency::{ConversionProvider, RateProvider, RateSnapshot, RateTable, SymbolTable};
pub use dashboard::Dashboard;
pub use error::{ConvertError, FetchError, ValidationError};
