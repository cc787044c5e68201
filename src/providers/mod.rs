pub mod exchangerate_host;
pub mod fallback;
pub mod frankfurter;
pub mod util;

pub use exchangerate_host::ExchangeRateHostProvider;
pub use fallback::FallbackProvider;
pub use frankfurter::FrankfurterProvider;
