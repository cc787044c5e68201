use thiserror::Error;

/// Failure of a single provider request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request error: {source} for URL: {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP error: {status} for URL: {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Unexpected response from {url}: {reason}")]
    Shape { url: String, reason: String },
}

/// Bad user input for a conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Enter a valid amount to convert.")]
    InvalidAmount,
    #[error("Make sure both currencies are selected.")]
    MissingCurrency,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Conversion could not be performed.")]
    Unavailable,
    #[error("An error occurred during conversion.")]
    Failed(#[source] anyhow::Error),
}
