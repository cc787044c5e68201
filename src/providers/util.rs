use crate::core::FetchError;
use anyhow::{Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

const USER_AGENT: &str = concat!("fxview/", env!("CARGO_PKG_VERSION"));

/// Joins `path` onto `base_url` and appends `params` as a query string.
pub fn endpoint(base_url: &str, path: &str, params: &[(&str, &str)]) -> Result<Url> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), path);
    let url = if params.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, params)
    };
    url.with_context(|| format!("Invalid provider URL: {raw}"))
}

/// Issues a GET and decodes the JSON body into `T`.
///
/// Non-2xx statuses and undecodable bodies are errors, the latter reported
/// as [`FetchError::Shape`].
pub async fn get_json<T: DeserializeOwned>(url: &Url) -> Result<T, FetchError> {
    debug!("Requesting {}", url);
    let request_error = |source| FetchError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(request_error)?;
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(request_error)?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let text = response.text().await.map_err(request_error)?;
    serde_json::from_str(&text).map_err(|e| FetchError::Shape {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
