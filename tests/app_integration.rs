use std::fs;
use tracing::{error, info};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_utils {
    use super::*;

    pub async fn mount_json(server: &MockServer, url_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    pub async fn mount_error(server: &MockServer, url_path: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(500))
            .mount(server)
            .await;
    }

    pub fn write_config(primary: &str, secondary: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
        providers:
          primary:
            base_url: {primary}
          secondary:
            base_url: {secondary}
        base_currency: "USD"
        conversion:
          from: "USD"
          to: "YER"
    "#
        );
        fs::write(config_file.path(), &config_content).expect("Failed to write config file");
        config_file
    }
}

const FRANKFURTER_CURRENCIES: &str =
    r#"{"EUR": "Euro", "GBP": "British Pound", "USD": "United States Dollar", "YER": "Yemeni Rial"}"#;
const FRANKFURTER_LATEST: &str =
    r#"{"amount": 1.0, "base": "USD", "date": "2024-05-03", "rates": {"EUR": 0.93, "GBP": 0.78}}"#;

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_primary() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    test_utils::mount_json(&primary, "/currencies", FRANKFURTER_CURRENCIES).await;
    // the configured USD base is never fetched when another base is requested
    for (from, calls) in [("EUR", 1), ("USD", 0)] {
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", from))
            .respond_with(ResponseTemplate::new(200).set_body_string(FRANKFURTER_LATEST))
            .expect(calls)
            .mount(&primary)
            .await;
    }

    let config = test_utils::write_config(&primary.uri(), &secondary.uri());
    let result = fxview::run_command(
        fxview::AppCommand::Rates {
            base: Some("EUR".to_string()),
            search: Some("g".to_string()),
        },
        Some(config.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());

    let secondary_requests = secondary.received_requests().await.unwrap_or_default();
    assert!(secondary_requests.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_falls_back_to_secondary() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    test_utils::mount_error(&primary, "/currencies").await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("from", "USD"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&primary)
        .await;
    test_utils::mount_json(
        &secondary,
        "/symbols",
        r#"{"symbols": {"USD": {"description": "Dollar", "code": "USD"}, "EUR": {"description": "Euro", "code": "EUR"}}}"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("base", "USD"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"date": "2024-05-03", "rates": {"EUR": 0.93}}"#),
        )
        .expect(1)
        .mount(&secondary)
        .await;

    let config = test_utils::write_config(&primary.uri(), &secondary.uri());
    let result = fxview::run_command(
        fxview::AppCommand::Rates {
            base: None,
            search: None,
        },
        Some(config.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_symbols_failure_is_fatal() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    test_utils::mount_error(&primary, "/currencies").await;
    test_utils::mount_json(&secondary, "/symbols", r#"{"success": false}"#).await;

    let config = test_utils::write_config(&primary.uri(), &secondary.uri());
    let result = fxview::run_command(
        fxview::AppCommand::Rates {
            base: None,
            search: None,
        },
        Some(config.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("symbol listing failure must abort");
    assert_eq!(err.to_string(), "Failed to load currencies");
}

#[test_log::test(tokio::test)]
async fn test_unknown_base_is_rejected_without_rate_request() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    test_utils::mount_json(&primary, "/currencies", FRANKFURTER_CURRENCIES).await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRANKFURTER_LATEST))
        .expect(0)
        .mount(&primary)
        .await;

    let config = test_utils::write_config(&primary.uri(), &secondary.uri());
    let result = fxview::run_command(
        fxview::AppCommand::Rates {
            base: Some("CHF".to_string()),
            search: None,
        },
        Some(config.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("unknown base must be rejected");
    assert_eq!(err.to_string(), "Unknown currency: CHF");
}

#[test_log::test(tokio::test)]
async fn test_rate_failure_is_not_fatal() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    test_utils::mount_json(&primary, "/currencies", FRANKFURTER_CURRENCIES).await;
    test_utils::mount_error(&primary, "/latest").await;
    test_utils::mount_error(&secondary, "/latest").await;

    let config = test_utils::write_config(&primary.uri(), &secondary.uri());
    let result = fxview::run_command(
        fxview::AppCommand::Rates {
            base: None,
            search: None,
        },
        Some(config.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_convert_flow() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    test_utils::mount_json(&primary, "/currencies", FRANKFURTER_CURRENCIES).await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("amount", "100"))
        .and(query_param("from", "USD"))
        .and(query_param("to", "YER"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates": {"YER": 24000}}"#))
        .expect(1)
        .mount(&primary)
        .await;

    let config = test_utils::write_config(&primary.uri(), &secondary.uri());
    let result = fxview::run_command(
        fxview::AppCommand::Convert {
            amount: "100".to_string(),
            from: None,
            to: None,
        },
        Some(config.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_convert_rejects_invalid_amount_without_request() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    test_utils::mount_json(&primary, "/currencies", FRANKFURTER_CURRENCIES).await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates": {"YER": 1}}"#))
        .expect(0)
        .mount(&primary)
        .await;

    let config = test_utils::write_config(&primary.uri(), &secondary.uri());
    for amount in ["0", "-5", "abc"] {
        let result = fxview::run_command(
            fxview::AppCommand::Convert {
                amount: amount.to_string(),
                from: Some("USD".to_string()),
                to: Some("YER".to_string()),
            },
            Some(config.path().to_str().unwrap()),
        )
        .await;
        let err = result.expect_err("invalid amount must be rejected");
        assert_eq!(err.to_string(), "Enter a valid amount to convert.");
    }
}

#[test_log::test(tokio::test)]
async fn test_currencies_flow() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    test_utils::mount_json(&primary, "/currencies", FRANKFURTER_CURRENCIES).await;

    let config = test_utils::write_config(&primary.uri(), &secondary.uri());
    let result = fxview::run_command(
        fxview::AppCommand::Currencies,
        Some(config.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Currencies failed with: {:?}", result.err());
}

// Hits the public Frankfurter API
#[ignore]
#[test_log::test(tokio::test)]
async fn test_real_frankfurter_api() {
    use fxview::core::RateProvider;
    use fxview::providers::FrankfurterProvider;

    let provider = FrankfurterProvider::new(fxview::config::FRANKFURTER_BASE_URL);
    let base = "USD";
    info!(?base, "Fetching rates from Frankfurter");

    match provider.get_rates(base).await {
        Ok(snapshot) => {
            info!(count = snapshot.rates.len(), date = ?snapshot.date, "Received rates");
            assert!(!snapshot.rates.is_empty(), "Rates should not be empty");
            assert!(snapshot.rates.values().all(|r| *r > 0.0));
        }
        Err(e) => {
            error!("Rates API request failed: {e}\n{e:?}");
            panic!("Rates API request failed: {e}");
        }
    }
}
