use crate::currency::ExchangeRates;
use async_trait::async_trait;
use serde::Deserialize;
use shared_types::{Currency, RateTable};
use std::collections::HashMap;
use std::time::Duration;

/// Source of USD-based exchange rates
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> anyhow::Result<RateTable>;

    fn name(&self) -> &str;
}

/// Built-in table, used when no live source is configured
pub struct FixedRateSource;

#[async_trait]
impl RateSource for FixedRateSource {
    async fn fetch_rates(&self) -> anyhow::Result<RateTable> {
        Ok(RateTable::from([
            (Currency::Usd, 1.0),
            (Currency::Eur, 0.93),
            (Currency::Gbp, 0.79),
            (Currency::Inr, 83.45),
        ]))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Reads `{ "rates": { "EUR": 0.93, ... } }` from an HTTP endpoint
pub struct HttpRateSource {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RatesPayload {
    rates: HashMap<String, f64>,
}

impl HttpRateSource {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rates(&self) -> anyhow::Result<RateTable> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("rate source returned status {}", status);
        }

        let payload: RatesPayload = response.json().await?;
        let table: RateTable = payload
            .rates
            .into_iter()
            .filter_map(|(code, rate)| code.parse::<Currency>().ok().map(|c| (c, rate)))
            .collect();

        if table.is_empty() {
            anyhow::bail!("rate source returned no supported currencies");
        }
        Ok(table)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Fetch rates once. Failures fall back to the identity table and are only logged.
pub async fn load_rates(source: &dyn RateSource) -> ExchangeRates {
    match source.fetch_rates().await {
        Ok(table) => {
            tracing::info!(source = source.name(), currencies = table.len(), "Exchange rates loaded");
            let rates = ExchangeRates::from_table(table);
            let unresolved = rates.unresolved();
            if !unresolved.is_empty() {
                let codes: Vec<&str> = unresolved.iter().map(|c| c.code()).collect();
                tracing::warn!(
                    source = source.name(),
                    currencies = %codes.join(", "),
                    "No exchange rate for some currencies, they cannot be selected"
                );
            }
            rates
        }
        Err(e) => {
            tracing::warn!(source = source.name(), error = %e, "Exchange rate fetch failed, using 1:1 rates");
            ExchangeRates::identity()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;

    #[async_trait]
    impl RateSource for FailingSource {
        async fn fetch_rates(&self) -> anyhow::Result<RateTable> {
            anyhow::bail!("offline")
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_fixed_source_rates() {
        let rates = load_rates(&FixedRateSource).await;
        assert!(rates.is_loaded());
        assert_eq!(rates.rate(Currency::Eur), 0.93);
        assert_eq!(rates.rate(Currency::Inr), 83.45);
        assert!(rates.unresolved().is_empty());
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_identity() {
        let rates = load_rates(&FailingSource).await;
        assert!(rates.is_loaded());
        for currency in Currency::ALL {
            assert_eq!(rates.rate(currency), 1.0);
        }
    }

    #[tokio::test]
    async fn test_http_source_keeps_supported_codes() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/latest/USD")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"base": "USD", "rates": {"USD": 1, "EUR": 0.91, "JPY": 150.2, "GBP": 0.78}}"#)
            .create_async()
            .await;

        let source = HttpRateSource::new(format!("{}/latest/USD", server.url())).unwrap();
        let rates = load_rates(&source).await;

        assert_eq!(rates.rate(Currency::Eur), 0.91);
        assert_eq!(rates.rate(Currency::Gbp), 0.78);
        assert!(!rates.is_available(Currency::Inr));
        assert_eq!(rates.unresolved(), vec![Currency::Inr]);
    }

    #[tokio::test]
    async fn test_http_source_error_status_falls_back() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/latest/USD")
            .with_status(500)
            .create_async()
            .await;

        let source = HttpRateSource::new(format!("{}/latest/USD", server.url())).unwrap();
        assert!(source.fetch_rates().await.is_err());
        assert_eq!(load_rates(&source).await, ExchangeRates::identity());
    }
}
