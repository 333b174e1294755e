use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::rates::RateSnapshot;
use crate::core::source::{FetchError, FetchErrorKind, RateSource};

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(default)]
    timestamp: i64,
}

/// Fetches the `latest.json` table from Open Exchange Rates.
pub struct OpenExchangeRatesProvider {
    base_url: String,
    timeout: Duration,
}

impl OpenExchangeRatesProvider {
    /// `base_url` is used as a prefix: the credential is appended verbatim.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        OpenExchangeRatesProvider {
            base_url: base_url.to_string(),
            timeout,
        }
    }
}

fn classify(e: &reqwest::Error) -> FetchErrorKind {
    if e.is_timeout() {
        FetchErrorKind::Timeout
    } else if e.is_decode() {
        FetchErrorKind::Decode
    } else {
        FetchErrorKind::Transport
    }
}

#[async_trait]
impl RateSource for OpenExchangeRatesProvider {
    #[instrument(name = "OpenExchangeRatesFetch", skip(self, credential))]
    async fn fetch(&self, credential: &str) -> Result<RateSnapshot, FetchError> {
        let url = format!("{}{}", self.base_url, credential);
        debug!("Requesting latest rates");

        let client = reqwest::Client::builder()
            .user_agent("xrate/1.0")
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::new(FetchErrorKind::Transport, e.to_string()))?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::new(classify(&e), format!("Request error: {e}")))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::new(
                FetchErrorKind::BadStatus,
                format!("HTTP error: {}", response.status()),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::new(classify(&e), format!("Body error: {e}")))?;

        let data: LatestResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::new(
                FetchErrorKind::Decode,
                format!("Failed to parse JSON response: {e}"),
            )
        })?;

        debug!(currencies = data.rates.len(), "Received latest rates");
        Ok(RateSnapshot {
            rates: data.rates,
            timestamp: data.timestamp,
        })
    }
}
