//! The cached rate table and the conversions computed from it.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("Cannot convert {from} to {to}")]
    NotConvertible { from: String, to: String },
}

/// Rates as delivered by a provider, relative to the provider's base currency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSnapshot {
    pub rates: HashMap<String, f64>,
    /// Seconds since the epoch, on the provider's clock.
    pub timestamp: i64,
}

#[derive(Debug, Default)]
pub struct RateTable {
    rates: HashMap<String, f64>,
    currencies: Vec<String>,
    currency_set: HashSet<String>,
    data_timestamp: i64,
    last_update: Option<Instant>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fully populated table, stamped as refreshed at `refreshed_at`.
    pub fn from_snapshot(snapshot: RateSnapshot, refreshed_at: Instant) -> Self {
        let mut currencies: Vec<String> = snapshot.rates.keys().cloned().collect();
        currencies.sort();
        let currency_set = currencies.iter().cloned().collect();

        Self {
            rates: snapshot.rates,
            currencies,
            currency_set,
            data_timestamp: snapshot.timestamp,
            last_update: Some(refreshed_at),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    pub fn is_valid(&self, max_age: Duration, now: Instant) -> bool {
        !self.is_empty()
            && self
                .last_update
                .is_some_and(|at| now.saturating_duration_since(at) < max_age)
    }

    /// A currency code is three letters that the table knows about, in any case.
    pub fn is_currency(&self, code: &str) -> bool {
        if code.chars().count() != 3 || !code.chars().all(char::is_alphabetic) {
            return false;
        }
        self.currency_set.contains(&code.to_uppercase())
    }

    pub fn convert(&self, from: &str, to: &str, amount: f64) -> Result<f64, ConversionError> {
        let not_convertible = || ConversionError::NotConvertible {
            from: from.to_string(),
            to: to.to_string(),
        };

        let from_rate = *self
            .rates
            .get(&from.to_uppercase())
            .ok_or_else(not_convertible)?;
        let to_rate = *self
            .rates
            .get(&to.to_uppercase())
            .ok_or_else(not_convertible)?;

        if from_rate == 0.0 {
            return Err(not_convertible());
        }

        Ok(round4(amount * (to_rate / from_rate)))
    }

    /// Provider timestamp as `YYYY-MM-DD HH:MM` in `tz`, or empty when unknown.
    pub fn format_timestamp(&self, tz: &Tz) -> String {
        if self.data_timestamp == 0 {
            return String::new();
        }
        match Utc.timestamp_opt(self.data_timestamp, 0).single() {
            Some(dt) => format_in(dt, tz),
            None => String::new(),
        }
    }
}

fn format_in(dt: DateTime<Utc>, tz: &Tz) -> String {
    dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
