//! Wires the rate engine into the host: startup, scheduled refresh, commands and teardown.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info};

use crate::command::{ERROR, RateCommand};
use crate::core::config::AppConfig;
use crate::core::credentials::CredentialPool;
use crate::core::evaluator::{ArithmeticEvaluator, ExpressionEvaluator};
use crate::core::sink::{LogSink, TracingLogSink};
use crate::providers::caching::RateCacheManager;
use crate::providers::open_exchange_rates::OpenExchangeRatesProvider;

pub struct RatePlugin {
    manager: Arc<RateCacheManager>,
    command: Arc<RateCommand>,
    sink: Arc<dyn LogSink>,
    refresh_interval: Duration,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl RatePlugin {
    pub fn new(
        manager: Arc<RateCacheManager>,
        evaluator: Arc<dyn ExpressionEvaluator>,
        sink: Arc<dyn LogSink>,
        refresh_interval: Duration,
    ) -> Self {
        let command = Arc::new(RateCommand::new(Arc::clone(&manager), evaluator));
        Self {
            manager,
            command,
            sink,
            refresh_interval,
            refresher: Mutex::new(None),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let sink: Arc<dyn LogSink> = Arc::new(TracingLogSink);
        let source = Arc::new(OpenExchangeRatesProvider::new(
            &config.provider.base_url,
            config.request_timeout(),
        ));
        let pool = CredentialPool::new(config.provider.app_ids.clone())
            .context("No provider credentials configured")?;
        let manager = RateCacheManager::new(source, pool)
            .with_sink(Arc::clone(&sink))
            .with_cache_duration(config.cache_duration())
            .with_timezone(config.tz()?);

        Ok(Self::new(
            Arc::new(manager),
            Arc::new(ArithmeticEvaluator),
            sink,
            config.refresh_interval(),
        ))
    }

    /// Loads rates once and schedules the periodic refresh.
    pub async fn start(&self) {
        info!("Starting rate plugin");
        self.manager.ensure_fresh(true).await;
        if !self.manager.has_rates().await {
            self.sink
                .log("⚠️ Failed to fetch exchange rates at startup")
                .await;
        }

        let manager = Arc::clone(&self.manager);
        let sink = Arc::clone(&self.sink);
        let period = self.refresh_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!("Scheduled rate refresh");
                manager.ensure_fresh(true).await;
                sink.log("✅ Exchange rates refreshed on schedule").await;
            }
        });

        if let Some(previous) = self.replace_refresher(Some(handle)) {
            previous.abort();
        }
    }

    pub async fn shutdown(&self) {
        if let Some(handle) = self.replace_refresher(None) {
            handle.abort();
            info!("Stopped scheduled rate refresh");
        }
    }

    fn replace_refresher(&self, handle: Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
        match self.refresher.lock() {
            Ok(mut guard) => std::mem::replace(&mut *guard, handle),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), handle),
        }
    }

    /// Runs a command in its own task so a fault in one request can't take the host down.
    pub async fn handle(&self, arguments: &str) -> String {
        let command = Arc::clone(&self.command);
        let args = arguments.to_string();
        match tokio::spawn(async move { command.handle(&args).await }).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Rate command failed");
                self.sink
                    .log(&format!("❌ Rate command failed: {e}"))
                    .await;
                format!("{ERROR} {e}")
            }
        }
    }
}
