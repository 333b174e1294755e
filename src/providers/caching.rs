//! Keeps a single rate table fresh by rotating through provider credentials.

use chrono_tz::Tz;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::core::credentials::CredentialPool;
use crate::core::rates::{ConversionError, RateTable};
use crate::core::sink::{LogSink, TracingLogSink};
use crate::core::source::RateSource;
use crate::core::symbols::symbol;

pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(7200);

/// Shows only the tail of a credential so log lines can't leak it.
fn redact(credential: &str) -> String {
    let tail: String = credential
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{tail}")
}

pub struct RateCacheManager {
    source: Arc<dyn RateSource>,
    sink: Arc<dyn LogSink>,
    pool: Mutex<CredentialPool>,
    table: RwLock<RateTable>,
    refresh_lock: Mutex<()>,
    attempts: AtomicU64,
    cache_duration: Duration,
    tz: Tz,
}

impl RateCacheManager {
    pub fn new(source: Arc<dyn RateSource>, pool: CredentialPool) -> Self {
        Self {
            source,
            sink: Arc::new(TracingLogSink),
            pool: Mutex::new(pool),
            table: RwLock::new(RateTable::new()),
            refresh_lock: Mutex::new(()),
            attempts: AtomicU64::new(0),
            cache_duration: DEFAULT_CACHE_DURATION,
            tz: chrono_tz::Asia::Shanghai,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration = duration;
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    pub async fn is_cache_valid(&self) -> bool {
        self.table
            .read()
            .await
            .is_valid(self.cache_duration, Instant::now())
    }

    pub async fn has_rates(&self) -> bool {
        !self.table.read().await.is_empty()
    }

    pub async fn currencies(&self) -> Vec<String> {
        self.table.read().await.currencies().to_vec()
    }

    pub async fn is_currency(&self, code: &str) -> bool {
        self.table.read().await.is_currency(code)
    }

    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> Result<f64, ConversionError> {
        self.table.read().await.convert(from, to, amount)
    }

    /// Refreshes the table unless it is still within the cache window.
    ///
    /// Only one refresh runs at a time. A caller that had to wait for an
    /// in-flight refresh returns once it completes instead of starting
    /// another one, whatever the outcome was.
    pub async fn ensure_fresh(&self, force: bool) {
        let seen = self.attempts.load(Ordering::SeqCst);
        if !force && self.is_cache_valid().await {
            debug!("Rate cache HIT");
            return;
        }

        let _guard = self.refresh_lock.lock().await;
        if self.attempts.load(Ordering::SeqCst) != seen {
            debug!("Joined a refresh that was already in flight");
            return;
        }
        if !force && self.is_cache_valid().await {
            debug!("Rate cache HIT after waiting for refresh lock");
            return;
        }

        debug!(force, "Rate cache MISS, refreshing");
        self.refresh().await;
        self.attempts.fetch_add(1, Ordering::SeqCst);
    }

    async fn refresh(&self) -> bool {
        let started = Instant::now();
        let pool_size = self.pool.lock().await.len();

        for _ in 0..pool_size {
            let credential = self.pool.lock().await.next_candidate(Instant::now());

            match self.source.fetch(&credential).await {
                Ok(snapshot) => {
                    let table = RateTable::from_snapshot(snapshot, started);
                    let currencies = table.currencies().len();
                    *self.table.write().await = table;
                    self.pool.lock().await.mark_succeeded(&credential);
                    info!(
                        credential = %redact(&credential),
                        currencies,
                        "Refreshed exchange rates"
                    );
                    return true;
                }
                Err(e) => {
                    let backoff = self
                        .pool
                        .lock()
                        .await
                        .mark_failed(&credential, Instant::now());
                    warn!(
                        credential = %redact(&credential),
                        kind = %e.kind,
                        backoff_secs = backoff.as_secs(),
                        "Credential failed to fetch rates: {}",
                        e.message
                    );
                    self.sink
                        .log(&format!(
                            "⚠️ Warning: credential {} failed to fetch exchange rates. {e}",
                            redact(&credential)
                        ))
                        .await;
                }
            }
        }

        error!(pool_size, "All credentials failed to fetch exchange rates");
        self.sink
            .log("❌ Critical: no credential could fetch exchange rate data.")
            .await;
        false
    }

    /// Converts and formats the result for display, refreshing first if stale.
    pub async fn get_rate(
        &self,
        from: &str,
        to: &str,
        amount: f64,
        expression: Option<&str>,
    ) -> String {
        self.ensure_fresh(false).await;

        let table = self.table.read().await;
        let result = match table.convert(from, to, amount) {
            Ok(result) => result,
            Err(e) => return format!("❌ {e}"),
        };

        let date = table.format_timestamp(&self.tz);
        let evaluated = expression
            .map(|expr| format!("`Amount: {expr} = {amount}`\n"))
            .unwrap_or_default();

        format!(
            "**{from}** ➜ **{to}**\n\n`{}{amount:.2} = {}{result:.2}`\n\n{evaluated}`Updated: {date}`",
            symbol(from),
            symbol(to),
        )
    }

    /// Drops the table and every credential's failure history.
    pub async fn clear_cache(&self) {
        *self.table.write().await = RateTable::new();
        self.pool.lock().await.reset();
        debug!("Rate cache CLEAR");
    }
}
