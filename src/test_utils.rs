use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::core::rates::RateSnapshot;
use crate::core::sink::LogSink;
use crate::core::source::{FetchError, FetchErrorKind, RateSource};

pub const TIMESTAMP: i64 = 1_700_000_000;

pub fn snapshot() -> RateSnapshot {
    RateSnapshot {
        rates: HashMap::from([
            ("USD".to_string(), 1.0),
            ("CNY".to_string(), 7.1),
            ("EUR".to_string(), 0.92),
        ]),
        timestamp: TIMESTAMP,
    }
}

/// Serves [`snapshot`] for every credential except the ones listed as broken.
pub struct MockSource {
    broken: Vec<String>,
    fail_all: AtomicBool,
    delay: Option<Duration>,
    failure: FetchErrorKind,
    call_count: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new(broken: &[&str]) -> Self {
        Self {
            broken: broken.iter().map(|s| s.to_string()).collect(),
            fail_all: AtomicBool::new(false),
            delay: None,
            failure: FetchErrorKind::BadStatus,
            call_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_failure(mut self, kind: FetchErrorKind) -> Self {
        self.failure = kind;
        self
    }

    pub fn set_fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateSource for MockSource {
    async fn fetch(&self, credential: &str) -> Result<RateSnapshot, FetchError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(credential.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all.load(Ordering::SeqCst) || self.broken.iter().any(|b| b == credential) {
            let message = match self.failure {
                FetchErrorKind::Timeout => "Request error: operation timed out",
                FetchErrorKind::BadStatus => "HTTP error: 401 Unauthorized",
                FetchErrorKind::Decode => "Failed to parse JSON response",
                FetchErrorKind::Transport => "Request error: connection refused",
            };
            return Err(FetchError::new(self.failure, message));
        }
        Ok(snapshot())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogSink for RecordingSink {
    async fn log(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
