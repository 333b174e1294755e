//! Destination for one-line operator diagnostics.

use async_trait::async_trait;
use tracing::warn;

#[async_trait]
pub trait LogSink: Send + Sync {
    async fn log(&self, line: &str);
}

/// Forwards diagnostics to `tracing` when no operator channel is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

#[async_trait]
impl LogSink for TracingLogSink {
    async fn log(&self, line: &str) {
        warn!(target: "xrate::diagnostics", "{line}");
    }
}
