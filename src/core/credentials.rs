//! Rotating pool of provider credentials with per-credential exponential backoff.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tracing::debug;

pub const INITIAL_BACKOFF: Duration = Duration::from_secs(60);
pub const MAX_BACKOFF: Duration = Duration::from_secs(1800);

#[derive(Debug, Clone, Copy)]
struct Backoff {
    until: Instant,
    duration: Duration,
}

#[derive(Debug)]
pub struct CredentialPool {
    credentials: Vec<String>,
    cursor: usize,
    failed: HashSet<String>,
    backoff: HashMap<String, Backoff>,
}

impl CredentialPool {
    /// Returns `None` when `credentials` is empty, since there is nothing to rotate over.
    pub fn new(credentials: Vec<String>) -> Option<Self> {
        if credentials.is_empty() {
            return None;
        }
        Some(Self {
            credentials,
            cursor: 0,
            failed: HashSet::new(),
            backoff: HashMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_failed(&self, credential: &str) -> bool {
        self.failed.contains(credential)
    }

    pub fn backoff_until(&self, credential: &str) -> Option<Instant> {
        self.backoff.get(credential).map(|b| b.until)
    }

    pub fn backoff_duration(&self, credential: &str) -> Option<Duration> {
        self.backoff.get(credential).map(|b| b.duration)
    }

    fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.credentials.len();
    }

    /// Picks the next credential to try.
    ///
    /// Advances the cursor, then scans forward skipping credentials that are
    /// still backing off or flagged as failed. When a full lap finds nothing
    /// eligible, every failure and backoff record is dropped and the credential
    /// under the cursor is returned anyway, so a refresh always has something
    /// to try.
    pub fn next_candidate(&mut self, now: Instant) -> String {
        self.advance();

        let start = self.cursor;
        loop {
            let credential = &self.credentials[self.cursor];
            let backing_off = self
                .backoff
                .get(credential)
                .is_some_and(|b| now < b.until);

            if !backing_off && !self.failed.contains(credential) {
                return credential.clone();
            }

            self.advance();
            if self.cursor == start {
                debug!("All credentials unavailable, resetting failure state");
                self.failed.clear();
                self.backoff.clear();
                return self.credentials[self.cursor].clone();
            }
        }
    }

    /// Flags `credential` as failed and pushes its next retry out.
    ///
    /// The first failure backs off for [`INITIAL_BACKOFF`]; repeated failures
    /// double the previous duration up to [`MAX_BACKOFF`].
    pub fn mark_failed(&mut self, credential: &str, now: Instant) -> Duration {
        let duration = match self.backoff.get(credential) {
            Some(previous) if self.failed.contains(credential) => {
                (previous.duration * 2).min(MAX_BACKOFF)
            }
            _ => INITIAL_BACKOFF,
        };

        self.failed.insert(credential.to_string());
        self.backoff.insert(
            credential.to_string(),
            Backoff {
                until: now + duration,
                duration,
            },
        );
        duration
    }

    pub fn mark_succeeded(&mut self, credential: &str) {
        self.failed.remove(credential);
        self.backoff.remove(credential);
    }

    pub fn reset(&mut self) {
        self.failed.clear();
        self.backoff.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize) -> CredentialPool {
        CredentialPool::new((0..n).map(|i| format!("key-{i}")).collect()).unwrap()
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        assert!(CredentialPool::new(vec![]).is_none());
    }

    #[test]
    fn test_rotation_wraps_around() {
        let mut pool = pool(3);
        let now = Instant::now();

        assert_eq!(pool.next_candidate(now), "key-1");
        assert_eq!(pool.next_candidate(now), "key-2");
        assert_eq!(pool.next_candidate(now), "key-0");
        assert_eq!(pool.next_candidate(now), "key-1");
        assert!(pool.cursor() < pool.len());
    }

    #[test]
    fn test_skips_credentials_in_backoff() {
        let mut pool = pool(5);
        let now = Instant::now();
        for i in 1..=3 {
            pool.mark_failed(&format!("key-{i}"), now);
        }

        // Cursor moves to 1, then scans past 1..=3.
        assert_eq!(pool.next_candidate(now), "key-4");
        assert!(pool.is_failed("key-1"));
        assert!(pool.backoff_until("key-2").is_some());
    }

    #[test]
    fn test_failed_credential_with_elapsed_backoff_is_still_skipped() {
        let mut pool = pool(3);
        let then = Instant::now();
        pool.mark_failed("key-1", then);
        let later = then + Duration::from_secs(120);

        assert_eq!(pool.next_candidate(later), "key-2");
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let mut pool = pool(2);
        let now = Instant::now();

        let durations: Vec<u64> = (0..8)
            .map(|_| pool.mark_failed("key-0", now).as_secs())
            .collect();
        assert_eq!(durations, vec![60, 120, 240, 480, 960, 1800, 1800, 1800]);
        assert_eq!(
            pool.backoff_until("key-0"),
            Some(now + Duration::from_secs(1800))
        );
    }

    #[test]
    fn test_success_clears_failure_and_backoff() {
        let mut pool = pool(2);
        let now = Instant::now();
        pool.mark_failed("key-0", now);
        pool.mark_failed("key-0", now);

        pool.mark_succeeded("key-0");
        assert!(!pool.is_failed("key-0"));
        assert!(pool.backoff_until("key-0").is_none());

        // Backoff restarts from the initial duration.
        assert_eq!(pool.mark_failed("key-0", now), INITIAL_BACKOFF);
    }

    #[test]
    fn test_total_outage_resets_and_returns_credential() {
        let mut pool = pool(3);
        let now = Instant::now();
        for i in 0..3 {
            pool.mark_failed(&format!("key-{i}"), now);
        }

        let candidate = pool.next_candidate(now);
        assert_eq!(candidate, "key-1");
        for i in 0..3 {
            let key = format!("key-{i}");
            assert!(!pool.is_failed(&key));
            assert!(pool.backoff_until(&key).is_none());
        }
    }

    #[test]
    fn test_single_credential_pool() {
        let mut pool = pool(1);
        let now = Instant::now();
        assert_eq!(pool.next_candidate(now), "key-0");

        pool.mark_failed("key-0", now);
        assert_eq!(pool.next_candidate(now), "key-0");
        assert!(!pool.is_failed("key-0"));
    }
}
