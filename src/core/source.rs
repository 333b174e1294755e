//! Rate source abstractions

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::core::rates::RateSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Timeout,
    BadStatus,
    Decode,
    Transport,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::BadStatus => "bad status",
            FetchErrorKind::Decode => "decode error",
            FetchErrorKind::Transport => "transport error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Fetches a complete rate table using one provider credential.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self, credential: &str) -> Result<RateSnapshot, FetchError>;
}
