//! Core business logic abstractions

pub mod config;
pub mod credentials;
pub mod evaluator;
pub mod log;
pub mod rates;
pub mod sink;
pub mod source;
pub mod symbols;

// Re-export main types for cleaner imports
pub use credentials::CredentialPool;
pub use evaluator::{ArithmeticEvaluator, EvalError, ExpressionEvaluator};
pub use rates::{ConversionError, RateSnapshot, RateTable};
pub use sink::{LogSink, TracingLogSink};
pub use source::{FetchError, FetchErrorKind, RateSource};
