//! The `rate` chat command: argument parsing and user-facing replies.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::debug;

use crate::core::evaluator::{EvalError, ExpressionEvaluator};
use crate::providers::caching::RateCacheManager;

pub const COMMAND: &str = "rate";
pub const CLEAR_CACHE_ARG: &str = "cc";

pub const DEFAULT_TO: &str = "CNY";
pub const DEFAULT_AMOUNT: f64 = 100.0;

pub const DESCRIPTION: &str = "Currency converter";
pub const PARAMETERS: &str = "[from] [to] [amount]";
const NOTICE: &str = "Data source: Open Exchange Rates\n\n⌛️ Rates refresh every two hours";
const NOT_CURRENCY: &str = "is not a supported currency.\n\n**Supported currencies:**\n";
const CALC_ERROR: &str = "❌ **Calculation error:**";
pub const API_ERROR: &str = "⚠️ **Unable to fetch exchange rates, please try again later.**";
pub const CACHE_CLEARED: &str = "🧹 **Cache cleared, the next query fetches fresh rates.**";
pub const ERROR: &str = "❌ **Error:**";

static PLAIN_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("valid amount pattern"));

pub fn help() -> String {
    format!(
        "**{DESCRIPTION}**\n\nUsage: `,{COMMAND} {PARAMETERS}`\nExample: `,{COMMAND} usd cny 37.95*12`\n\n\n{NOTICE}"
    )
}

pub struct RateCommand {
    manager: Arc<RateCacheManager>,
    evaluator: Arc<dyn ExpressionEvaluator>,
}

impl RateCommand {
    pub fn new(manager: Arc<RateCacheManager>, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        Self { manager, evaluator }
    }

    /// Answers one invocation; `arguments` is everything after the command name.
    pub async fn handle(&self, arguments: &str) -> String {
        let arguments = arguments.trim();

        if arguments.eq_ignore_ascii_case(CLEAR_CACHE_ARG) {
            self.manager.clear_cache().await;
            return CACHE_CLEARED.to_string();
        }

        if !self.manager.has_rates().await {
            self.manager.ensure_fresh(true).await;
        }
        if !self.manager.has_rates().await {
            return API_ERROR.to_string();
        }

        if arguments.is_empty() {
            return help();
        }

        let params: Vec<&str> = arguments.split_whitespace().collect();
        debug!(?params, "Handling rate command");
        self.convert(&params).await
    }

    async fn convert(&self, params: &[&str]) -> String {
        let mut to = DEFAULT_TO.to_string();
        let mut amount = DEFAULT_AMOUNT;
        let mut expression = None;

        let from = match params {
            [from] => from.to_uppercase(),
            [from, to_or_amount] => {
                if self.manager.is_currency(to_or_amount).await {
                    to = to_or_amount.to_uppercase();
                } else {
                    match self.parse_amount(to_or_amount).await {
                        Ok((value, expr)) => {
                            amount = value;
                            expression = expr;
                        }
                        Err(message) => return message,
                    }
                }
                from.to_uppercase()
            }
            [from, to_currency, raw_amount] => {
                to = to_currency.to_uppercase();
                if !self.manager.is_currency(&to).await {
                    return self.not_a_currency(&to).await;
                }
                match self.parse_amount(raw_amount).await {
                    Ok((value, expr)) => {
                        amount = value;
                        expression = expr;
                    }
                    Err(message) => return message,
                }
                from.to_uppercase()
            }
            _ => return help(),
        };

        if !self.manager.is_currency(&from).await {
            return self.not_a_currency(&from).await;
        }

        self.manager
            .get_rate(&from, &to, amount, expression.as_deref())
            .await
    }

    /// Plain decimals are taken as-is; anything else is evaluated and echoed back.
    async fn parse_amount(&self, raw: &str) -> Result<(f64, Option<String>), String> {
        if PLAIN_AMOUNT.is_match(raw) {
            return match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok((value, None)),
                _ => Err(format!("{CALC_ERROR} {}", EvalError::NotFinite)),
            };
        }
        match self.evaluator.evaluate(raw).await {
            Ok(value) => Ok((value, Some(raw.to_string()))),
            Err(e) => Err(format!("{CALC_ERROR} {e}")),
        }
    }

    async fn not_a_currency(&self, code: &str) -> String {
        let supported = self.manager.currencies().await.join(", ");
        format!("❌ `{code}` {NOT_CURRENCY}`{supported}`")
    }
}
