//! Error taxonomy for market data operations.
//!
//! This module defines [`MarketDataError`], which covers every failure mode
//! a caller can observe. Per-provider failures are caught and recorded by
//! the fallback router; only configuration errors, cancellation, and the
//! aggregate [`MarketDataError::AllProvidersFailed`] cross the manager
//! boundary.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::provider::Operation;

/// Classification of a provider-reported failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// Authentication or authorization failure.
    Auth,
    /// The provider rate limited the request.
    RateLimit,
    /// The symbol or data was not found.
    NotFound,
    /// Connection failure or transport error.
    Network,
    /// Anything the adapter could not classify.
    Unknown,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::NotFound => "not_found",
            Self::Network => "network",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One recorded failure in a fallback pass: which provider, and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderAttempt {
    /// Name of the provider that was tried.
    pub provider: String,
    /// Why the attempt failed.
    pub reason: String,
}

impl fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.reason)
    }
}

fn join_attempts(attempts: &[ProviderAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// No capable provider is configured for a requested operation.
    /// Caller-visible misconfiguration, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied parameter was rejected before any provider or
    /// cache work.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A provider reported an error for a single request.
    #[error("{kind} error from {provider}: {message}")]
    Provider {
        /// Provider that reported the error.
        provider: String,
        /// Failure classification.
        kind: ProviderErrorKind,
        /// Provider-supplied detail.
        message: String,
    },

    /// A provider call exceeded its configured deadline.
    #[error("provider {provider} timed out after {timeout:?}")]
    Timeout {
        /// Provider whose call timed out.
        provider: String,
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// A provider returned data the quality validator rejected. Treated
    /// identically to a provider error for fallback purposes.
    #[error("validation failed for data from {provider}: {}", .reasons.join("; "))]
    Validation {
        /// Provider whose data failed validation.
        provider: String,
        /// Failed check messages.
        reasons: Vec<String>,
    },

    /// A provider was invoked for an operation it does not implement.
    #[error("provider {provider} does not support {operation}")]
    Unsupported {
        /// Provider that was invoked.
        provider: String,
        /// Operation the provider lacks.
        operation: Operation,
    },

    /// Every capable provider failed or was unreachable. Carries one
    /// reason per attempted provider, in attempt order.
    #[error("all providers failed for {operation}: {}", join_attempts(.attempts))]
    AllProvidersFailed {
        /// Operation that exhausted its provider chain.
        operation: Operation,
        /// Ordered per-provider failure reasons.
        attempts: Vec<ProviderAttempt>,
    },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Error interacting with the cache backend.
    #[error("cache error: {0}")]
    Cache(String),
}

impl MarketDataError {
    /// Whether this failure should make the router fall back to the next
    /// provider instead of failing the whole operation.
    #[must_use]
    pub const fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. }
                | Self::Timeout { .. }
                | Self::Validation { .. }
                | Self::Unsupported { .. }
                | Self::Cache(_)
        )
    }
}

/// Result type alias using [`MarketDataError`].
pub type Result<T> = std::result::Result<T, MarketDataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_classification() {
        let provider = MarketDataError::Provider {
            provider: "polygon".to_string(),
            kind: ProviderErrorKind::Network,
            message: "connection reset".to_string(),
        };
        assert!(provider.triggers_fallback());
        assert!(!MarketDataError::Cancelled.triggers_fallback());
        assert!(!MarketDataError::Configuration("no providers".to_string()).triggers_fallback());
        assert!(
            !MarketDataError::InvalidParameter("empty symbol".to_string()).triggers_fallback()
        );
    }

    #[test]
    fn all_providers_failed_lists_attempts_in_order() {
        let err = MarketDataError::AllProvidersFailed {
            operation: Operation::Bars,
            attempts: vec![
                ProviderAttempt {
                    provider: "alpaca".to_string(),
                    reason: "network error".to_string(),
                },
                ProviderAttempt {
                    provider: "finnhub".to_string(),
                    reason: "rate_limit error".to_string(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("bars"));
        let alpaca = msg.find("alpaca").unwrap();
        let finnhub = msg.find("finnhub").unwrap();
        assert!(alpaca < finnhub);
    }
}
