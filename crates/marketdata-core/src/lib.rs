#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/quantfold/marketdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and traits for market data orchestration.
//!
//! This crate provides the foundational abstractions:
//!
//! - [`types`] - the canonical data model ([`Bar`], [`Quote`], [`Snapshot`],
//!   [`TickerInfo`], [`EarningsEvent`], [`DividendEvent`])
//! - [`MarketDataProvider`](provider::MarketDataProvider) - the capability
//!   interface every vendor implements
//! - [`MarketDataCache`](cache::MarketDataCache) - the caching abstraction
//! - [`quality`] - pure pass/warn/fail validation of canonical records
//! - [`MarketDataError`](error::MarketDataError) - the error taxonomy
//! - [`calendar`] - NYSE trading calendar helpers

/// Cache key, payload, policy, and trait.
pub mod cache;
/// NYSE trading calendar.
pub mod calendar;
/// Error taxonomy.
pub mod error;
/// Provider capability interface and operation kinds.
pub mod provider;
/// Data quality validation.
pub mod quality;
/// Bar period lengths.
pub mod timeframe;
/// Canonical data types.
pub mod types;

// Re-export commonly used items at crate root
pub use cache::{CacheKey, CachePolicy, CachedValue, MarketDataCache};
pub use error::{MarketDataError, ProviderAttempt, ProviderErrorKind, Result};
pub use provider::{MarketDataProvider, Operation};
pub use quality::{QualityCheck, QualityReport, QualityStatus};
pub use timeframe::Timeframe;
pub use types::{
    Bar, CallTime, DividendEvent, DividendFrequency, DividendType, EarningsEvent, Quote, Snapshot,
    Symbol, TickerInfo,
};
