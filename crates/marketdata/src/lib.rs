#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/quantfold/marketdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Multi-provider market data orchestration.
//!
//! This crate re-exports the canonical model from `marketdata-core` and
//! the cache backends from `marketdata-cache`, and adds the
//! orchestration layer on top:
//!
//! - [`ProviderRegistry`] - providers in priority order, filterable by
//!   capability
//! - [`MarketDataManager`] - the facade every caller goes through:
//!   parameter checks, cache-first reads, quality validation, provider
//!   fallback, per-call timeouts
//! - [`ManagerConfig`] - timeouts, cache TTLs, and cache sizing
//! - [`CancelToken`] - cooperative cancellation of in-flight operations
//!
//! # Features
//!
//! - `mock` (default) - re-exports [`MockProvider`] for tests and local
//!   development

// Core types and traits
pub use marketdata_core::*;

// Cache implementations
pub use marketdata_cache::{MemoryCache, NoopCache};

// Mock provider for tests and local development
#[cfg(feature = "mock")]
pub use marketdata_mock::MockProvider;

mod cancel;
mod config;
mod manager;
mod registry;
mod router;

pub use cancel::CancelToken;
pub use config::{DEFAULT_PROVIDER_TIMEOUT, ManagerConfig};
pub use manager::MarketDataManager;
pub use registry::ProviderRegistry;
pub use router::{Fetched, Source};
