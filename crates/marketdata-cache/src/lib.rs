#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/quantfold/marketdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// In-memory TTL + LRU cache.
pub mod memory;
/// No-op cache.
pub mod noop;

// Re-export the trait for convenience
pub use marketdata_core::MarketDataCache;

pub use memory::{DEFAULT_MAX_ENTRIES, MemoryCache};
pub use noop::NoopCache;
