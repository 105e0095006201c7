//! Fallback routing across providers.
//!
//! One generic [`FallbackRouter::dispatch`] drives every operation:
//! cache first, then each capable provider in priority order under a
//! per-call timeout, validating each response before accepting it. A
//! provider failure, timeout, unsupported operation, or validation FAIL
//! records the reason and moves on to the next provider; cancellation
//! propagates immediately. When the chain is exhausted the caller gets
//! [`MarketDataError::AllProvidersFailed`] with one reason per attempt,
//! in attempt order.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use marketdata_core::{
    CacheKey, CachedValue, MarketDataCache, MarketDataError, MarketDataProvider, Operation,
    ProviderAttempt, QualityCheck, QualityReport, Result,
};

use crate::cancel::CancelToken;
use crate::config::ManagerConfig;
use crate::registry::ProviderRegistry;

/// Where a fetched value came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Served from the cache.
    Cache,
    /// Fetched from the named provider.
    Provider(String),
}

/// A fetched payload with its quality warnings and origin.
///
/// Warnings are advisory: data that only warns is returned and cached
/// normally. On a cache hit the warnings are recomputed from the stored
/// value, so callers see the same metadata either way.
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched<T> {
    /// The canonical payload.
    pub data: T,
    /// WARN-level quality checks raised against the payload.
    pub warnings: Vec<QualityCheck>,
    /// Where the payload came from.
    pub source: Source,
}

/// Routes one operation through the cache and the provider chain.
#[derive(Debug)]
pub(crate) struct FallbackRouter {
    registry: ProviderRegistry,
    cache: Arc<dyn MarketDataCache>,
    config: ManagerConfig,
}

impl FallbackRouter {
    pub(crate) fn new(cache: Arc<dyn MarketDataCache>, config: ManagerConfig) -> Self {
        Self {
            registry: ProviderRegistry::new(),
            cache,
            config,
        }
    }

    pub(crate) fn register(&mut self, provider: Arc<dyn MarketDataProvider>) {
        self.registry.register(provider);
    }

    /// Runs `operation` for `key`: cache, then providers in order.
    ///
    /// `fetch` performs the provider call; `validate` judges the result.
    /// Only Pass/Warn results are returned and cached. A validation FAIL
    /// is treated exactly like a provider error, so a later provider can
    /// still win the pass.
    pub(crate) async fn dispatch<T, F, V>(
        &self,
        operation: Operation,
        key: CacheKey,
        cancel: &CancelToken,
        fetch: F,
        validate: V,
    ) -> Result<Fetched<T>>
    where
        T: Clone + Into<CachedValue> + TryFrom<CachedValue, Error = MarketDataError>,
        F: Fn(Arc<dyn MarketDataProvider>) -> BoxFuture<'static, Result<T>>,
        V: Fn(&T) -> QualityReport,
    {
        if cancel.is_cancelled() {
            return Err(MarketDataError::Cancelled);
        }

        match self.cache.get(&key).await {
            // The key embeds the operation, so a payload of the wrong
            // type should be unreachable; treat one as a miss rather
            // than failing the operation.
            Ok(Some(value)) => match T::try_from(value) {
                Ok(data) => {
                    debug!(key = %key, "cache hit");
                    // A cached value was accepted when stored; only its
                    // WARN metadata is recomputed here, never a rejection.
                    let warnings = validate(&data).warnings();
                    return Ok(Fetched {
                        data,
                        warnings,
                        source: Source::Cache,
                    });
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "mismatched cache entry, treating as miss");
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed, treating as miss");
            }
        }

        let providers = self.registry.providers_for(operation)?;
        let mut attempts = Vec::new();

        for provider in providers {
            let name = provider.name().to_string();
            let timeout = self.config.timeout_for(&name);
            debug!(provider = %name, operation = %operation, key = %key, "fetching");

            let fut = fetch(Arc::clone(&provider));
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => Err(MarketDataError::Cancelled),
                outcome = tokio::time::timeout(timeout, fut) => match outcome {
                    Ok(inner) => inner,
                    Err(_) => Err(MarketDataError::Timeout {
                        provider: name.clone(),
                        timeout,
                    }),
                },
            };

            match result {
                Ok(data) => {
                    let report = validate(&data);
                    if report.usable() {
                        let warnings = report.warnings();
                        if let Err(e) = self.cache.put(key.clone(), data.clone().into()).await {
                            warn!(key = %key, error = %e, "failed to cache result");
                        }
                        debug!(provider = %name, operation = %operation, "fetch succeeded");
                        return Ok(Fetched {
                            data,
                            warnings,
                            source: Source::Provider(name),
                        });
                    }
                    let err = MarketDataError::Validation {
                        provider: name.clone(),
                        reasons: report.failures(),
                    };
                    warn!(provider = %name, error = %err, "rejecting response, trying next");
                    attempts.push(ProviderAttempt {
                        provider: name,
                        reason: err.to_string(),
                    });
                }
                Err(e) if e.triggers_fallback() => {
                    warn!(provider = %name, error = %e, "provider failed, trying next");
                    attempts.push(ProviderAttempt {
                        provider: name,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Err(MarketDataError::AllProvidersFailed {
            operation,
            attempts,
        })
    }
}
