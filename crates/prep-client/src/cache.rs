//! Deduplicating query cache.
//!
//! Concurrent reads of the same [`QueryKey`] share one in-flight request,
//! including its failure. Successful results are kept until invalidated;
//! failures are never kept. Invalidation detaches in-flight requests of the
//! affected keys, so a response that started before a mutation can never
//! land in the cache after it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::keys::{QueryKey, ResourceFamily};

type SharedFetch = Shared<BoxFuture<'static, Result<Value>>>;

struct InFlight {
    id: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, Value>,
    inflight: HashMap<QueryKey, InFlight>,
    next_id: u64,
}

/// What a mutation drops from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// Every list and detail key of the family.
    Family(ResourceFamily),
    /// One key.
    Exact(QueryKey),
}

impl Invalidation {
    fn covers(&self, key: &QueryKey) -> bool {
        match self {
            Self::Family(family) => key.family() == *family,
            Self::Exact(exact) => exact == key,
        }
    }
}

#[derive(Default)]
pub struct QueryCache {
    state: Mutex<CacheState>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached value for `key`, or the shared result of `loader`.
    ///
    /// `loader` is only called when neither a cached value nor an in-flight
    /// request exists for `key`.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, loader: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let (id, future) = {
            let mut state = self.lock();
            if let Some(value) = state.entries.get(key) {
                debug!(family = key.family().as_str(), "cache hit");
                return Ok(value.clone());
            }
            match state.inflight.get(key) {
                Some(inflight) => {
                    debug!(family = key.family().as_str(), "joining in-flight request");
                    (inflight.id, inflight.future.clone())
                }
                None => {
                    debug!(family = key.family().as_str(), "cache miss");
                    let id = state.next_id;
                    state.next_id += 1;
                    let future = loader().boxed().shared();
                    state.inflight.insert(
                        key.clone(),
                        InFlight {
                            id,
                            future: future.clone(),
                        },
                    );
                    (id, future)
                }
            }
        };

        let result = future.await;

        let mut state = self.lock();
        let still_current = state
            .inflight
            .get(key)
            .is_some_and(|inflight| inflight.id == id);
        if still_current {
            state.inflight.remove(key);
            if let Ok(value) = &result {
                state.entries.insert(key.clone(), value.clone());
            }
        } else if result.is_ok() && !state.entries.contains_key(key) {
            debug!(
                family = key.family().as_str(),
                "dropping response invalidated while in flight"
            );
        }
        result
    }

    /// Drop cached values and detach in-flight requests covered by `target`.
    pub fn invalidate(&self, target: &Invalidation) {
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|key, _| !target.covers(key));
        state.inflight.retain(|key, _| !target.covers(key));
        debug!(
            invalidation = ?target,
            dropped = before - state.entries.len(),
            "invalidated cache entries"
        );
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.lock().inflight.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.inflight.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::keys::QuestionFilters;
    use serde_json::json;

    fn questions() -> QueryKey {
        QueryKey::Questions(QuestionFilters::default())
    }

    #[tokio::test]
    async fn test_success_is_cached() {
        let cache = QueryCache::new();
        let first = cache
            .fetch(&QueryKey::Subjects, || async { Ok(json!([1])) })
            .await
            .unwrap();
        let second = cache
            .fetch(&QueryKey::Subjects, || async {
                Err(ApiError::Network("must not be called".to_string()))
            })
            .await
            .unwrap();
        assert_eq!(first, second);
        assert!(cache.contains(&QueryKey::Subjects));
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = QueryCache::new();
        let err = cache
            .fetch(&QueryKey::Subjects, || async { Err(ApiError::Timeout) })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Timeout);
        assert!(!cache.contains(&QueryKey::Subjects));
        assert!(!cache.is_in_flight(&QueryKey::Subjects));
    }

    #[tokio::test]
    async fn test_family_invalidation_drops_detail_keys() {
        let cache = QueryCache::new();
        let detail = QueryKey::QuestionDetail("q1".to_string());
        cache.fetch(&questions(), || async { Ok(json!([])) }).await.unwrap();
        cache.fetch(&detail, || async { Ok(json!({})) }).await.unwrap();
        cache.fetch(&QueryKey::Subjects, || async { Ok(json!([])) }).await.unwrap();

        cache.invalidate(&Invalidation::Family(ResourceFamily::Questions));

        assert!(!cache.contains(&questions()));
        assert!(!cache.contains(&detail));
        assert!(cache.contains(&QueryKey::Subjects));
    }

    #[tokio::test]
    async fn test_exact_invalidation_keeps_siblings() {
        let cache = QueryCache::new();
        let detail = QueryKey::QuestionDetail("q1".to_string());
        cache.fetch(&questions(), || async { Ok(json!([])) }).await.unwrap();
        cache.fetch(&detail, || async { Ok(json!({})) }).await.unwrap();

        cache.invalidate(&Invalidation::Exact(detail.clone()));

        assert!(cache.contains(&questions()));
        assert!(!cache.contains(&detail));
        assert_eq!(cache.len(), 1);
    }
}
