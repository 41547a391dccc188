//! In-memory transport with canned responses.
//!
//! Routes match on method and path (the query string is ignored, but every
//! request is recorded so callers can inspect it). Each call yields to the
//! executor once before answering, so concurrent callers genuinely overlap.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::transport::{ApiRequest, Method, Transport};

type RouteKey = (Method, String);

#[derive(Default)]
struct Routes {
    queued: HashMap<RouteKey, VecDeque<Result<Value>>>,
    fixed: HashMap<RouteKey, Result<Value>>,
    log: Vec<ApiRequest>,
}

#[derive(Default)]
pub struct MemoryTransport {
    routes: Mutex<Routes>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Routes> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer every matching request with `value`.
    pub fn respond(&self, method: Method, path: &str, value: Value) {
        self.lock().fixed.insert((method, path.to_string()), Ok(value));
    }

    /// Fail every matching request with `error`.
    pub fn fail(&self, method: Method, path: &str, error: ApiError) {
        self.lock().fixed.insert((method, path.to_string()), Err(error));
    }

    /// Answer the next matching request with `result`, ahead of any fixed route.
    pub fn respond_once(&self, method: Method, path: &str, result: Result<Value>) {
        self.lock()
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back(result);
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().log.clone()
    }

    pub fn request_count(&self, method: Method, path: &str) -> usize {
        self.lock()
            .log
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    fn answer(&self, request: &ApiRequest) -> Result<Value> {
        let mut routes = self.lock();
        routes.log.push(request.clone());
        let key = (request.method, request.path.clone());
        if let Some(result) = routes.queued.get_mut(&key).and_then(VecDeque::pop_front) {
            return result;
        }
        routes
            .fixed
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Err(ApiError::NotFound {
                    path: request.path.clone(),
                })
            })
    }
}

impl Transport for MemoryTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        tokio::task::yield_now().await;
        self.answer(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queued_response_wins_over_fixed() {
        let transport = MemoryTransport::new();
        transport.respond(Method::Get, "/admin/subjects", json!([]));
        transport.respond_once(Method::Get, "/admin/subjects", Err(ApiError::Timeout));

        let first = transport.execute(ApiRequest::get("/admin/subjects")).await;
        let second = transport.execute(ApiRequest::get("/admin/subjects")).await;

        assert_eq!(first, Err(ApiError::Timeout));
        assert_eq!(second, Ok(json!([])));
        assert_eq!(transport.request_count(Method::Get, "/admin/subjects"), 2);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let transport = MemoryTransport::new();
        let result = transport.execute(ApiRequest::get("/admin/nowhere")).await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));
    }
}
