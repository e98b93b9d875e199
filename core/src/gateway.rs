//! Authenticated GET gateway with a response cache in front of it.
//!
//! # Design
//! The gateway owns both the transport and the cache; dropping the
//! transport (on close) and clearing the cache always happen together. The
//! cache sits behind a `Mutex` that is released before the network call, so
//! a slow request never blocks cache hits from other threads.
//!
//! Only 2xx responses are stored. An error response is handed back to the
//! caller once and the next identical call goes to the network again.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::cache::{cache_key, RequestCache};
use crate::endpoints::Endpoint;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::params::QueryParams;

const API_KEY_PARAM: &str = "api_key";

pub struct HttpGateway {
    base_url: String,
    api_key: String,
    transport: Option<Box<dyn Transport>>,
    cache: Mutex<RequestCache>,
}

impl HttpGateway {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        transport: Box<dyn Transport>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            transport: Some(transport),
            cache: Mutex::new(RequestCache::new(cache_capacity)),
        }
    }

    /// Issue `GET {base_url}{endpoint.path}` with `params` and the API key.
    ///
    /// With `use_cache`, an earlier successful response for the same
    /// endpoint and parameters is returned without a network call.
    pub fn get(
        &self,
        endpoint: &Endpoint,
        params: &QueryParams,
        use_cache: bool,
    ) -> Result<HttpResponse, ApiError> {
        let transport = self.transport.as_ref().ok_or(TransportError::Closed)?;
        let key = cache_key(endpoint, params);

        if use_cache {
            if let Some(hit) = self.lock_cache().get(&key) {
                debug!(%key, "cache hit");
                return Ok(hit.clone());
            }
            debug!(%key, "cache miss");
        }

        let request = self.build_request(endpoint, params);
        debug!(method = endpoint.method.as_str(), url = %request.url, "sending request");
        let response = transport.execute(&request)?;

        if use_cache && response.is_success() {
            if let Some(evicted) = self.lock_cache().put(key, response.clone()) {
                debug!(key = %evicted, "cache eviction");
            }
        }
        Ok(response)
    }

    fn build_request(&self, endpoint: &Endpoint, params: &QueryParams) -> HttpRequest {
        let mut query = Vec::with_capacity(params.len() + 1);
        query.push((API_KEY_PARAM.to_string(), self.api_key.clone()));
        query.extend(params.pairs());
        HttpRequest {
            method: endpoint.method,
            url: format!("{}{}", self.base_url, endpoint.path),
            query,
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    /// Drop the transport and discard every cached response.
    pub fn close(&mut self) {
        self.transport = None;
        self.lock_cache().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    // The cache holds plain data; a panic elsewhere cannot leave it torn.
    fn lock_cache(&self) -> MutexGuard<'_, RequestCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use super::*;
    use crate::endpoints::{ACCOUNT, DOMAIN_SEARCH};

    /// Records requests and replays queued responses; repeats the last one
    /// when the queue runs dry.
    #[derive(Clone, Default)]
    pub(crate) struct StubTransport {
        pub requests: Arc<Mutex<Vec<HttpRequest>>>,
        responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    }

    impl StubTransport {
        pub fn respond(self, status: u16, body: &str) -> Self {
            self.respond_bytes(status, body.as_bytes())
        }

        pub fn respond_bytes(self, status: u16, body: &[u8]) -> Self {
            self.responses.lock().unwrap().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_vec(),
            }));
            self
        }

        pub fn fail(self, err: TransportError) -> Self {
            self.responses.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl Transport for StubTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.pop_front().unwrap()
            } else {
                responses.front().cloned().unwrap()
            }
        }
    }

    fn gateway(stub: &StubTransport, capacity: usize) -> HttpGateway {
        HttpGateway::new("https://api.test/v2/", "secret", Box::new(stub.clone()), capacity)
    }

    #[test]
    fn injects_api_key_and_sorted_params() {
        let stub = StubTransport::default().respond(200, "{}");
        let gw = gateway(&stub, 8);
        let params = QueryParams::new().set("offset", 0u32).set("domain", "example.com");
        gw.get(&DOMAIN_SEARCH, &params, true).unwrap();

        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests[0].url, "https://api.test/v2/domain-search");
        assert_eq!(
            requests[0].query,
            vec![
                ("api_key".to_string(), "secret".to_string()),
                ("domain".to_string(), "example.com".to_string()),
                ("offset".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn identical_calls_hit_the_cache() {
        let stub = StubTransport::default().respond(200, r#"{"n":1}"#);
        let gw = gateway(&stub, 8);
        let a = QueryParams::new().set("domain", "example.com").set("limit", 5u32);
        let b = QueryParams::new().set("limit", 5u32).set("domain", "example.com");

        let first = gw.get(&DOMAIN_SEARCH, &a, true).unwrap();
        let second = gw.get(&DOMAIN_SEARCH, &b, true).unwrap();
        assert_eq!(first, second);
        assert_eq!(stub.calls(), 1);
        assert_eq!(gw.cached_entries(), 1);
    }

    #[test]
    fn bypassing_the_cache_neither_reads_nor_writes() {
        let stub = StubTransport::default().respond(200, "{}");
        let gw = gateway(&stub, 8);
        let params = QueryParams::new();

        gw.get(&ACCOUNT, &params, false).unwrap();
        assert_eq!(gw.cached_entries(), 0);

        gw.get(&ACCOUNT, &params, true).unwrap();
        gw.get(&ACCOUNT, &params, false).unwrap();
        assert_eq!(stub.calls(), 3);
    }

    #[test]
    fn error_responses_are_not_cached() {
        let stub = StubTransport::default()
            .respond(503, "busy")
            .respond(200, "{}");
        let gw = gateway(&stub, 8);

        let first = gw.get(&ACCOUNT, &QueryParams::new(), true).unwrap();
        assert_eq!(first.status, 503);
        assert_eq!(gw.cached_entries(), 0);

        let second = gw.get(&ACCOUNT, &QueryParams::new(), true).unwrap();
        assert_eq!(second.status, 200);
        assert_eq!(stub.calls(), 2);
    }

    #[test]
    fn evicts_oldest_query_at_capacity() {
        let stub = StubTransport::default().respond(200, "{}");
        let gw = gateway(&stub, 2);
        let query = |d: &str| QueryParams::new().set("domain", d);

        gw.get(&DOMAIN_SEARCH, &query("a.com"), true).unwrap();
        gw.get(&DOMAIN_SEARCH, &query("b.com"), true).unwrap();
        gw.get(&DOMAIN_SEARCH, &query("c.com"), true).unwrap();
        assert_eq!(gw.cached_entries(), 2);
        assert_eq!(stub.calls(), 3);

        gw.get(&DOMAIN_SEARCH, &query("b.com"), true).unwrap();
        assert_eq!(stub.calls(), 3);
        gw.get(&DOMAIN_SEARCH, &query("a.com"), true).unwrap();
        assert_eq!(stub.calls(), 4);
    }

    #[test]
    fn transport_failures_propagate_unchanged() {
        let stub = StubTransport::default().fail(TransportError::Timeout("deadline".to_string()));
        let gw = gateway(&stub, 8);
        let err = gw.get(&ACCOUNT, &QueryParams::new(), true).unwrap_err();
        assert!(matches!(
            err,
            ApiError::TransportError(TransportError::Timeout(ref msg)) if msg == "deadline"
        ));
        assert_eq!(gw.cached_entries(), 0);
    }

    #[test]
    fn closed_gateway_refuses_calls_and_forgets_cache() {
        let stub = StubTransport::default().respond(200, "{}");
        let mut gw = gateway(&stub, 8);
        gw.get(&ACCOUNT, &QueryParams::new(), true).unwrap();
        assert_eq!(gw.cached_entries(), 1);

        gw.close();
        assert!(gw.is_closed());
        assert_eq!(gw.cached_entries(), 0);

        let err = gw.get(&ACCOUNT, &QueryParams::new(), true).unwrap_err();
        assert!(matches!(err, ApiError::TransportError(TransportError::Closed)));
        assert_eq!(stub.calls(), 1);
    }
}
