//! Client facade over the Hunter services.
//!
//! # Design
//! `HunterClient` exclusively owns one `HttpGateway` (transport and cache).
//! Services are cheap borrowed views handed out by `domain()`, `email()` and
//! `account()`, so they cannot outlive the client. The connection and the
//! cache are released by `close()` or, at the latest, when the client is
//! dropped, which covers early returns through `?` and unwinding.

use std::time::Duration;

use tracing::debug;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::endpoints::HUNTER_API_BASE_URL;
use crate::gateway::HttpGateway;
use crate::http::{Transport, UreqTransport};
use crate::services::{AccountService, DomainService, EmailService};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HunterClient {
    gateway: HttpGateway,
}

impl HunterClient {
    /// Client for the public API using a `ureq` transport.
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        Self::builder(api_key).timeout(timeout).build()
    }

    pub fn builder(api_key: &str) -> HunterClientBuilder {
        HunterClientBuilder::new(api_key)
    }

    pub fn domain(&self) -> DomainService<'_> {
        DomainService::new(&self.gateway)
    }

    pub fn email(&self) -> EmailService<'_> {
        EmailService::new(&self.gateway)
    }

    pub fn account(&self) -> AccountService<'_> {
        AccountService::new(&self.gateway)
    }

    /// Release the connection and discard cached responses. Later calls
    /// fail with `TransportError::Closed`. Calling it twice is a no-op.
    pub fn close(&mut self) {
        if !self.gateway.is_closed() {
            debug!("closing hunter client");
            self.gateway.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.gateway.is_closed()
    }

    /// Number of responses currently cached.
    pub fn cached_responses(&self) -> usize {
        self.gateway.cached_entries()
    }
}

impl Drop for HunterClient {
    fn drop(&mut self) {
        self.close();
    }
}

/// Create an owned client for the public API.
pub fn create_client(api_key: &str, timeout: Duration) -> HunterClient {
    HunterClient::new(api_key, timeout)
}

pub struct HunterClientBuilder {
    api_key: String,
    timeout: Duration,
    base_url: String,
    cache_capacity: usize,
    transport: Option<Box<dyn Transport>>,
}

impl HunterClientBuilder {
    fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            timeout: DEFAULT_TIMEOUT,
            base_url: HUNTER_API_BASE_URL.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            transport: None,
        }
    }

    /// Per-request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Replace the `ureq` transport; `timeout` is then up to `transport`.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn build(self) -> HunterClient {
        let transport = self
            .transport
            .unwrap_or_else(|| Box::new(UreqTransport::new(self.timeout)) as Box<dyn Transport>);
        HunterClient {
            gateway: HttpGateway::new(&self.base_url, self.api_key, transport, self.cache_capacity),
        }
    }
}
