//! Blocking client for the Hunter contact-discovery API.
//!
//! # Overview
//! Domain search, email finder, email verifier and account information,
//! mapped from Hunter's JSON into typed results.
//!
//! # Design
//! - `HunterClient` owns an `HttpGateway`; services borrow it.
//! - Every call runs the same pipeline: parameters are built without absent
//!   values and sorted by key, the gateway injects the API key and consults
//!   a bounded FIFO cache, then the response is checked, parsed, unwrapped
//!   from its `data` envelope and mapped.
//! - Each stage has its own `ApiError` variant, so callers can tell argument,
//!   HTTP, parse, validation and transport failures apart.
//! - The network sits behind the `Transport` trait; `UreqTransport` is the
//!   default implementation.

pub mod cache;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod http;
pub mod params;
pub mod response;
pub mod services;
pub mod types;

pub use cache::{RequestCache, DEFAULT_CACHE_CAPACITY};
pub use client::{create_client, HunterClient, HunterClientBuilder, DEFAULT_TIMEOUT};
pub use endpoints::{Endpoint, HUNTER_API_BASE_URL};
pub use error::{ApiError, ErrorKind, TransportError};
pub use gateway::HttpGateway;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use params::{DomainSearchParams, EmailFinderParams, ParamValue, QueryParams};
pub use services::{AccountService, DomainService, EmailService};
pub use types::{
    AccountInfoResult, DomainSearchMeta, DomainSearchResult, EmailAddress, EmailFinderResult,
    EmailRecord, EmailSource, EmailVerifierResult,
};
