//! Fixed endpoint descriptors of the Hunter v2 API.

use crate::http::HttpMethod;

/// Base URL of the public Hunter API.
pub const HUNTER_API_BASE_URL: &str = "https://api.hunter.io/v2";

/// Path and method of one API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: HttpMethod,
}

impl Endpoint {
    const fn get(path: &'static str) -> Self {
        Self {
            path,
            method: HttpMethod::Get,
        }
    }
}

pub const DOMAIN_SEARCH: Endpoint = Endpoint::get("/domain-search");
pub const EMAIL_FINDER: Endpoint = Endpoint::get("/email-finder");
pub const EMAIL_VERIFIER: Endpoint = Endpoint::get("/email-verifier");
pub const ACCOUNT: Endpoint = Endpoint::get("/account");
