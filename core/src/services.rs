//! Operation groups of the Hunter API.
//!
//! Each service borrows the client's gateway and composes parameter
//! building, the cached GET and response processing for its endpoints.

use tracing::debug;

use crate::endpoints::{ACCOUNT, DOMAIN_SEARCH, EMAIL_FINDER, EMAIL_VERIFIER};
use crate::error::ApiError;
use crate::gateway::HttpGateway;
use crate::params::{email_verifier_query, DomainSearchParams, EmailFinderParams, QueryParams};
use crate::response::process;
use crate::types::{AccountInfoResult, DomainSearchResult, EmailFinderResult, EmailVerifierResult};

#[derive(Clone, Copy)]
pub struct DomainService<'a> {
    gateway: &'a HttpGateway,
}

impl<'a> DomainService<'a> {
    pub(crate) fn new(gateway: &'a HttpGateway) -> Self {
        Self { gateway }
    }

    /// Every address Hunter knows for `params.domain`.
    pub fn search(&self, params: &DomainSearchParams) -> Result<DomainSearchResult, ApiError> {
        debug!(domain = %params.domain, limit = params.limit, offset = params.offset, "domain search");
        let response = self.gateway.get(&DOMAIN_SEARCH, &params.to_query(), true)?;
        process(&response)
    }
}

#[derive(Clone, Copy)]
pub struct EmailService<'a> {
    gateway: &'a HttpGateway,
}

impl<'a> EmailService<'a> {
    pub(crate) fn new(gateway: &'a HttpGateway) -> Self {
        Self { gateway }
    }

    /// Most likely address of a person at a domain.
    ///
    /// Fails with `ArgumentError` without any network call unless a full
    /// name, or both first and last name, are given.
    pub fn find(&self, params: &EmailFinderParams) -> Result<EmailFinderResult, ApiError> {
        let query = params.to_query()?;
        debug!(domain = %params.domain, "email finder");
        let response = self.gateway.get(&EMAIL_FINDER, &query, true)?;
        process(&response)
    }

    pub fn verify(&self, email: &str) -> Result<EmailVerifierResult, ApiError> {
        debug!("email verifier");
        let response = self.gateway.get(&EMAIL_VERIFIER, &email_verifier_query(email), true)?;
        process(&response)
    }
}

#[derive(Clone, Copy)]
pub struct AccountService<'a> {
    gateway: &'a HttpGateway,
}

impl<'a> AccountService<'a> {
    pub(crate) fn new(gateway: &'a HttpGateway) -> Self {
        Self { gateway }
    }

    pub fn get_information(&self) -> Result<AccountInfoResult, ApiError> {
        let response = self.gateway.get(&ACCOUNT, &QueryParams::new(), true)?;
        process(&response)
    }
}
