//! Typed result models of the Hunter API.
//!
//! # Design
//! Models follow the public API contract: required fields are plain types,
//! optional ones are `Option`, lists default to empty when omitted. Fields
//! the API adds later are ignored rather than rejected. The models also
//! implement `Serialize` so the gateway service can forward them as-is.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// A syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_email(&value) {
            Ok(Self(value))
        } else {
            Err(format!("value is not a valid email address: {value:?}"))
        }
    }
}

impl FromStr for EmailAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// A public page where an address was seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSource {
    pub domain: String,
    pub uri: Url,
    pub extracted_on: String,
    pub last_seen_on: String,
    pub still_on_page: bool,
}

/// One address found by a domain search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub value: EmailAddress,
    #[serde(rename = "type")]
    pub email_type: String,
    pub confidence: i64,
    pub sources: Vec<EmailSource>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub seniority: Option<String>,
    pub department: Option<String>,
    pub linkedin: Option<Url>,
    pub twitter: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSearchMeta {
    pub results: i64,
    pub limit: i64,
    pub offset: i64,
    pub params: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSearchResult {
    pub domain: String,
    pub disposable: bool,
    pub webmail: bool,
    pub accept_all: bool,
    pub pattern: Option<String>,
    pub organization: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub youtube: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
    #[serde(default)]
    pub emails: Vec<EmailRecord>,
    /// Only filled from a bare payload that carries `meta` itself. The
    /// Hunter API sends `meta` beside `data`, so it is dropped with the
    /// envelope and stays `None` for live responses.
    pub meta: Option<DomainSearchMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailFinderResult {
    pub email: Option<EmailAddress>,
    pub score: Option<i64>,
    pub domain: String,
    pub format: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub seniority: Option<String>,
    pub department: Option<String>,
    pub linkedin: Option<Url>,
    pub twitter: Option<String>,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub sources: Vec<EmailSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailVerifierResult {
    /// `valid`, `invalid`, `accept_all`, `webmail`, `disposable` or `unknown`.
    pub status: String,
    pub result: String,
    pub score: i64,
    pub email: EmailAddress,
    pub regexp: bool,
    pub gibberish: bool,
    pub disposable: bool,
    pub webmail: bool,
    pub mx_records: bool,
    pub smtp_server: bool,
    pub smtp_check: bool,
    pub accept_all: bool,
    pub block: bool,
    #[serde(default)]
    pub sources: Vec<EmailSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfoResult {
    pub email: EmailAddress,
    pub plan_name: String,
    pub plan_level: i64,
    pub reset_date: String,
    pub team_id: Option<i64>,
    /// Usage counters keyed by name, e.g. `used` and `available`.
    pub calls: BTreeMap<String, Value>,
}
