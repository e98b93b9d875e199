//! Query parameter building.
//!
//! # Design
//! `QueryParams` is a `BTreeMap`, so iteration is always sorted by key. The
//! wire order and the cache key therefore never depend on the order in which
//! a call site inserted its arguments. Absent arguments are simply never
//! inserted.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use url::form_urlencoded;

use crate::error::ApiError;

pub const DEFAULT_LIMIT: u32 = 10;

/// Scalar value of a query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Sorted, `None`-free query parameters of one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, ParamValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    /// Insert `value` only when present.
    pub fn set_opt<V: Into<ParamValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs sorted by key, values serialized.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    /// Form-encoded `k1=v1&k2=v2` in key order, so `&` or `=` inside a
    /// value cannot collide with another query.
    pub fn canonical_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.entries {
            serializer.append_pair(k, &v.to_string());
        }
        serializer.finish()
    }
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Arguments of a domain search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainSearchParams {
    pub domain: String,
    pub email_type: Option<String>,
    pub seniority: Option<String>,
    pub department: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

impl DomainSearchParams {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            email_type: None,
            seniority: None,
            department: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    /// `personal` or `generic`.
    pub fn email_type(mut self, email_type: impl Into<String>) -> Self {
        self.email_type = Some(email_type.into());
        self
    }

    pub fn seniority(mut self, seniority: impl Into<String>) -> Self {
        self.seniority = Some(seniority.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .set("domain", self.domain.as_str())
            .set_opt("type", self.email_type.as_deref())
            .set_opt("seniority", self.seniority.as_deref())
            .set_opt("department", self.department.as_deref())
            .set("limit", self.limit)
            .set("offset", self.offset)
    }
}

/// Arguments of an email lookup by person name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmailFinderParams {
    pub domain: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
}

impl EmailFinderParams {
    pub fn with_full_name(domain: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            full_name: Some(full_name.into()),
            ..Self::default()
        }
    }

    pub fn with_names(
        domain: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            ..Self::default()
        }
    }

    /// Build the query, rejecting calls that name nobody.
    ///
    /// Empty strings count as missing for the precondition but are still
    /// sent when the precondition holds.
    pub fn to_query(&self) -> Result<QueryParams, ApiError> {
        let given = |name: &Option<String>| name.as_deref().is_some_and(|s| !s.is_empty());
        if !(given(&self.full_name) || (given(&self.first_name) && given(&self.last_name))) {
            return Err(ApiError::ArgumentError(
                "Either full_name or both first_name and last_name must be provided".to_string(),
            ));
        }
        Ok(QueryParams::new()
            .set("domain", self.domain.as_str())
            .set_opt("first_name", self.first_name.as_deref())
            .set_opt("last_name", self.last_name.as_deref())
            .set_opt("full_name", self.full_name.as_deref()))
    }
}

pub fn email_verifier_query(email: &str) -> QueryParams {
    QueryParams::new().set("email", email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_are_dropped() {
        let query = DomainSearchParams::new("example.com").to_query();
        assert_eq!(query.canonical_string(), "domain=example.com&limit=10&offset=0");
        assert!(query.get("type").is_none());
        assert!(query.get("seniority").is_none());
        assert!(query.get("department").is_none());
    }

    #[test]
    fn canonical_string_escapes_separators() {
        let smuggled = QueryParams::new()
            .set("domain", "x.com&first_name=A")
            .set("full_name", "B");
        let plain = QueryParams::new()
            .set("domain", "x.com")
            .set("first_name", "A")
            .set("full_name", "B");
        assert_ne!(smuggled.canonical_string(), plain.canonical_string());
        assert_eq!(
            smuggled.canonical_string(),
            "domain=x.com%26first_name%3DA&full_name=B"
        );
    }

    #[test]
    fn email_type_is_sent_as_type() {
        let query = DomainSearchParams::new("example.com")
            .email_type("personal")
            .department("it")
            .limit(5)
            .offset(20)
            .to_query();
        assert_eq!(query.get("type"), Some(&ParamValue::Str("personal".to_string())));
        assert_eq!(query.get("limit"), Some(&ParamValue::Int(5)));
        assert_eq!(
            query.canonical_string(),
            "department=it&domain=example.com&limit=5&offset=20&type=personal"
        );
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = QueryParams::new().set("b", 2i64).set("a", "x").set("c", true);
        let b = QueryParams::new().set("c", true).set("a", "x").set("b", 2i64);
        assert_eq!(a, b);
        assert_eq!(a.canonical_string(), "a=x&b=2&c=true");
        assert_eq!(a.pairs(), b.pairs());
    }

    #[test]
    fn set_opt_skips_none() {
        let query = QueryParams::new()
            .set_opt::<&str>("missing", None)
            .set_opt("present", Some("yes"));
        assert_eq!(query.len(), 1);
        assert_eq!(query.canonical_string(), "present=yes");
    }

    #[test]
    fn finder_accepts_full_name() {
        let query = EmailFinderParams::with_full_name("example.com", "Ada Lovelace")
            .to_query()
            .unwrap();
        assert_eq!(query.canonical_string(), "domain=example.com&full_name=Ada Lovelace");
    }

    #[test]
    fn finder_accepts_first_and_last_name() {
        let query = EmailFinderParams::with_names("example.com", "Ada", "Lovelace")
            .to_query()
            .unwrap();
        assert_eq!(
            query.canonical_string(),
            "domain=example.com&first_name=Ada&last_name=Lovelace"
        );
    }

    #[test]
    fn finder_rejects_first_name_only() {
        let params = EmailFinderParams {
            domain: "example.com".to_string(),
            first_name: Some("Ada".to_string()),
            ..EmailFinderParams::default()
        };
        let err = params.to_query().unwrap_err();
        assert!(matches!(err, ApiError::ArgumentError(_)));
        assert_eq!(
            err.to_string(),
            "Either full_name or both first_name and last_name must be provided"
        );
    }

    #[test]
    fn finder_treats_empty_names_as_missing() {
        let params = EmailFinderParams {
            domain: "example.com".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some(String::new()),
            full_name: Some(String::new()),
        };
        assert!(matches!(params.to_query(), Err(ApiError::ArgumentError(_))));
    }

    #[test]
    fn domain_search_params_deserialize_with_defaults() {
        let params: DomainSearchParams =
            serde_json::from_str(r#"{"domain":"example.com","seniority":"senior"}"#).unwrap();
        assert_eq!(params.limit, 10);
        assert_eq!(params.offset, 0);
        assert_eq!(params.seniority.as_deref(), Some("senior"));
    }
}
