//! In-memory fake of the Hunter v2 API for integration tests.
//!
//! Responses use the `{"data": ..., "meta": ...}` envelope of the real API.
//! Every request must carry the configured `api_key` query parameter,
//! otherwise the server answers 401 like Hunter does. A shared counter
//! records how many requests reached the server, so tests can tell cache
//! hits from network calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Domain whose search answers 200 with a body that is not JSON.
pub const BROKEN_DOMAIN: &str = "broken.test";

#[derive(Clone)]
pub struct MockState {
    api_key: Arc<str>,
    hits: Arc<AtomicUsize>,
}

impl MockState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::from(api_key),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Requests received so far, authenticated or not.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

type Params = Query<HashMap<String, String>>;

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/domain-search", get(domain_search))
        .route("/email-finder", get(email_finder))
        .route("/email-verifier", get(email_verifier))
        .route("/account", get(account))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

fn error(status: StatusCode, id: &str, details: &str) -> Response {
    let body = json!({
        "errors": [{ "id": id, "code": status.as_u16(), "details": details }]
    });
    (status, Json(body)).into_response()
}

/// Count the request and check its key.
fn authorize(state: &MockState, params: &HashMap<String, String>) -> Result<(), Response> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match params.get("api_key") {
        Some(key) if key.as_str() == &*state.api_key => Ok(()),
        Some(_) => Err(error(
            StatusCode::UNAUTHORIZED,
            "authentication_failed",
            "No user found for the API key supplied",
        )),
        None => Err(error(
            StatusCode::UNAUTHORIZED,
            "authentication_failed",
            "You are missing the api_key parameter",
        )),
    }
}

fn missing(field: &str) -> Response {
    error(
        StatusCode::BAD_REQUEST,
        "wrong_params",
        &format!("You are missing the {field} parameter"),
    )
}

fn parse_number(params: &HashMap<String, String>, key: &str, default: usize) -> usize {
    params
        .get(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn person(domain: &str, first: &str, last: &str, position: &str) -> Value {
    let local = format!("{}.{}", first.to_lowercase(), last.to_lowercase());
    json!({
        "value": format!("{local}@{domain}"),
        "type": "personal",
        "confidence": 92,
        "sources": [{
            "domain": domain,
            "uri": format!("http://{domain}/team"),
            "extracted_on": "2024-01-15",
            "last_seen_on": "2024-05-02",
            "still_on_page": true
        }],
        "first_name": first,
        "last_name": last,
        "position": position,
        "seniority": "senior",
        "department": "engineering",
        "linkedin": null,
        "twitter": null,
        "phone_number": null,
        "verification": { "date": "2024-05-02", "status": "valid" }
    })
}

async fn domain_search(State(state): State<MockState>, Query(params): Params) -> Response {
    if let Err(rejection) = authorize(&state, &params) {
        return rejection;
    }
    let Some(domain) = params.get("domain") else {
        return missing("domain");
    };
    if domain == BROKEN_DOMAIN {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }

    let limit = parse_number(&params, "limit", 10);
    let offset = parse_number(&params, "offset", 0);
    let people = [
        person(domain, "Ada", "Lovelace", "CTO"),
        person(domain, "Alan", "Turing", "Researcher"),
        person(domain, "Grace", "Hopper", "Engineer"),
    ];
    let emails: Vec<Value> = people.into_iter().skip(offset).take(limit).collect();

    let body = json!({
        "data": {
            "domain": domain,
            "disposable": false,
            "webmail": false,
            "accept_all": false,
            "pattern": "{first}.{last}",
            "organization": "Example Inc",
            "technologies": ["rust", "axum"],
            "country": "US",
            "emails": emails,
            "linked_domains": []
        },
        "meta": {
            "results": 3,
            "limit": limit,
            "offset": offset,
            "params": { "domain": domain, "type": params.get("type"), "seniority": null, "department": null }
        }
    });
    Json(body).into_response()
}

async fn email_finder(State(state): State<MockState>, Query(params): Params) -> Response {
    if let Err(rejection) = authorize(&state, &params) {
        return rejection;
    }
    let Some(domain) = params.get("domain") else {
        return missing("domain");
    };
    let (first, last) = match (
        params.get("first_name"),
        params.get("last_name"),
        params.get("full_name"),
    ) {
        (Some(first), Some(last), _) => (first.clone(), last.clone()),
        (_, _, Some(full)) => match full.split_once(' ') {
            Some((first, last)) => (first.to_string(), last.to_string()),
            None => (full.clone(), String::new()),
        },
        _ => return missing("first_name and last_name"),
    };

    let email = if last.is_empty() {
        format!("{}@{domain}", first.to_lowercase())
    } else {
        format!("{}.{}@{domain}", first.to_lowercase(), last.to_lowercase())
    };
    let body = json!({
        "data": {
            "first_name": first,
            "last_name": last,
            "email": email,
            "score": 97,
            "domain": domain,
            "accept_all": false,
            "position": "CTO",
            "company": "Example Inc",
            "sources": [],
            "verification": { "date": null, "status": null }
        },
        "meta": { "params": { "domain": domain } }
    });
    Json(body).into_response()
}

async fn email_verifier(State(state): State<MockState>, Query(params): Params) -> Response {
    if let Err(rejection) = authorize(&state, &params) {
        return rejection;
    }
    let Some(email) = params.get("email") else {
        return missing("email");
    };
    if !email.contains('@') {
        return error(
            StatusCode::BAD_REQUEST,
            "invalid_email",
            "The email parameter is invalid",
        );
    }

    let body = json!({
        "data": {
            "status": "valid",
            "result": "deliverable",
            "_deprecation_notice": "Using result is deprecated, use status instead",
            "score": 100,
            "email": email,
            "regexp": true,
            "gibberish": false,
            "disposable": false,
            "webmail": false,
            "mx_records": true,
            "smtp_server": true,
            "smtp_check": true,
            "accept_all": false,
            "block": false,
            "sources": []
        },
        "meta": { "params": { "email": email } }
    });
    Json(body).into_response()
}

async fn account(State(state): State<MockState>, Query(params): Params) -> Response {
    if let Err(rejection) = authorize(&state, &params) {
        return rejection;
    }
    let body = json!({
        "data": {
            "first_name": "Owner",
            "last_name": "Example",
            "email": "owner@example.com",
            "plan_name": "Free",
            "plan_level": 0,
            "reset_date": "2024-07-01",
            "team_id": 7,
            "calls": { "_deprecation_notice": "Sums searches and verifications", "used": 4, "available": 50 },
            "requests": { "searches": { "used": 2, "available": 25 } }
        }
    });
    Json(body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_builds_lowercase_address() {
        let value = person("example.com", "Ada", "Lovelace", "CTO");
        assert_eq!(value["value"], "ada.lovelace@example.com");
        assert_eq!(value["sources"][0]["uri"], "http://example.com/team");
    }

    #[test]
    fn authorize_counts_every_request() {
        let state = MockState::new("k");
        let mut params = HashMap::new();
        assert!(authorize(&state, &params).is_err());
        params.insert("api_key".to_string(), "wrong".to_string());
        assert!(authorize(&state, &params).is_err());
        params.insert("api_key".to_string(), "k".to_string());
        assert!(authorize(&state, &params).is_ok());
        assert_eq!(state.hits(), 3);
    }

    #[test]
    fn parse_number_falls_back_on_garbage() {
        let mut params = HashMap::new();
        params.insert("limit".to_string(), "abc".to_string());
        assert_eq!(parse_number(&params, "limit", 10), 10);
        params.insert("limit".to_string(), "2".to_string());
        assert_eq!(parse_number(&params, "limit", 10), 2);
    }
}
