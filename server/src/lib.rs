//! HTTP front end for the Hunter client.
//!
//! # Design
//! Every request gets a fresh `HunterClient` from the `ClientFactory` and
//! drops it when the handler finishes, so the client cache lives for one
//! request. Client calls block, so they run on `spawn_blocking`.
//!
//! Failures are mapped by error kind: upstream HTTP errors keep their status,
//! argument errors become 400, everything else is a 500 with a `detail`
//! message.

pub mod config;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hunter_core::{
    AccountInfoResult, ApiError, DomainSearchParams, DomainSearchResult, EmailAddress,
    EmailFinderParams, EmailFinderResult, EmailVerifierResult, ErrorKind, HunterClient,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, warn};

use crate::config::ServerConfig;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("HUNTER_API_KEY environment variable not set")]
    MissingApiKey,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            ServerError::MissingApiKey => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ServerError::Api(err) => match err.kind() {
                ErrorKind::Http => {
                    let status = err
                        .status_code()
                        .and_then(|code| StatusCode::from_u16(code).ok())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                    (status, err.to_string())
                }
                ErrorKind::Argument => (StatusCode::BAD_REQUEST, err.to_string()),
                ErrorKind::Parse | ErrorKind::Validation => {
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
                ErrorKind::Transport => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal server error: {err}"),
                ),
            },
            ServerError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {msg}"),
            ),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        warn!(status = status.as_u16(), %detail, "request failed");
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Source of per-request clients.
pub trait ClientFactory: Send + Sync {
    fn create(&self) -> Result<HunterClient, ServerError>;
}

/// Clients for the configured API key, base URL and timeout.
pub struct ConfiguredClientFactory {
    config: ServerConfig,
}

impl ConfiguredClientFactory {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for ConfiguredClientFactory {
    fn create(&self) -> Result<HunterClient, ServerError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ServerError::MissingApiKey)?;
        Ok(HunterClient::builder(api_key)
            .base_url(&self.config.base_url)
            .timeout(self.config.timeout)
            .build())
    }
}

#[derive(Clone)]
pub struct AppState {
    factory: Arc<dyn ClientFactory>,
}

impl AppState {
    pub fn new(factory: impl ClientFactory + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Run `op` against a fresh client on the blocking pool.
    async fn with_client<T, F>(&self, op: F) -> Result<T, ServerError>
    where
        T: Send + 'static,
        F: FnOnce(&HunterClient) -> Result<T, ApiError> + Send + 'static,
    {
        let factory = Arc::clone(&self.factory);
        tokio::task::spawn_blocking(move || {
            let client = factory.create()?;
            op(&client).map_err(ServerError::from)
        })
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailVerifierRequest {
    pub email: EmailAddress,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/domain-search", get(domain_search))
        .route("/email-finder", post(email_finder))
        .route("/email-verifier", post(email_verifier))
        .route("/account", get(account))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Hunter.io API Client",
        "docs": "/docs",
        "openapi": "/openapi.json",
    }))
}

async fn domain_search(
    State(state): State<AppState>,
    Query(params): Query<DomainSearchParams>,
) -> Result<Json<DomainSearchResult>, ServerError> {
    debug!(domain = %params.domain, "GET /domain-search");
    let result = state
        .with_client(move |client| client.domain().search(&params))
        .await?;
    Ok(Json(result))
}

async fn email_finder(
    State(state): State<AppState>,
    Json(params): Json<EmailFinderParams>,
) -> Result<Json<EmailFinderResult>, ServerError> {
    debug!(domain = %params.domain, "POST /email-finder");
    let result = state
        .with_client(move |client| client.email().find(&params))
        .await?;
    Ok(Json(result))
}

async fn email_verifier(
    State(state): State<AppState>,
    Json(request): Json<EmailVerifierRequest>,
) -> Result<Json<EmailVerifierResult>, ServerError> {
    debug!("POST /email-verifier");
    let result = state
        .with_client(move |client| client.email().verify(request.email.as_str()))
        .await?;
    Ok(Json(result))
}

async fn account(State(state): State<AppState>) -> Result<Json<AccountInfoResult>, ServerError> {
    debug!("GET /account");
    let result = state
        .with_client(|client| client.account().get_information())
        .await?;
    Ok(Json(result))
}
