//! Tally is a lightweight income and expense tracker API.

#![forbid(unsafe_code)]

pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
mod middleware;
mod router;
pub mod telemetry;
pub mod token;
pub mod transaction;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::Router;
use axum::http::{Method, header};
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

use crate::transaction::TransactionRepository;
use crate::user::UserRepository;

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request =
            request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    app.oneshot(request.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub users: Arc<dyn UserRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub crypto: Arc<crypto::PasswordManager>,
    pub token: token::TokenManager,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Mark credentials sensitive before anything can trace them.
        .layer(SetSensitiveHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers(Any)
                .vary([header::AUTHORIZATION]),
        );

    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::handler))
        // `POST /api/v1/auth/register`, `/login` and `GET /me`.
        .nest("/api/v1/auth", router::auth::router(state.clone()))
        // Income and expense routes, all behind authentication.
        .nest("/api/v1", router::transactions::router(state.clone()))
        .with_state(state)
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>>
{
    // read configuration file. let it in memory.
    let config = config::Configuration::default().read();

    let db = match config.postgres {
        Some(ref config) => {
            database::Database::new(
                &config.address,
                &config
                    .username
                    .clone()
                    .unwrap_or(database::DEFAULT_CREDENTIALS.into()),
                &config
                    .password
                    .clone()
                    .unwrap_or(database::DEFAULT_CREDENTIALS.into()),
                &config
                    .database
                    .clone()
                    .unwrap_or(database::DEFAULT_DATABASE_NAME.into()),
                config.pool_size.unwrap_or(database::DEFAULT_POOL_SIZE),
            )
            .await?
        },
        None => {
            tracing::error!("missing `postgres` entry on `config.yaml` file");
            std::process::exit(1);
        },
    };

    // execute migrations scripts on start.
    db.migrate().await?;

    let crypto = Arc::new(crypto::PasswordManager::new(config.argon2.clone())?);

    // handle jwt. without a secret every issued token would be worthless.
    let secret = std::env::var("TOKEN_SECRET")
        .ok()
        .or_else(|| config.token.as_ref().and_then(|token| token.secret.clone()));
    let Some(secret) = secret else {
        tracing::error!(
            "missing `TOKEN_SECRET` environment variable and `token.secret` entry on `config.yaml` file"
        );
        std::process::exit(1);
    };
    let token = token::TokenManager::new(&config.name, &secret);

    let users: Arc<dyn UserRepository> =
        Arc::new(user::PgUserRepository::new(db.postgres.clone()));
    let transactions: Arc<dyn TransactionRepository> =
        Arc::new(transaction::PgTransactionRepository::new(db.postgres.clone()));

    Ok(AppState {
        config,
        users,
        transactions,
        crypto,
        token,
    })
}
