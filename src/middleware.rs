//! Middlewares for routes.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::AppState;
use crate::error::{AuthRejection, Result};
use crate::user::CurrentUser;

const BEARER: &str = "Bearer ";

/// Middleware protecting authenticated routes. On success the resolved
/// [`CurrentUser`] travels to the handler through request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let user = resolve_identity(&state, req.headers()).await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Turn request headers into an identity.
///
/// A missing header or a non-bearer scheme counts as no token; a failed
/// signature, expiry or issuer check as an invalid one; a token whose
/// subject no longer exists as an unknown user. Header values are never
/// logged, only the rejection kind is.
pub(crate) async fn resolve_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<CurrentUser> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix(BEARER))
        .ok_or(AuthRejection::MissingToken)?;

    let claims = state.token.decode(token).map_err(|err| {
        tracing::debug!(error = %err, "token rejected");
        AuthRejection::InvalidToken
    })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or(AuthRejection::UnknownUser)?;

    Ok(user)
}
