//! Get current account.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::user::CurrentUser;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Handler returning the authenticated account, re-read from the store so a
/// deletion landing mid-request turns into a 404 rather than stale data.
pub async fn handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Response>> {
    let user = state
        .users
        .find_by_id(user.id)
        .await?
        .ok_or(ServerError::NotFound { resource: "User" })?;

    Ok(Json(Response {
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}
