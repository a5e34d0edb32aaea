//! Create a new account.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{DuplicateField, Result, ServerError};
use crate::router::Valid;
use crate::user::NewUser;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(
        min = 6,
        message = "Password must be at least 6 characters long."
    ))]
    pub password: String,
}

/// Also answered by the login handler.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}

/// Handler to create user. Registering doubles as a first login, the
/// response carries a fresh token.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Response>)> {
    let username = body.username.to_lowercase();
    let email = body.email.to_lowercase();

    // Pre-check for field-specific messages, email first. The unique
    // constraints stay the source of truth when two registrations race.
    if let Some(existing) =
        state.users.find_by_email_or_username(&email).await?
    {
        let field = if existing.email == email {
            DuplicateField::Email
        } else {
            DuplicateField::Username
        };
        return Err(ServerError::Duplicate(field));
    }
    if state
        .users
        .find_by_email_or_username(&username)
        .await?
        .is_some()
    {
        return Err(ServerError::Duplicate(DuplicateField::Username));
    }

    let password_hash = state
        .crypto
        .hash_password(&body.password)
        .map_err(ServerError::internal)?;
    let user = state
        .users
        .insert(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;
    let token = state.token.create(user.id).map_err(ServerError::internal)?;

    tracing::info!(user_id = %user.id, "account created");

    Ok((
        StatusCode::CREATED,
        Json(Response {
            id: user.id,
            username: user.username,
            email: user.email,
            token,
        }),
    ))
}
