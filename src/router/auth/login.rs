//! Log into an account.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::router::Valid;
use crate::router::auth::register::Response;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// Handler to log a user in. Unknown email and wrong password answer the
/// exact same way so accounts cannot be enumerated.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    let email = body.email.to_lowercase();

    let user = state
        .users
        .find_by_email_or_username(&email)
        .await?
        // A username landing in the email field is not a credential.
        .filter(|user| user.email == email)
        .ok_or(ServerError::InvalidCredentials)?;

    if !state
        .crypto
        .verify_password(&body.password, &user.password_hash)
    {
        return Err(ServerError::InvalidCredentials);
    }

    let token = state.token.create(user.id).map_err(ServerError::internal)?;

    tracing::debug!(user_id = %user.id, "user logged in");

    Ok(Json(Response {
        id: user.id,
        username: user.username,
        email: user.email,
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;

    use crate::{app, make_request, router};

    async fn register_alice(app: axum::Router) {
        let response = make_request(
            app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "correct-horse",
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_login_handler() {
        let state = router::state();
        let app = app(state.clone());
        register_alice(app.clone()).await;

        // Email case does not matter.
        let response = make_request(
            app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({
                "email": "Alice@Example.com",
                "password": "correct-horse",
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.username, "alice");

        let claims = state.token.decode(&body.token).unwrap();
        assert_eq!(claims.sub, body.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let app = app(router::state());
        register_alice(app.clone()).await;

        let wrong_password = make_request(
            app.clone(),
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({
                "email": "alice@example.com",
                "password": "not-her-password",
            })
            .to_string(),
        )
        .await;
        let unknown_email = make_request(
            app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({
                "email": "nobody@example.com",
                "password": "correct-horse",
            })
            .to_string(),
        )
        .await;

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

        let wrong_password = wrong_password
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes();
        let unknown_email =
            unknown_email.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(wrong_password, unknown_email);

        let body: serde_json::Value =
            serde_json::from_slice(&wrong_password).unwrap();
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_rejects_username_in_email_field() {
        let app = app(router::state());
        register_alice(app.clone()).await;

        let response = make_request(
            app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({
                "email": "alice",
                "password": "correct-horse",
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_with_empty_fields() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({
                "email": "",
                "password": "",
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
    }
}
