//! Account-related HTTP API.
pub mod login;
pub mod me;
pub mod register;

use axum::routing::{get, post};
use axum::{Router, middleware};

use crate::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        // `GET /auth/me` goes to `me`. Authorization required.
        .route("/me", get(me::handler))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::authenticate,
        ));

    Router::new()
        // `POST /auth/register` goes to `register`.
        .route("/register", post(register::handler))
        // `POST /auth/login` goes to `login`.
        .route("/login", post(login::handler))
        .merge(protected)
}
