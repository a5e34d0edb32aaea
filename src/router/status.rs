//! Public instance page for front-end identification.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Structured instance metadata.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Status {
    name: String,
    version: String,
}

/// Public server status, taken from the injected configuration.
pub async fn handler(State(state): State<AppState>) -> Json<Status> {
    Json(Status {
        name: state.config.name.clone(),
        version: state.config.version().to_owned(),
    })
}
