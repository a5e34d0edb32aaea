//! Income and expense HTTP API.
pub mod expense;
pub mod income;

use axum::routing::{delete, get, post};
use axum::{Router, middleware};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;

/// Shared payload for income and expense creation.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(min = 1, message = "Title is required!"))]
    pub title: String,
    #[validate(range(
        exclusive_min = 0.0,
        message = "Amount must be a positive number!"
    ))]
    pub amount: f64,
    #[validate(length(min = 1, message = "Category is required!"))]
    pub category: String,
    #[validate(length(min = 1, message = "Description is required!"))]
    pub description: String,
    /// When the money moved.
    pub date: DateTime<Utc>,
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // `POST /add-income` goes to `income::add`.
        .route("/add-income", post(income::add))
        // `GET /get-incomes` goes to `income::list`.
        .route("/get-incomes", get(income::list))
        // `DELETE /delete-income/{id}` goes to `income::remove`.
        .route("/delete-income/{id}", delete(income::remove))
        // `POST /add-expense` goes to `expense::add`.
        .route("/add-expense", post(expense::add))
        // `GET /get-expenses` goes to `expense::list`.
        .route("/get-expenses", get(expense::list))
        // `DELETE /delete-expense/{id}` goes to `expense::remove`.
        .route("/delete-expense/{id}", delete(expense::remove))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::authenticate,
        ))
}
