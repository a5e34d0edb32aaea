//! Income records.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Body;
use crate::AppState;
use crate::error::{Result, ServerError};
use crate::router::Valid;
use crate::transaction::{NewTransaction, Transaction, TransactionKind};
use crate::user::CurrentUser;

#[derive(Debug, Serialize, Deserialize)]
pub struct AddResponse {
    pub message: String,
    pub income: Transaction,
}

/// Handler to record an income for the authenticated user.
pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Valid(body): Valid<Body>,
) -> Result<Json<AddResponse>> {
    let income = state
        .transactions
        .insert(NewTransaction {
            user_id: user.id,
            kind: TransactionKind::Income,
            title: body.title,
            amount: body.amount,
            category: body.category,
            description: body.description,
            date: body.date,
        })
        .await?;

    tracing::debug!(user_id = %user.id, income_id = %income.id, "income added");

    Ok(Json(AddResponse {
        message: "Income Added".to_owned(),
        income,
    }))
}

/// Handler listing the caller's incomes, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Transaction>>> {
    let incomes = state
        .transactions
        .list(user.id, TransactionKind::Income)
        .await?;

    Ok(Json(incomes))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub income: Transaction,
}

/// Handler deleting one of the caller's incomes. Records owned by someone
/// else behave as absent.
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(income_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    let income = state
        .transactions
        .delete(income_id, user.id, TransactionKind::Income)
        .await?
        .ok_or(ServerError::NotFound { resource: "Income" })?;

    Ok(Json(DeleteResponse {
        message: "Income Deleted".to_owned(),
        income,
    }))
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;

    use crate::{app, make_request, router};

    async fn register(app: Router, username: &str) -> String {
        let response = make_request(
            app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "correct-horse",
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        body["token"].as_str().unwrap().to_owned()
    }

    fn salary() -> String {
        json!({
            "title": "Salary",
            "amount": 2500.0,
            "category": "work",
            "description": "March paycheck",
            "date": "2024-03-01T09:00:00Z",
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_add_then_list_income() {
        let app = app(router::state());
        let token = register(app.clone(), "alice").await;

        let response = make_request(
            app.clone(),
            Method::POST,
            "/api/v1/add-income",
            Some(&token),
            salary(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Income Added");
        assert_eq!(body["income"]["title"], "Salary");
        assert_eq!(body["income"]["type"], "income");
        assert!(body["income"]["createdAt"].is_string());

        let response = make_request(
            app,
            Method::GET,
            "/api/v1/get-incomes",
            Some(&token),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let incomes: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let incomes = incomes.as_array().unwrap();
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0]["amount"], 2500.0);
    }

    #[tokio::test]
    async fn test_add_income_rejects_non_positive_amount() {
        let app = app(router::state());
        let token = register(app.clone(), "alice").await;

        for amount in [0.0, -12.5] {
            let response = make_request(
                app.clone(),
                Method::POST,
                "/api/v1/add-income",
                Some(&token),
                json!({
                    "title": "Salary",
                    "amount": amount,
                    "category": "work",
                    "description": "March paycheck",
                    "date": "2024-03-01T09:00:00Z",
                })
                .to_string(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let body = response.into_body().collect().await.unwrap().to_bytes();
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["message"], "Amount must be a positive number!");
        }
    }

    #[tokio::test]
    async fn test_add_income_rejects_empty_title() {
        let app = app(router::state());
        let token = register(app.clone(), "alice").await;

        let response = make_request(
            app,
            Method::POST,
            "/api/v1/add-income",
            Some(&token),
            json!({
                "title": "",
                "amount": 10.0,
                "category": "work",
                "description": "March paycheck",
                "date": "2024-03-01T09:00:00Z",
            })
            .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Title is required!");
    }

    #[tokio::test]
    async fn test_delete_income() {
        let app = app(router::state());
        let token = register(app.clone(), "alice").await;

        let response = make_request(
            app.clone(),
            Method::POST,
            "/api/v1/add-income",
            Some(&token),
            salary(),
        )
        .await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let income_id = body["income"]["id"].as_str().unwrap().to_owned();

        let response = make_request(
            app.clone(),
            Method::DELETE,
            &format!("/api/v1/delete-income/{income_id}"),
            Some(&token),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Income Deleted");
        assert_eq!(body["income"]["id"].as_str().unwrap(), income_id);

        // Gone means gone.
        let response = make_request(
            app,
            Method::DELETE,
            &format!("/api/v1/delete-income/{income_id}"),
            Some(&token),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Income not found");
    }

    #[tokio::test]
    async fn test_incomes_are_owner_scoped() {
        let app = app(router::state());
        let alice = register(app.clone(), "alice").await;
        let bob = register(app.clone(), "bob").await;

        let response = make_request(
            app.clone(),
            Method::POST,
            "/api/v1/add-income",
            Some(&alice),
            salary(),
        )
        .await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let income_id = body["income"]["id"].as_str().unwrap().to_owned();

        // Bob sees nothing and deletes nothing.
        let response = make_request(
            app.clone(),
            Method::GET,
            "/api/v1/get-incomes",
            Some(&bob),
            String::default(),
        )
        .await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let incomes: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(incomes.as_array().unwrap().is_empty());

        let response = make_request(
            app,
            Method::DELETE,
            &format!("/api/v1/delete-income/{income_id}"),
            Some(&bob),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_income_routes_require_token() {
        let app = app(router::state());

        let response = make_request(
            app.clone(),
            Method::GET,
            "/api/v1/get-incomes",
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = make_request(
            app,
            Method::POST,
            "/api/v1/add-income",
            None,
            salary(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
