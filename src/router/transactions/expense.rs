//! Expense records.

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
    pub expense: Transaction,
}

/// Handler to record an expense for the authenticated user.
pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Valid(body): Valid<Body>,
) -> Result<Json<AddResponse>> {
    let expense = state
        .transactions
        .insert(NewTransaction {
            user_id: user.id,
            kind: TransactionKind::Expense,
            title: body.title,
            amount: body.amount,
            category: body.category,
            description: body.description,
            date: body.date,
        })
        .await?;

    tracing::debug!(user_id = %user.id, expense_id = %expense.id, "expense added");

    Ok(Json(AddResponse {
        message: "Expense Added".to_owned(),
        expense,
    }))
}

/// Handler listing the caller's expenses, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Transaction>>> {
    let expenses = state
        .transactions
        .list(user.id, TransactionKind::Expense)
        .await?;

    Ok(Json(expenses))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Handler deleting one of the caller's expenses.
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    state
        .transactions
        .delete(expense_id, user.id, TransactionKind::Expense)
        .await?
        .ok_or(ServerError::NotFound {
            resource: "Expense",
        })?;

    Ok(Json(DeleteResponse {
        message: "Expense Deleted".to_owned(),
    }))
}
