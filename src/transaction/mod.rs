mod repository;

pub use repository::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a record adds to or subtracts from the balance.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Income or expense record as saved on database, always owned by a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    /// When the money moved, as stated by the user.
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a [`Transaction`].
#[derive(Clone, Debug, PartialEq)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: DateTime<Utc>,
}
