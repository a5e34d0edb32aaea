//! Handle transaction database requests.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::Result;
use crate::transaction::{NewTransaction, Transaction, TransactionKind};

/// Persistence operations for income and expense records.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Insert a new [`Transaction`].
    async fn insert(&self, entry: NewTransaction) -> Result<Transaction>;

    /// List a user's transactions of one kind, newest first.
    async fn list(
        &self,
        user_id: Uuid,
        kind: TransactionKind,
    ) -> Result<Vec<Transaction>>;

    /// Delete a user's transaction and return it. `None` when the id does
    /// not exist or the record belongs to someone else.
    async fn delete(
        &self,
        transaction_id: Uuid,
        user_id: Uuid,
        kind: TransactionKind,
    ) -> Result<Option<Transaction>>;
}

#[derive(Clone)]
pub struct PgTransactionRepository {
    pool: Pool<Postgres>,
}

impl PgTransactionRepository {
    /// Create a new [`PgTransactionRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PgTransactionRepository {
    async fn insert(&self, entry: NewTransaction) -> Result<Transaction> {
        let inserted = sqlx::query_as::<_, Transaction>(
            r#"INSERT INTO transactions
                (id, user_id, kind, title, amount, category, description, date)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, user_id, title, amount, kind, category,
                    description, date, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.user_id)
        .bind(entry.kind)
        .bind(&entry.title)
        .bind(entry.amount)
        .bind(&entry.category)
        .bind(&entry.description)
        .bind(entry.date)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn list(
        &self,
        user_id: Uuid,
        kind: TransactionKind,
    ) -> Result<Vec<Transaction>> {
        let entries = sqlx::query_as::<_, Transaction>(
            r#"SELECT id, user_id, title, amount, kind, category,
                    description, date, created_at
                FROM transactions
                WHERE user_id = $1 AND kind = $2
                ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn delete(
        &self,
        transaction_id: Uuid,
        user_id: Uuid,
        kind: TransactionKind,
    ) -> Result<Option<Transaction>> {
        let deleted = sqlx::query_as::<_, Transaction>(
            r#"DELETE FROM transactions
                WHERE id = $1 AND user_id = $2 AND kind = $3
                RETURNING id, user_id, title, amount, kind, category,
                    description, date, created_at"#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deleted)
    }
}

/// In-memory implementation for handler tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryTransactionRepository {
    entries: std::sync::Mutex<Vec<Transaction>>,
}

#[cfg(test)]
#[async_trait]
impl TransactionRepository for MemoryTransactionRepository {
    async fn insert(&self, entry: NewTransaction) -> Result<Transaction> {
        let mut entries = self.entries.lock().unwrap();

        let entry = Transaction {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            title: entry.title,
            amount: entry.amount,
            kind: entry.kind,
            category: entry.category,
            description: entry.description,
            date: entry.date,
            created_at: chrono::Utc::now(),
        };
        entries.push(entry.clone());

        Ok(entry)
    }

    async fn list(
        &self,
        user_id: Uuid,
        kind: TransactionKind,
    ) -> Result<Vec<Transaction>> {
        let entries = self.entries.lock().unwrap();

        let mut owned: Vec<Transaction> = entries
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.kind == kind)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(owned)
    }

    async fn delete(
        &self,
        transaction_id: Uuid,
        user_id: Uuid,
        kind: TransactionKind,
    ) -> Result<Option<Transaction>> {
        let mut entries = self.entries.lock().unwrap();

        let position = entries.iter().position(|entry| {
            entry.id == transaction_id
                && entry.user_id == user_id
                && entry.kind == kind
        });

        Ok(position.map(|index| entries.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn entry(user_id: Uuid, kind: TransactionKind, title: &str) -> NewTransaction {
        NewTransaction {
            user_id,
            kind,
            title: title.to_owned(),
            amount: 42.5,
            category: "misc".to_owned(),
            description: "test entry".to_owned(),
            date: Utc::now() - Duration::days(1),
        }
    }

    #[tokio::test]
    async fn test_listing_is_scoped_and_newest_first() {
        let repository = MemoryTransactionRepository::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        repository
            .insert(entry(alice, TransactionKind::Income, "salary"))
            .await
            .unwrap();
        repository
            .insert(entry(alice, TransactionKind::Income, "freelance"))
            .await
            .unwrap();
        repository
            .insert(entry(alice, TransactionKind::Expense, "rent"))
            .await
            .unwrap();
        repository
            .insert(entry(bob, TransactionKind::Income, "salary"))
            .await
            .unwrap();

        let incomes = repository
            .list(alice, TransactionKind::Income)
            .await
            .unwrap();

        assert_eq!(incomes.len(), 2);
        assert_eq!(incomes[0].title, "freelance");
        assert_eq!(incomes[1].title, "salary");
        assert!(incomes.iter().all(|entry| entry.user_id == alice));
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let repository = MemoryTransactionRepository::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let salary = repository
            .insert(entry(alice, TransactionKind::Income, "salary"))
            .await
            .unwrap();

        // Bob cannot delete Alice's record.
        let stolen = repository
            .delete(salary.id, bob, TransactionKind::Income)
            .await
            .unwrap();
        assert!(stolen.is_none());

        // Kind must match the route used.
        let wrong_kind = repository
            .delete(salary.id, alice, TransactionKind::Expense)
            .await
            .unwrap();
        assert!(wrong_kind.is_none());

        let deleted = repository
            .delete(salary.id, alice, TransactionKind::Income)
            .await
            .unwrap();
        assert_eq!(deleted, Some(salary));

        let remaining = repository
            .list(alice, TransactionKind::Income)
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }
}
