//! HTTP routes.

pub mod auth;
pub mod status;
pub mod transactions;

use axum::Json;
use axum::extract::{FromRequest, Request};
use validator::Validate;

use crate::error::ServerError;

/// JSON extractor running the body through its [`Validate`] rules, so
/// handlers only ever see well-formed input.
pub struct Valid<T>(pub T);

impl<T, S> FromRequest<S> for Valid<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;

        Ok(Self(data))
    }
}

#[cfg(test)]
pub(crate) const TEST_SECRET: &str = "test-secret-never-in-production";

#[cfg(test)]
pub(crate) fn state() -> crate::AppState {
    state_with_users(std::sync::Arc::new(
        crate::user::MemoryUserRepository::default(),
    ))
}

/// Test state over in-memory repositories. Hashing parameters are lowered so
/// suites stay fast.
#[cfg(test)]
pub(crate) fn state_with_users(
    users: std::sync::Arc<crate::user::MemoryUserRepository>,
) -> crate::AppState {
    use std::sync::Arc;

    let config = Arc::new(crate::config::Configuration::default());
    let crypto =
        crate::crypto::PasswordManager::new(Some(crate::config::Argon2 {
            memory_cost: 1024 * 19,
            iterations: 2,
            parallelism: 1,
            hash_length: 32,
        }))
        .unwrap();

    crate::AppState {
        token: crate::token::TokenManager::new(&config.name, TEST_SECRET),
        crypto: Arc::new(crypto),
        users,
        transactions: Arc::new(
            crate::transaction::MemoryTransactionRepository::default(),
        ),
        config,
    }
}
