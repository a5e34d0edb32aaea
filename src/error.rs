//! Error handler for Tally.

use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::Error as SQLxError;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Field on which a uniqueness conflict was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DuplicateField {
    #[error("Email already registered")]
    Email,
    #[error("Username already taken")]
    Username,
    /// Unique violation reported by the store without a recognizable
    /// constraint name, e.g. when two registrations race.
    #[error("User already exists with this email or username")]
    EmailOrUsername,
}

/// Reason the identity middleware rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("Not authorized, no token")]
    MissingToken,
    #[error("Not authorized, token failed")]
    InvalidToken,
    #[error("Not authorized, user not found")]
    UnknownUser,
}

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error("{0}")]
    Duplicate(DuplicateField),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(#[from] AuthRejection),

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("SQL request failed: {0}")]
    Sql(#[from] SQLxError),

    #[error("internal server error, {details}")]
    Internal {
        details: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ServerError {
    /// Wrap an unexpected failure whose detail must stay server-side.
    pub fn internal(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal {
            details: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Structure for error responses.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip)]
    status: StatusCode,
}

impl ResponseError {
    /// Update error status code.
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    /// Update human-readable `message` field.
    pub fn message(mut self, message: &str) -> Self {
        self.message = message.into();
        self
    }

    /// Automatically add errors field.
    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(parse_validation_errors(errors));
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    pub fn into_response(self) -> std::result::Result<Response, axum::http::Error> {
        if let Ok(body) = serde_json::to_string(&self) {
            Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
        } else {
            Ok(internal_server_error())
        }
    }
}

impl Default for ResponseError {
    fn default() -> Self {
        Self {
            message: "Internal server error".to_owned(),
            errors: None,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue.to_string(),
            })
        })
        .collect()
}

fn join_validation_messages(errors: &ValidationErrors) -> String {
    parse_validation_errors(errors)
        .iter()
        .map(|err| err.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let response = ResponseError::default().status(StatusCode::BAD_REQUEST);

        let response = match &self {
            ServerError::Validation(validation_errors) => response
                .message(&join_validation_messages(validation_errors))
                .errors(validation_errors),

            ServerError::Axum(rejection) => response.message(&rejection.body_text()),

            ServerError::Duplicate(_) => response.message(&self.to_string()),

            ServerError::InvalidCredentials => response
                .message(&self.to_string())
                .status(StatusCode::UNAUTHORIZED),

            ServerError::Unauthorized(_) => response
                .message(&self.to_string())
                .status(StatusCode::UNAUTHORIZED),

            ServerError::NotFound { .. } => response
                .message(&self.to_string())
                .status(StatusCode::NOT_FOUND),

            ServerError::Sql(err) => {
                tracing::error!(error = %err, "SQL request failed");

                ResponseError::default()
            },

            ServerError::Internal { details, source } => {
                tracing::error!(error = ?source, %details, "server returned 500 status");

                ResponseError::default()
            },
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(
            serde_json::json!({
                "message": "Internal server error",
            })
            .to_string()
            .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}
