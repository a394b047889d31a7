//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler can produce, from a malformed request body to a store outage,
//! ends up as one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError` and renders the API's error
//! envelope, `{"success": false, "error": "<message>"}`, with the matching status code.
//! `From` implementations for `StoreError`, `jsonwebtoken::errors::Error` and
//! `bcrypt::BcryptError` allow the `?` operator inside registries and handlers.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
///
/// Each variant carries the message that is sent back to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400).
    /// Also used for store-level uniqueness violations raised during a write.
    ValidationError(String),
    /// Missing credentials or credentials that do not match (HTTP 401).
    Unauthorized(String),
    /// A token was presented but its signature or expiry did not check out (HTTP 403).
    InvalidToken(String),
    /// The caller is authenticated but not allowed to touch the record (HTTP 403).
    Forbidden(String),
    /// The requested record does not exist (HTTP 404).
    NotFound(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// An unexpected failure reported by the store (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// The message that ends up in the `error` field of the response body.
    pub fn message(&self) -> &str {
        match self {
            AppError::ValidationError(msg)
            | AppError::Unauthorized(msg)
            | AppError::InvalidToken(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::InvalidToken(msg) => write!(f, "Invalid Token: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(json!({
            "success": false,
            "error": self.message()
        }))
    }
}

/// Constraint violations surface as validation failures; anything else is a store outage.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Duplicate(field) => {
                AppError::ValidationError(format!("{} already exists", field))
            }
            StoreError::Invalid(msg) => AppError::ValidationError(msg),
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::InvalidToken`.
///
/// The underlying reason (expired, bad signature, ...) is logged but not sent to the client.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("rejected token: {}", error);
        AppError::InvalidToken("Invalid token".into())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
