// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::token::TokenError;

/// Reasons a request is refused before reaching a protected handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header present but not `<scheme> <credential>`
    InvalidAuthHeaderFormat,
    /// Scheme other than bearer
    UnsupportedAuthType(String),
    /// Token rejected by the maker
    Token(TokenError),
    /// Handler reached without the middleware having run
    PayloadMissing,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeaderFormat => "invalid_auth_header_format",
            AuthError::UnsupportedAuthType(_) => "unsupported_auth_type",
            AuthError::Token(e) => e.error_code(),
            AuthError::PayloadMissing => "authorization_payload_missing",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeaderFormat
            | AuthError::UnsupportedAuthType(_)
            | AuthError::Token(_) => StatusCode::UNAUTHORIZED,
            AuthError::PayloadMissing => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "authorization header is not provided"),
            AuthError::InvalidAuthHeaderFormat => {
                write!(f, "invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::UnsupportedAuthType(scheme) => {
                write!(f, "unsupported authorization type {scheme}")
            }
            AuthError::Token(e) => write!(f, "{e}"),
            AuthError::PayloadMissing => {
                write!(f, "authorization payload missing from request context")
            }
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Token(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(error: TokenError) -> Self {
        AuthError::Token(error)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
