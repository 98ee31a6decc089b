// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the verified token payload.
//!
//! [`AuthorizationPayload`] is the well-known key under which
//! [`super::auth_middleware`] stores the payload in the request extensions.
//! Protected handlers take it as an argument:
//!
//! ```rust,ignore
//! async fn my_handler(AuthorizationPayload(payload): AuthorizationPayload) -> impl IntoResponse {
//!     // payload.username() is the authenticated principal
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::AuthError;
use crate::token::Payload;

/// Verified payload attached to a request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationPayload(pub Payload);

impl AuthorizationPayload {
    /// The authenticated principal.
    pub fn username(&self) -> &str {
        self.0.username()
    }
}

impl<S> FromRequestParts<S> for AuthorizationPayload
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthorizationPayload>()
            .cloned()
            .ok_or(AuthError::PayloadMissing)
    }
}
