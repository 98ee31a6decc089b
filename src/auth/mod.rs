// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Gates protected endpoints behind bearer tokens issued by a
//! [`crate::token::Maker`].
//!
//! ## Auth Flow
//!
//! 1. Client logs in and receives an access token
//! 2. Client sends `Authorization: Bearer <token>` on every request
//! 3. [`auth_middleware`]:
//!    - Splits the header into scheme and credential
//!    - Accepts only the `bearer` scheme (any case)
//!    - Verifies the credential with the configured maker
//!    - Stores the payload in the request extensions as [`AuthorizationPayload`]
//! 4. Handlers extract [`AuthorizationPayload`] and treat its username as the
//!    principal for ownership checks
//!
//! ## Security
//!
//! - No session state on the server; every token is self-contained
//! - Every failure is a 401 and the handler never runs
//! - Tokens are never logged

pub mod error;
pub mod extractor;
pub mod middleware;

pub use error::AuthError;
pub use extractor::AuthorizationPayload;
pub use middleware::{auth_middleware, authenticate};
