// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Access Tokens
//!
//! Stateless bearer tokens proving who the caller is.
//!
//! ## Schemes
//!
//! - [`LocalMaker`] - the whole [`Payload`] sealed with ChaCha20-Poly1305
//!   under a 32-byte symmetric key (`v1.local.` tokens)
//! - [`JwtMaker`] - HS256-signed JWT carrying the payload as claims
//!
//! A process runs exactly one scheme, chosen at startup by [`build_maker`].
//! Tokens never name the scheme that produced them; the configured maker is
//! the only authority.
//!
//! ## Failure classification
//!
//! Verification reports [`TokenError::InvalidToken`] for anything that fails
//! integrity or structure checks and [`TokenError::ExpiredToken`] only for an
//! authentic token whose `expired_at` has passed. Expiry is never evaluated
//! before integrity.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;

pub mod jwt;
pub mod local;
pub mod payload;

pub use jwt::JwtMaker;
pub use local::LocalMaker;
pub use payload::Payload;

/// Errors raised while issuing or verifying tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("cannot generate random token id")]
    RandomGeneration,

    #[error("invalid key size: must be {requirement}, got {actual} bytes")]
    InvalidKeySize {
        requirement: &'static str,
        actual: usize,
    },

    #[error("token duration must be positive")]
    InvalidDuration,

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("cannot encode token: {0}")]
    Encoding(String),

    #[error("token is invalid")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,
}

impl TokenError {
    /// Stable code used in API error bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::RandomGeneration => "random_generation_failed",
            TokenError::InvalidKeySize { .. } => "invalid_key_size",
            TokenError::InvalidDuration => "invalid_duration",
            TokenError::EmptyUsername => "empty_username",
            TokenError::Encoding(_) => "token_encoding_failed",
            TokenError::InvalidToken => "invalid_token",
            TokenError::ExpiredToken => "expired_token",
        }
    }
}

/// Issues and verifies access tokens.
///
/// Implementations hold only immutable key material, so one instance is
/// shared by every request through an `Arc<dyn Maker>`.
pub trait Maker: Send + Sync + std::fmt::Debug {
    /// Issue a token for `username` valid for `duration`.
    ///
    /// Returns the wire token together with the payload it carries, so the
    /// caller can echo metadata such as the expiry without verifying again.
    fn create_token(&self, username: &str, duration: Duration)
        -> Result<(String, Payload), TokenError>;

    /// Check a token and recover its payload.
    ///
    /// # Errors
    /// [`TokenError::InvalidToken`] or [`TokenError::ExpiredToken`]; never a
    /// partially populated payload.
    fn verify_token(&self, token: &str) -> Result<Payload, TokenError>;
}

/// Token scheme selected by operator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenScheme {
    /// Sealed `v1.local.` tokens.
    #[default]
    Local,
    /// HS256 JWTs.
    Jwt,
}

impl FromStr for TokenScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(TokenScheme::Local),
            "jwt" => Ok(TokenScheme::Jwt),
            other => Err(format!("unknown token scheme '{other}' (expected 'local' or 'jwt')")),
        }
    }
}

impl std::fmt::Display for TokenScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenScheme::Local => write!(f, "local"),
            TokenScheme::Jwt => write!(f, "jwt"),
        }
    }
}

/// Build the maker for `scheme`, validating `key` eagerly.
///
/// Called once at startup; an error here must stop the process.
pub fn build_maker(scheme: TokenScheme, key: &[u8]) -> Result<Arc<dyn Maker>, TokenError> {
    let maker: Arc<dyn Maker> = match scheme {
        TokenScheme::Local => Arc::new(LocalMaker::new(key)?),
        TokenScheme::Jwt => Arc::new(JwtMaker::new(key)?),
    };
    Ok(maker)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8; 32] = b"12345678901234567890123456789012";

    #[test]
    fn scheme_parses_case_insensitively() {
        assert_eq!("local".parse::<TokenScheme>(), Ok(TokenScheme::Local));
        assert_eq!("JWT".parse::<TokenScheme>(), Ok(TokenScheme::Jwt));
        assert!("paseto".parse::<TokenScheme>().is_err());
    }

    #[test]
    fn build_maker_round_trips_for_both_schemes() {
        for scheme in [TokenScheme::Local, TokenScheme::Jwt] {
            let maker = build_maker(scheme, KEY).unwrap();
            let (token, issued) = maker.create_token("alice", Duration::minutes(1)).unwrap();
            let verified = maker.verify_token(&token).unwrap();

            assert_eq!(verified, issued, "scheme {scheme}");
            assert_eq!(verified.username(), "alice");
            assert!(verified.issued_at() < verified.expired_at());
        }
    }

    #[test]
    fn build_maker_fails_fast_on_short_key() {
        for scheme in [TokenScheme::Local, TokenScheme::Jwt] {
            let err = build_maker(scheme, b"too-short").unwrap_err();
            assert!(matches!(err, TokenError::InvalidKeySize { actual: 9, .. }));
        }
    }

    #[test]
    fn non_positive_duration_issues_nothing() {
        for scheme in [TokenScheme::Local, TokenScheme::Jwt] {
            let maker = build_maker(scheme, KEY).unwrap();
            assert_eq!(
                maker.create_token("alice", Duration::zero()).unwrap_err(),
                TokenError::InvalidDuration
            );
            assert_eq!(
                maker.create_token("alice", Duration::seconds(-1)).unwrap_err(),
                TokenError::InvalidDuration
            );
        }
    }

    #[test]
    fn tokens_do_not_cross_schemes() {
        let local = build_maker(TokenScheme::Local, KEY).unwrap();
        let jwt = build_maker(TokenScheme::Jwt, KEY).unwrap();

        let (local_token, _) = local.create_token("alice", Duration::minutes(1)).unwrap();
        let (jwt_token, _) = jwt.create_token("alice", Duration::minutes(1)).unwrap();

        assert_eq!(jwt.verify_token(&local_token), Err(TokenError::InvalidToken));
        assert_eq!(local.verify_token(&jwt_token), Err(TokenError::InvalidToken));
    }

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(TokenError::InvalidToken.to_string(), "token is invalid");
        assert_eq!(TokenError::ExpiredToken.to_string(), "token has expired");
        assert_eq!(TokenError::ExpiredToken.error_code(), "expired_token");
    }
}
