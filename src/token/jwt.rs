// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 JWT tokens.
//!
//! The payload travels as claims:
//!
//! - `id`, `username` - custom claims
//! - `iat`, `exp` - registered claims, the only place the validity window is
//!   stored (NumericDate, whole seconds; `iat` rounds down, `exp` rounds up)
//!
//! Expiry is judged against the caller's clock after the signature and claim
//! shape have been checked, never by the decoder itself.
//!
//! Only `HS256` is accepted. A token whose header names any other algorithm
//! is rejected before its signature or claims are looked at.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Maker, Payload, TokenError};

/// Minimum secret length in bytes.
pub const MIN_SECRET_SIZE: usize = 32;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims for an access token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: Uuid,
    username: String,
    iat: i64,
    exp: i64,
}

impl Claims {
    fn from_payload(payload: &Payload) -> Self {
        Self {
            id: payload.id(),
            username: payload.username().to_string(),
            iat: payload.issued_at().timestamp(),
            exp: ceil_seconds(payload.expired_at()),
        }
    }

    fn into_payload(self) -> Result<Payload, TokenError> {
        let issued_at = DateTime::from_timestamp(self.iat, 0).ok_or(TokenError::InvalidToken)?;
        let expired_at = DateTime::from_timestamp(self.exp, 0).ok_or(TokenError::InvalidToken)?;
        if self.username.is_empty() || expired_at <= issued_at {
            return Err(TokenError::InvalidToken);
        }
        Ok(Payload::from_parts(self.id, self.username, issued_at, expired_at))
    }
}

/// Whole seconds, rounded up, so a positive duration never collapses to
/// `exp == iat`.
fn ceil_seconds(instant: DateTime<Utc>) -> i64 {
    let secs = instant.timestamp();
    if instant.timestamp_subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Maker for HS256 JWTs.
#[derive(Clone)]
pub struct JwtMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtMaker {
    /// Create a maker from a shared secret of at least 32 bytes.
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_SIZE {
            return Err(TokenError::InvalidKeySize {
                requirement: "at least 32 bytes",
                actual: secret.len(),
            });
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Issue a token at `now`.
    ///
    /// The returned payload is the one verification will reconstruct, so its
    /// timestamps are whole seconds.
    pub fn create_token_at(
        &self,
        username: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new_at(username, duration, now)?;
        let claims = Claims::from_payload(&payload);

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;
        let payload = claims
            .into_payload()
            .map_err(|_| TokenError::InvalidDuration)?;

        Ok((token, payload))
    }

    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Payload, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::InvalidToken)?;
        let payload = data.claims.into_payload()?;

        if payload.is_expired_at(now) {
            return Err(TokenError::ExpiredToken);
        }
        Ok(payload)
    }
}

impl Maker for JwtMaker {
    fn create_token(
        &self,
        username: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError> {
        self.create_token_at(username, duration, Utc::now())
    }

    fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        self.verify_token_at(token, Utc::now())
    }
}

impl std::fmt::Debug for JwtMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtMaker")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}
