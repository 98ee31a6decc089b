// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity claim carried inside every access token.

use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;
use uuid::Uuid;

use super::TokenError;

/// Identity claim embedded in an access token.
///
/// A `Payload` is a value: it is built once by [`Payload::new`] and never
/// mutated. One obtained from [`super::Maker::verify_token`] is authentic;
/// there is intentionally no public way to deserialize one from untrusted
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    id: Uuid,
    username: String,
    issued_at: DateTime<Utc>,
    expired_at: DateTime<Utc>,
}

impl Payload {
    /// Create a payload for `username` valid for `duration` starting now.
    pub fn new(username: &str, duration: Duration) -> Result<Self, TokenError> {
        Self::new_at(username, duration, Utc::now())
    }

    /// Create a payload issued at an explicit instant.
    ///
    /// # Errors
    /// - [`TokenError::EmptyUsername`] for an empty principal
    /// - [`TokenError::InvalidDuration`] unless `duration` is strictly positive
    /// - [`TokenError::RandomGeneration`] if the system RNG fails
    pub fn new_at(
        username: &str,
        duration: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, TokenError> {
        if username.is_empty() {
            return Err(TokenError::EmptyUsername);
        }
        if duration <= Duration::zero() {
            return Err(TokenError::InvalidDuration);
        }
        let expired_at = issued_at
            .checked_add_signed(duration)
            .ok_or(TokenError::InvalidDuration)?;

        Ok(Self {
            id: random_id()?,
            username: username.to_string(),
            issued_at,
            expired_at,
        })
    }

    /// Reassemble a payload recovered from a verified token.
    pub(crate) fn from_parts(
        id: Uuid,
        username: String,
        issued_at: DateTime<Utc>,
        expired_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            issued_at,
            expired_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The authenticated principal.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expired_at(&self) -> DateTime<Utc> {
        self.expired_at
    }

    /// True once the current time is past `expired_at`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expired_at
    }
}

/// 128 random bits laid out as a version 4 UUID.
fn random_id() -> Result<Uuid, TokenError> {
    let mut bytes = [0u8; 16];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| TokenError::RandomGeneration)?;
    Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
}
