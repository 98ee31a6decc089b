// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sealed local tokens.
//!
//! ## Wire format
//!
//! ```text
//! v1.local.<base64url(nonce || ciphertext || tag)>
//! ```
//!
//! - `nonce`: 12 random bytes, fresh per token
//! - `ciphertext || tag`: ChaCha20-Poly1305 over the JSON payload, with the
//!   `v1.local.` header as associated data
//!
//! The payload is opaque to clients and tamper-evident: any modified byte
//! makes the tag check fail before the payload is even parsed.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Duration, Utc};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, CHACHA20_POLY1305, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Maker, Payload, TokenError};

/// Header prefix, also bound as associated data.
const HEADER: &str = "v1.local.";

/// Required symmetric key length (ChaCha20-Poly1305).
pub const KEY_SIZE: usize = 32;

/// Sealed form of [`Payload`].
#[derive(Serialize, Deserialize)]
struct SealedPayload {
    id: Uuid,
    username: String,
    issued_at: DateTime<Utc>,
    expired_at: DateTime<Utc>,
}

impl From<&Payload> for SealedPayload {
    fn from(payload: &Payload) -> Self {
        Self {
            id: payload.id(),
            username: payload.username().to_string(),
            issued_at: payload.issued_at(),
            expired_at: payload.expired_at(),
        }
    }
}

impl From<SealedPayload> for Payload {
    fn from(sealed: SealedPayload) -> Self {
        Payload::from_parts(sealed.id, sealed.username, sealed.issued_at, sealed.expired_at)
    }
}

/// Maker for `v1.local.` tokens.
pub struct LocalMaker {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl LocalMaker {
    /// Create a maker from a 32-byte symmetric key.
    pub fn new(symmetric_key: &[u8]) -> Result<Self, TokenError> {
        if symmetric_key.len() != KEY_SIZE {
            return Err(TokenError::InvalidKeySize {
                requirement: "exactly 32 bytes",
                actual: symmetric_key.len(),
            });
        }
        let unbound = UnboundKey::new(&CHACHA20_POLY1305, symmetric_key).map_err(|_| {
            TokenError::InvalidKeySize {
                requirement: "exactly 32 bytes",
                actual: symmetric_key.len(),
            }
        })?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    pub fn create_token_at(
        &self,
        username: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new_at(username, duration, now)?;

        let mut in_out = serde_json::to_vec(&SealedPayload::from(&payload))
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| TokenError::RandomGeneration)?;

        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(HEADER.as_bytes()),
                &mut in_out,
            )
            .map_err(|_| TokenError::Encoding("encryption failed".to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);

        let token = format!("{HEADER}{}", Base64UrlUnpadded::encode_string(&sealed));
        Ok((token, payload))
    }

    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Payload, TokenError> {
        let body = token
            .strip_prefix(HEADER)
            .ok_or(TokenError::InvalidToken)?;
        let mut sealed =
            Base64UrlUnpadded::decode_vec(body).map_err(|_| TokenError::InvalidToken)?;

        if sealed.len() < NONCE_LEN + CHACHA20_POLY1305.tag_len() {
            return Err(TokenError::InvalidToken);
        }
        let mut ciphertext = sealed.split_off(NONCE_LEN);
        let nonce =
            Nonce::try_assume_unique_for_key(&sealed).map_err(|_| TokenError::InvalidToken)?;

        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from(HEADER.as_bytes()), &mut ciphertext)
            .map_err(|_| TokenError::InvalidToken)?;

        let payload: Payload = serde_json::from_slice::<SealedPayload>(plaintext)
            .map_err(|_| TokenError::InvalidToken)?
            .into();

        if payload.is_expired_at(now) {
            return Err(TokenError::ExpiredToken);
        }
        Ok(payload)
    }
}

impl Maker for LocalMaker {
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

impl std::fmt::Debug for LocalMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalMaker").finish_non_exhaustive()
    }
}
