// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing for the in-memory user store.
//!
//! Argon2id (v0x13, default cost parameters) over a fresh 16-byte salt per
//! user. The digest is kept as a PHC string so the parameters travel with it.

use argon2::password_hash::{PasswordHash, PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use ring::rand::{SecureRandom, SystemRandom};

const SALT_LEN: usize = 16;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("cannot generate password salt")]
    Salt,
    #[error("cannot hash password: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Stored password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    phc: String,
}

impl PasswordDigest {
    /// Hash `password` under a fresh random salt.
    pub fn new(password: &str) -> Result<Self, PasswordError> {
        let salt = make_salt()?;
        let phc = hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?
            .serialize()
            .to_string();
        Ok(Self { phc })
    }

    /// Check `password` against this hash.
    pub fn verify(&self, password: &str) -> bool {
        let Ok(hash) = PasswordHash::new(&self.phc) else {
            tracing::error!("stored password hash is not a valid PHC string");
            return false;
        };
        hash.verify_password(&[&hasher()], password).is_ok()
    }
}

fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

fn make_salt() -> Result<SaltString, PasswordError> {
    let mut bytes = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| PasswordError::Salt)?;
    SaltString::encode_b64(&bytes).map_err(|_| PasswordError::Salt)
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_original_password() {
        let digest = PasswordDigest::new("secret123").unwrap();

        assert!(digest.verify("secret123"));
        assert!(!digest.verify("secret124"));
        assert!(!digest.verify(""));
    }

    #[test]
    fn stores_argon2id_phc_string() {
        let digest = PasswordDigest::new("secret123").unwrap();

        assert!(digest.phc.starts_with("$argon2id$v=19$"));
        assert!(!digest.phc.contains("secret123"));
    }

    #[test]
    fn salts_differ_between_digests() {
        let a = PasswordDigest::new("secret123").unwrap();
        let b = PasswordDigest::new("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn corrupted_hash_never_verifies() {
        let digest = PasswordDigest {
            phc: "not-a-phc-string".to_string(),
        };
        assert!(!digest.verify("secret123"));
    }

    #[test]
    fn debug_hides_material() {
        let digest = PasswordDigest::new("secret123").unwrap();
        assert_eq!(format!("{digest:?}"), "PasswordDigest(..)");
    }
}
