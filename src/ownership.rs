// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for protected resources.
//!
//! Handlers compare the resource owner with the principal of the verified
//! token. The principal only ever comes from [`AuthorizationPayload`], so a
//! handler cannot check ownership against an unauthenticated name.

use crate::auth::AuthorizationPayload;
use crate::error::ApiError;
use crate::models::Account;

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Username of the owner.
    fn owner(&self) -> &str;

    /// Human-readable resource kind for error messages.
    fn kind(&self) -> &'static str;
}

/// Trait for enforcing ownership on handler operations.
pub trait OwnershipEnforcer {
    /// Verify that the authenticated principal owns this resource.
    ///
    /// # Errors
    /// Returns a 403 [`ApiError`] if the principal is not the owner.
    fn verify_ownership(&self, principal: &AuthorizationPayload) -> Result<(), ApiError>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, principal: &AuthorizationPayload) -> Result<(), ApiError> {
        if self.owner() == principal.username() {
            Ok(())
        } else {
            tracing::warn!(
                principal = %principal.username(),
                resource = self.kind(),
                "ownership check failed"
            );
            Err(ApiError::forbidden(format!(
                "{} doesn't belong to the authenticated user",
                self.kind()
            )))
        }
    }
}

impl OwnedResource for Account {
    fn owner(&self) -> &str {
        &self.owner
    }

    fn kind(&self) -> &'static str {
        "account"
    }
}
