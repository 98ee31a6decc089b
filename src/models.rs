// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`/`Deserialize` and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Users**: Registration and login (token issuance)
//! - **Accounts**: Per-currency balances owned by one user
//! - **Transfers**: Money movement between two accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Currency
// =============================================================================

/// Supported account currencies.
///
/// Unknown codes are rejected while the request body is parsed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Cad,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Eur => write!(f, "EUR"),
            Currency::Cad => write!(f, "CAD"),
        }
    }
}

// =============================================================================
// User Models
// =============================================================================

/// Public view of a user (never includes the password digest).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Request to register a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Letters, digits and underscores only.
    pub username: String,
    /// At least 6 characters.
    pub password: String,
    pub full_name: String,
    pub email: String,
}

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginUserRequest {
    pub username: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginUserResponse {
    /// Bearer token for the `Authorization` header.
    pub access_token: String,
    /// When the token stops being accepted.
    pub access_token_expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

// =============================================================================
// Account Models
// =============================================================================

/// A single-currency bank account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    /// Username of the owning user.
    pub owner: String,
    /// Balance in minor units.
    pub balance: i64,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

/// Request to open an account for the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub currency: Currency,
}

/// Pagination for account listing.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAccountsQuery {
    /// 1-based page number.
    pub page_id: i64,
    /// Between 5 and 10.
    pub page_size: i64,
}

// =============================================================================
// Transfer Models
// =============================================================================

/// A completed money movement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Transfer {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    /// Amount in minor units, always positive.
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Request to move money out of one of the caller's accounts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransferRequest {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
    pub currency: Currency,
}

/// Transfer together with both updated accounts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransferResult {
    pub transfer: Transfer,
    pub from_account: Account,
    pub to_account: Account,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_uses_iso_codes() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), r#""USD""#);
        assert_eq!(
            serde_json::from_str::<Currency>(r#""CAD""#).unwrap(),
            Currency::Cad
        );
        assert!(serde_json::from_str::<Currency>(r#""BTC""#).is_err());
        assert_eq!(Currency::Eur.to_string(), "EUR");
    }
}
