// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory data store for users, accounts and transfers.
//!
//! The store knows nothing about tokens or principals; ownership checks
//! happen in the handlers that call it.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;

use crate::error::ApiError;
use crate::models::{Account, Currency, Transfer, TransferResult, UserResponse};
use crate::password::PasswordDigest;

/// Stored user record.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password: PasswordDigest,
    pub full_name: String,
    pub email: String,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<String, User>,
    accounts: BTreeMap<i64, Account>,
    transfers: Vec<Transfer>,
    next_account_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_user(&mut self, user: User) -> Result<UserResponse, ApiError> {
        if self.users.contains_key(&user.username) {
            return Err(ApiError::conflict("username already exists"));
        }
        let response = UserResponse::from(&user);
        self.users.insert(user.username.clone(), user);
        Ok(response)
    }

    pub fn get_user(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    /// Open an account; each owner holds at most one account per currency.
    pub fn create_account(&mut self, owner: &str, currency: Currency) -> Result<Account, ApiError> {
        if !self.users.contains_key(owner) {
            return Err(ApiError::forbidden("account owner has no user record"));
        }
        if self
            .accounts
            .values()
            .any(|account| account.owner == owner && account.currency == currency)
        {
            return Err(ApiError::conflict(format!(
                "an account in {currency} already exists for this owner"
            )));
        }

        self.next_account_id += 1;
        let account = Account {
            id: self.next_account_id,
            owner: owner.to_string(),
            balance: 0,
            currency,
            created_at: Utc::now(),
        };
        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    pub fn get_account(&self, id: i64) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Accounts of `owner` ordered by id.
    pub fn list_accounts(&self, owner: &str, limit: usize, offset: usize) -> Vec<Account> {
        self.accounts
            .values()
            .filter(|account| account.owner == owner)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Credit an account without a counterpart.
    #[cfg(test)]
    pub(crate) fn deposit(&mut self, id: i64, amount: i64) -> Result<Account, ApiError> {
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("account not found"))?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| ApiError::bad_request("balance overflow"))?;
        Ok(account.clone())
    }

    /// Move `amount` between two existing accounts.
    ///
    /// Validates everything before touching either balance, so a failed
    /// transfer leaves both accounts unchanged.
    pub fn transfer(
        &mut self,
        from_account_id: i64,
        to_account_id: i64,
        amount: i64,
    ) -> Result<TransferResult, ApiError> {
        if amount <= 0 {
            return Err(ApiError::bad_request("amount must be positive"));
        }
        if from_account_id == to_account_id {
            return Err(ApiError::bad_request("cannot transfer to the same account"));
        }
        let from = self
            .accounts
            .get(&from_account_id)
            .ok_or_else(|| ApiError::not_found("account not found"))?;
        let to = self
            .accounts
            .get(&to_account_id)
            .ok_or_else(|| ApiError::not_found("account not found"))?;

        let from_balance = from
            .balance
            .checked_sub(amount)
            .filter(|balance| *balance >= 0)
            .ok_or_else(|| ApiError::bad_request("insufficient funds"))?;
        let to_balance = to
            .balance
            .checked_add(amount)
            .ok_or_else(|| ApiError::bad_request("balance overflow"))?;

        let from_account = self.apply_balance(from_account_id, from_balance)?;
        let to_account = self.apply_balance(to_account_id, to_balance)?;

        let transfer = Transfer {
            id: self.transfers.len() as i64 + 1,
            from_account_id,
            to_account_id,
            amount,
            created_at: Utc::now(),
        };
        self.transfers.push(transfer.clone());

        Ok(TransferResult {
            transfer,
            from_account,
            to_account,
        })
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    fn apply_balance(&mut self, id: i64, balance: i64) -> Result<Account, ApiError> {
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("account not found"))?;
        account.balance = balance;
        Ok(account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn user(username: &str) -> User {
        User {
            username: username.to_string(),
            password: PasswordDigest::new("secret").unwrap(),
            full_name: "Test User".to_string(),
            email: format!("{username}@example.com"),
            created_at: Utc::now(),
        }
    }

    fn store_with(usernames: &[&str]) -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for name in usernames {
            store.create_user(user(name)).unwrap();
        }
        store
    }

    #[test]
    fn duplicate_username_conflicts() {
        let mut store = store_with(&["alice"]);
        let err = store.create_user(user("alice")).unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn one_account_per_currency() {
        let mut store = store_with(&["alice"]);
        store.create_account("alice", Currency::Usd).unwrap();
        store.create_account("alice", Currency::Eur).unwrap();

        let err = store.create_account("alice", Currency::Usd).unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn account_requires_user_record() {
        let mut store = InMemoryStore::new();
        let err = store.create_account("ghost", Currency::Usd).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn list_accounts_filters_by_owner_and_pages() {
        let mut store = store_with(&["alice", "bob"]);
        store.create_account("alice", Currency::Usd).unwrap();
        store.create_account("bob", Currency::Usd).unwrap();
        store.create_account("alice", Currency::Eur).unwrap();
        store.create_account("alice", Currency::Cad).unwrap();

        let all = store.list_accounts("alice", 10, 0);
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|a| a.owner == "alice"));

        let page = store.list_accounts("alice", 2, 2);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].currency, Currency::Cad);
    }

    #[test]
    fn transfer_moves_balance() {
        let mut store = store_with(&["alice", "bob"]);
        let a = store.create_account("alice", Currency::Usd).unwrap();
        let b = store.create_account("bob", Currency::Usd).unwrap();
        store.deposit(a.id, 100).unwrap();

        let result = store.transfer(a.id, b.id, 40).unwrap();
        assert_eq!(result.from_account.balance, 60);
        assert_eq!(result.to_account.balance, 40);
        assert_eq!(result.transfer.amount, 40);
        assert_eq!(store.transfers().len(), 1);
    }

    #[test]
    fn failed_transfer_changes_nothing() {
        let mut store = store_with(&["alice", "bob"]);
        let a = store.create_account("alice", Currency::Usd).unwrap();
        let b = store.create_account("bob", Currency::Usd).unwrap();
        store.deposit(a.id, 10).unwrap();

        let err = store.transfer(a.id, b.id, 11).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(store.get_account(a.id).unwrap().balance, 10);
        assert_eq!(store.get_account(b.id).unwrap().balance, 0);
        assert!(store.transfers().is_empty());

        assert_eq!(
            store.transfer(a.id, 999, 1).unwrap_err().status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            store.transfer(a.id, b.id, 0).unwrap_err().status,
            StatusCode::BAD_REQUEST
        );
    }
}
