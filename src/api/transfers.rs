// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    auth::AuthorizationPayload,
    error::ApiError,
    models::{Account, Currency, TransferRequest, TransferResult},
    ownership::OwnershipEnforcer,
    state::AppState,
    store::InMemoryStore,
};

fn valid_account(
    store: &InMemoryStore,
    account_id: i64,
    currency: Currency,
) -> Result<Account, ApiError> {
    let account = store
        .get_account(account_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("account {account_id} not found")))?;
    if account.currency != currency {
        return Err(ApiError::bad_request(format!(
            "account {account_id} currency mismatch: {} vs {currency}",
            account.currency
        )));
    }
    Ok(account)
}

/// Move money from one of the caller's accounts to any other account.
///
/// Both accounts must hold `currency`. The checks and the balance update
/// run under one write lock.
#[utoipa::path(
    post,
    path = "/v1/transfers",
    tag = "Transfers",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer completed", body = TransferResult),
        (status = 400, description = "Invalid amount, currency mismatch or insufficient funds"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Source account belongs to another user"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_transfer(
    principal: AuthorizationPayload,
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResult>, ApiError> {
    if request.amount <= 0 {
        return Err(ApiError::bad_request("amount must be positive"));
    }

    let mut store = state.store.write().await;

    let from_account = valid_account(&store, request.from_account_id, request.currency)?;
    from_account.verify_ownership(&principal)?;
    valid_account(&store, request.to_account_id, request.currency)?;

    let result = store.transfer(
        request.from_account_id,
        request.to_account_id,
        request.amount,
    )?;
    drop(store);

    tracing::info!(
        principal = %principal.username(),
        transfer_id = result.transfer.id,
        from_account_id = result.transfer.from_account_id,
        to_account_id = result.transfer.to_account_id,
        amount = result.transfer.amount,
        "transfer completed"
    );

    Ok(Json(result))
}
