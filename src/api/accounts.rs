// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account handlers. All routes require a bearer token.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::AuthorizationPayload,
    error::ApiError,
    models::{Account, CreateAccountRequest, ListAccountsQuery},
    ownership::OwnershipEnforcer,
    state::AppState,
};

const MIN_PAGE_SIZE: i64 = 5;
const MAX_PAGE_SIZE: i64 = 10;

/// Open an account owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/v1/accounts",
    tag = "Accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Principal has no user record"),
        (status = 409, description = "Account in this currency already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_account(
    principal: AuthorizationPayload,
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let account = state
        .store
        .write()
        .await
        .create_account(principal.username(), request.currency)?;

    tracing::info!(
        owner = %account.owner,
        account_id = account.id,
        currency = %account.currency,
        "account created"
    );

    Ok((StatusCode::CREATED, Json(account)))
}

/// Fetch one of the authenticated user's accounts.
#[utoipa::path(
    get,
    path = "/v1/accounts/{id}",
    tag = "Accounts",
    params(
        ("id" = i64, Path, description = "Account id")
    ),
    responses(
        (status = 200, description = "Account", body = Account),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Account belongs to another user"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_account(
    principal: AuthorizationPayload,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Account>, ApiError> {
    if id < 1 {
        return Err(ApiError::bad_request("id must be positive"));
    }

    let account = state
        .store
        .read()
        .await
        .get_account(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("account not found"))?;
    account.verify_ownership(&principal)?;

    Ok(Json(account))
}

/// List the authenticated user's accounts, one page at a time.
#[utoipa::path(
    get,
    path = "/v1/accounts",
    tag = "Accounts",
    params(ListAccountsQuery),
    responses(
        (status = 200, description = "Page of accounts", body = [Account]),
        (status = 400, description = "Invalid pagination"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_accounts(
    principal: AuthorizationPayload,
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<Json<Vec<Account>>, ApiError> {
    if query.page_id < 1 {
        return Err(ApiError::bad_request("page_id must be at least 1"));
    }
    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&query.page_size) {
        return Err(ApiError::bad_request(format!(
            "page_size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}"
        )));
    }

    let limit = query.page_size as usize;
    let offset = usize::try_from(query.page_id - 1)
        .ok()
        .and_then(|page| page.checked_mul(limit))
        .ok_or_else(|| ApiError::bad_request("page_id is out of range"))?;

    let accounts = state
        .store
        .read()
        .await
        .list_accounts(principal.username(), limit, offset);

    Ok(Json(accounts))
}
