// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User registration and login.
//!
//! Login is the only place tokens are issued.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::{
    error::ApiError,
    models::{CreateUserRequest, LoginUserRequest, LoginUserResponse, UserResponse},
    password::{PasswordDigest, MIN_PASSWORD_LEN},
    state::AppState,
    store::User,
};

fn validate_create_user(request: &CreateUserRequest) -> Result<(), ApiError> {
    let username_ok = !request.username.is_empty()
        && request
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !username_ok {
        return Err(ApiError::bad_request(
            "username must contain only letters, digits or underscores",
        ));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if request.full_name.trim().is_empty() {
        return Err(ApiError::bad_request("full_name is required"));
    }
    if !request.email.contains('@') {
        return Err(ApiError::bad_request("email is invalid"));
    }
    Ok(())
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_create_user(&request)?;

    let password = PasswordDigest::new(&request.password).map_err(ApiError::internal)?;
    let user = User {
        username: request.username,
        password,
        full_name: request.full_name,
        email: request.email,
        created_at: Utc::now(),
    };

    let response = state.store.write().await.create_user(user)?;
    tracing::info!(username = %response.username, "user created");

    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange credentials for an access token.
#[utoipa::path(
    post,
    path = "/v1/users/login",
    tag = "Users",
    request_body = LoginUserRequest,
    responses(
        (status = 200, description = "Access token issued", body = LoginUserResponse),
        (status = 401, description = "Incorrect password"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    Json(request): Json<LoginUserRequest>,
) -> Result<Json<LoginUserResponse>, ApiError> {
    let user = state
        .store
        .read()
        .await
        .get_user(&request.username)
        .cloned()
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    if !user.password.verify(&request.password) {
        tracing::info!(username = %user.username, "login rejected");
        return Err(ApiError::unauthorized("incorrect password"));
    }

    let (access_token, payload) = state
        .token_maker
        .create_token(&user.username, state.access_token_duration)
        .map_err(ApiError::internal)?;

    tracing::info!(
        username = %payload.username(),
        token_id = %payload.id(),
        expires_at = %payload.expired_at(),
        "access token issued"
    );

    Ok(Json(LoginUserResponse {
        access_token,
        access_token_expires_at: payload.expired_at(),
        user: UserResponse::from(&user),
    }))
}
