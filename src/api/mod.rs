// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::auth_middleware,
    models::{
        Account, CreateAccountRequest, CreateUserRequest, Currency, LoginUserRequest,
        LoginUserResponse, Transfer, TransferRequest, TransferResult, UserResponse,
    },
    state::AppState,
};

pub mod accounts;
pub mod health;
pub mod transfers;
pub mod users;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route("/accounts/{id}", get(accounts::get_account))
        .route("/transfers", post(transfers::create_transfer))
        .route_layer(middleware::from_fn_with_state(
            state.token_maker.clone(),
            auth_middleware,
        ));

    let v1_routes = Router::new()
        .route("/users", post(users::create_user))
        .route("/users/login", post(users::login_user))
        .merge(protected)
        .with_state(state);

    Router::new()
        .route("/health", get(health::liveness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Access token from POST /v1/users/login, sent as `Authorization: Bearer <token>`.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        users::create_user,
        users::login_user,
        accounts::create_account,
        accounts::get_account,
        accounts::list_accounts,
        transfers::create_transfer
    ),
    components(
        schemas(
            health::HealthResponse,
            Currency,
            UserResponse,
            CreateUserRequest,
            LoginUserRequest,
            LoginUserResponse,
            Account,
            CreateAccountRequest,
            Transfer,
            TransferRequest,
            TransferResult
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Users", description = "Registration and login"),
        (name = "Accounts", description = "Accounts owned by the authenticated user"),
        (name = "Transfers", description = "Money movement between accounts")
    )
)]
struct ApiDoc;
