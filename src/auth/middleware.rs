// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied to the protected part of the router:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/accounts", get(list_accounts))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.token_maker.clone(),
//!         auth_middleware,
//!     ));
//! ```
//!
//! Requests that fail any step are answered here with a 401 and never reach
//! the handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthorizationPayload};
use crate::token::{Maker, Payload};

/// The only supported authorization scheme (compared case-insensitively).
pub const AUTHORIZATION_TYPE_BEARER: &str = "bearer";

/// Authentication middleware function.
pub async fn auth_middleware(
    State(maker): State<Arc<dyn Maker>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), maker.as_ref()) {
        Ok(payload) => {
            tracing::debug!(
                username = %payload.username(),
                token_id = %payload.id(),
                "request authenticated"
            );
            request
                .extensions_mut()
                .insert(AuthorizationPayload(payload));
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                reason = e.error_code(),
                path = %request.uri().path(),
                "request rejected"
            );
            e.into_response()
        }
    }
}

/// Extract the bearer credential from `headers` and verify it with `maker`.
pub fn authenticate(headers: &HeaderMap, maker: &dyn Maker) -> Result<Payload, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeaderFormat)?;

    let fields: Vec<&str> = header.split_whitespace().collect();
    let [scheme, credential] = fields.as_slice() else {
        return Err(AuthError::InvalidAuthHeaderFormat);
    };

    if !scheme.eq_ignore_ascii_case(AUTHORIZATION_TYPE_BEARER) {
        return Err(AuthError::UnsupportedAuthType(scheme.to_ascii_lowercase()));
    }

    Ok(maker.verify_token(credential)?)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::token::{build_maker, LocalMaker, TokenError, TokenScheme};
    use axum::{
        body::{to_bytes, Body},
        http::{HeaderValue, Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    const KEY: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz012345";

    fn maker() -> Arc<dyn Maker> {
        build_maker(TokenScheme::Local, KEY).unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    /// Router with one protected route that counts handler invocations.
    fn app(maker: Arc<dyn Maker>, hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/protected",
                get(move |AuthorizationPayload(payload): AuthorizationPayload| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        payload.username().to_string()
                    }
                }),
            )
            .route_layer(axum::middleware::from_fn_with_state(maker, auth_middleware))
    }

    async fn send(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = HttpRequest::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn authenticate_accepts_bearer_in_any_case() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", Duration::minutes(1)).unwrap();

        for scheme in ["Bearer", "bearer", "BEARER"] {
            let payload = authenticate(&headers(&format!("{scheme} {token}")), maker.as_ref())
                .unwrap();
            assert_eq!(payload.username(), "alice");
        }
    }

    #[test]
    fn authenticate_requires_header() {
        assert_eq!(
            authenticate(&HeaderMap::new(), maker().as_ref()),
            Err(AuthError::MissingAuthHeader)
        );
    }

    #[test]
    fn authenticate_requires_two_fields() {
        let maker = maker();
        for value in ["Bearer", "", "   ", "Bearer a b"] {
            assert_eq!(
                authenticate(&headers(value), maker.as_ref()),
                Err(AuthError::InvalidAuthHeaderFormat),
                "{value:?}"
            );
        }
    }

    #[test]
    fn authenticate_rejects_other_schemes() {
        assert_eq!(
            authenticate(&headers("Basic abcdef"), maker().as_ref()),
            Err(AuthError::UnsupportedAuthType("basic".to_string()))
        );
    }

    #[test]
    fn authenticate_rejects_non_ascii_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert_eq!(
            authenticate(&headers, maker().as_ref()),
            Err(AuthError::InvalidAuthHeaderFormat)
        );
    }

    #[test]
    fn authenticate_propagates_token_errors() {
        let maker = LocalMaker::new(KEY).unwrap();
        let (expired, _) = maker
            .create_token_at("alice", Duration::minutes(1), Utc::now() - Duration::hours(1))
            .unwrap();

        assert_eq!(
            authenticate(&headers(&format!("Bearer {expired}")), &maker),
            Err(AuthError::Token(TokenError::ExpiredToken))
        );
        assert_eq!(
            authenticate(&headers("Bearer garbage"), &maker),
            Err(AuthError::Token(TokenError::InvalidToken))
        );
    }

    #[tokio::test]
    async fn missing_header_never_reaches_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(app(maker(), hits.clone()), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("missing_auth_header"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn bearer_without_token_is_rejected() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(app(maker(), hits.clone()), Some("Bearer")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("invalid_auth_header_format"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn basic_auth_is_rejected() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(app(maker(), hits.clone()), Some("Basic abcdef")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("unsupported_auth_type"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_token_is_rejected() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(app(maker(), hits.clone()), Some("Bearer v1.local.AAAA")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("token is invalid"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_payload() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", Duration::minutes(1)).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let (status, body) = send(
            app(maker, hits.clone()),
            Some(&format!("Bearer {token}")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn token_from_another_key_is_rejected() {
        let other = build_maker(TokenScheme::Local, b"543210zyxwvutsrqponmlkjihgfedcba").unwrap();
        let (token, _) = other.create_token("alice", Duration::minutes(1)).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let (status, _) = send(app(maker(), hits.clone()), Some(&format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
