//! minik admin library.
//!
//! This crate provides the admin panel as a library, so the router can be
//! tested end to end and the backend clients reused by the CLI.
//!
//! # Security
//!
//! Only signed-in users whose ID token carries the admin claim get past the
//! panel's access guard. The roles backend verifies the same token on every
//! call; the panel's check only decides what gets rendered.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod notices;
pub mod panel;
pub mod roles;
pub mod routes;
pub mod state;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

use axum::Router;
use axum::http::{HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use middleware::create_session_layer;
use state::AppState;

/// Build the application router with sessions, response headers and request
/// tracing.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    routes::routes()
        .layer(session_layer)
        // Pages carry the roster; keep them out of shared caches
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("same-origin"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        #[allow(clippy::cast_possible_truncation)]
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
