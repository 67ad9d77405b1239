//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: use cases over the repositories and token service
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response bodies
//! - `extract.rs`: validated JSON extractor
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        jwt: services.jwt_validator(),
    };

    // `route_layer` so unknown paths reach the fallback instead of the auth check.
    let protected = routes::protected_router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security_header(
                    header::X_CONTENT_TYPE_OPTIONS,
                    "nosniff",
                ))
                .layer(security_header(header::X_FRAME_OPTIONS, "DENY"))
                .layer(security_header(header::REFERRER_POLICY, "no-referrer")),
        )
}

fn security_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
}
