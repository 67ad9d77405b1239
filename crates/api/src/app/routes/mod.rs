use axum::{
    routing::{get, post},
    Router,
};

pub mod advisors;
pub mod products;
pub mod system;

/// Routes reachable without a bearer token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/api/advisors/register", post(advisors::register))
        .route("/api/advisors/login", post(advisors::login))
}

/// Routes that require an authenticated advisor.
pub fn protected_router() -> Router {
    Router::new()
        .route("/api/advisors/me", get(advisors::me))
        .nest("/api/products", products::router())
}
