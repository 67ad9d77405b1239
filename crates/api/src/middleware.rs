use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use advisorhub_auth::{JwtValidator, Principal};

use crate::context::{Authentication, PrincipalContext};

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Verify the bearer token and record the outcome as an [`Authentication`].
///
/// Never rejects on its own: handlers call [`Authentication::require`] after
/// their body has been validated.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let auth = authenticate(&state, req.headers());
    req.extensions_mut().insert(auth);

    next.run(req).await
}

fn authenticate(state: &AuthState, headers: &HeaderMap) -> Authentication {
    let Some(token) = extract_bearer(headers) else {
        return Authentication::Rejected;
    };

    match state.jwt.validate(token, Utc::now()) {
        Ok(claims) => Authentication::Verified(PrincipalContext::new(Principal::from(&claims))),
        Err(e) => {
            tracing::debug!(error = %e, "bearer token rejected");
            Authentication::Rejected
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }

    Some(token)
}
