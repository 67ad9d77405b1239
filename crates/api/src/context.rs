use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use advisorhub_auth::Principal;

use crate::app::errors::ApiError;

/// Principal context for a request (authenticated advisor).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

/// Outcome of the bearer token check on a protected route.
///
/// The auth middleware records it without rejecting, so a handler can let its
/// body validation fail first and only then call [`Authentication::require`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Authentication {
    Verified(PrincipalContext),
    Rejected,
}

impl Authentication {
    pub fn require(self) -> Result<PrincipalContext, ApiError> {
        match self {
            Authentication::Verified(ctx) => Ok(ctx),
            Authentication::Rejected => Err(ApiError::Unauthenticated),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authentication
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Authentication>()
            .copied()
            .unwrap_or(Authentication::Rejected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisorhub_core::AdvisorId;
    use axum::http::Request;

    fn principal() -> Principal {
        Principal::new(AdvisorId::new())
    }

    #[tokio::test]
    async fn missing_extension_reads_as_rejected() {
        let (mut parts, ()) = Request::new(()).into_parts();
        let auth = Authentication::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(auth, Authentication::Rejected);
        assert!(matches!(auth.require(), Err(ApiError::Unauthenticated)));
    }

    #[tokio::test]
    async fn verified_extension_yields_the_principal() {
        let ctx = PrincipalContext::new(principal());
        let mut req = Request::new(());
        req.extensions_mut().insert(Authentication::Verified(ctx));
        let (mut parts, ()) = req.into_parts();

        let auth = Authentication::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(auth.require().unwrap(), ctx);
    }
}
