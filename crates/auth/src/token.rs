//! HS256 bearer tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use advisorhub_core::AdvisorId;

use crate::claims::{validate_claims, JwtClaims, TokenValidationError};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Encode(jsonwebtoken::errors::Error),

    #[error("malformed or forged token: {0}")]
    Decode(jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies bearer tokens and yields their claims.
///
/// `now` is passed in so expiry decisions are deterministic under test.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// Mints bearer tokens for authenticated advisors.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, advisor_id: AdvisorId, now: DateTime<Utc>) -> Result<String, TokenError>;
}

/// Symmetric (HMAC-SHA256) token service.
#[derive(Clone)]
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256Jwt {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);
        validation
    }
}

impl core::fmt::Debug for Hs256Jwt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Jwt")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for Hs256Jwt {
    fn issue(&self, advisor_id: AdvisorId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = JwtClaims::new(advisor_id, now, self.ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Encode)
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &Self::validation())
            .map_err(TokenError::Decode)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> Hs256Jwt {
        Hs256Jwt::new(secret.as_bytes(), Duration::hours(1))
    }

    #[test]
    fn issued_tokens_validate_to_the_same_subject() {
        let jwt = service("test-secret");
        let advisor = AdvisorId::new();
        let now = Utc::now();

        let token = jwt.issue(advisor, now).unwrap();
        let claims = jwt.validate(&token, now).unwrap();

        assert_eq!(claims.sub, advisor);
        assert_eq!(claims.exp - claims.iat, 3_600);
    }

    #[test]
    fn tokens_expire_after_ttl() {
        let jwt = service("test-secret");
        let now = Utc::now();
        let token = jwt.issue(AdvisorId::new(), now).unwrap();

        let err = jwt.validate(&token, now + Duration::hours(2)).unwrap_err();
        assert!(matches!(err, TokenError::Claims(TokenValidationError::Expired)));
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let now = Utc::now();
        let token = service("other-secret").issue(AdvisorId::new(), now).unwrap();

        let err = service("test-secret").validate(&token, now).unwrap_err();
        assert!(matches!(err, TokenError::Decode(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = service("test-secret")
            .validate("not.a.token", Utc::now())
            .unwrap_err();
        assert!(matches!(err, TokenError::Decode(_)));
    }
}
