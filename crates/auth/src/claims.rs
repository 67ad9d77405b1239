use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use advisorhub_core::AdvisorId;

/// JWT claims model (transport-agnostic).
///
/// The subject is the advisor the token was issued to. Timestamps are
/// seconds since the Unix epoch, as registered JWT claims require.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the authenticated advisor.
    pub sub: AdvisorId,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(sub: AdvisorId, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims against `now`.
///
/// Note: this validates the *claims* only. Signature verification happens in
/// [`crate::token`] before this is called.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn accepts_claims_inside_their_window() {
        let claims = JwtClaims::new(AdvisorId::new(), at(1_000), Duration::hours(1));
        assert_eq!(claims.exp, 4_600);
        assert!(validate_claims(&claims, at(1_000)).is_ok());
        assert!(validate_claims(&claims, at(4_599)).is_ok());
    }

    #[test]
    fn rejects_expired_claims() {
        let claims = JwtClaims::new(AdvisorId::new(), at(1_000), Duration::minutes(1));
        assert_eq!(
            validate_claims(&claims, at(1_060)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn rejects_claims_issued_in_the_future() {
        let claims = JwtClaims::new(AdvisorId::new(), at(2_000), Duration::minutes(1));
        assert_eq!(
            validate_claims(&claims, at(1_999)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn rejects_inverted_window() {
        let claims = JwtClaims {
            sub: AdvisorId::new(),
            iat: 10,
            exp: 10,
        };
        assert_eq!(
            validate_claims(&claims, at(10)),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
