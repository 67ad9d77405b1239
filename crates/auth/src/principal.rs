use advisorhub_core::AdvisorId;

use crate::claims::JwtClaims;

/// A fully resolved principal for authorization decisions.
///
/// Construction is decoupled from transport: the API derives it from verified
/// token claims.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Principal {
    pub advisor_id: AdvisorId,
}

impl Principal {
    pub fn new(advisor_id: AdvisorId) -> Self {
        Self { advisor_id }
    }
}

impl From<&JwtClaims> for Principal {
    fn from(claims: &JwtClaims) -> Self {
        Self::new(claims.sub)
    }
}
