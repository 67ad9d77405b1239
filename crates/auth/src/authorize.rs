use thiserror::Error;

use advisorhub_core::AdvisorId;

use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: {principal} does not own this resource")]
    NotOwner { principal: AdvisorId },
}

/// A resource with exactly one owning advisor.
pub trait Owned {
    fn owner(&self) -> AdvisorId;
}

/// Authorize a principal to act on an owned resource.
///
/// - No IO
/// - No panics
/// - Ownership is the only policy: callers may touch only what they own.
pub fn authorize_owner<R: Owned + ?Sized>(principal: &Principal, resource: &R) -> Result<(), AuthzError> {
    if resource.owner() == principal.advisor_id {
        Ok(())
    } else {
        tracing::debug!(
            principal = %principal.advisor_id,
            owner = %resource.owner(),
            "ownership check denied"
        );
        Err(AuthzError::NotOwner {
            principal: principal.advisor_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc(AdvisorId);

    impl Owned for Doc {
        fn owner(&self) -> AdvisorId {
            self.0
        }
    }

    #[test]
    fn owner_is_authorized() {
        let me = AdvisorId::new();
        assert!(authorize_owner(&Principal::new(me), &Doc(me)).is_ok());
    }

    #[test]
    fn other_advisors_are_denied() {
        let me = AdvisorId::new();
        let err = authorize_owner(&Principal::new(me), &Doc(AdvisorId::new())).unwrap_err();
        assert_eq!(err, AuthzError::NotOwner { principal: me });
    }
}
