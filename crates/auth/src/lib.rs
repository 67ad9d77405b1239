//! `advisorhub-auth`: authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it mints and
//! verifies bearer tokens, hashes passwords, and decides ownership.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod principal;
pub mod token;

pub use authorize::{authorize_owner, AuthzError, Owned};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use password::{hash_password, verify_password, verify_password_against, PasswordError};
pub use principal::Principal;
pub use token::{Hs256Jwt, JwtValidator, TokenError, TokenIssuer};
