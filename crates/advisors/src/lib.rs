//! Advisors domain module.
//!
//! Registration and login commands, the advisor record, and its public
//! profile. Pure domain logic: no IO, no HTTP, no storage, no hashing.

pub mod advisor;

pub use advisor::{
    Advisor, AdvisorProfile, Email, LoginAdvisor, NewAdvisor, PlainPassword, RegisterAdvisor,
    PASSWORD_MIN_CHARS,
};
