//! `advisorhub-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod validation;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AdvisorId, ProductId};
pub use validation::{FieldIssue, ValidationErrors, Validator};
pub use value_object::ValueObject;
