//! Infrastructure layer: repositories over PostgreSQL and in-memory stores.

pub mod in_memory;
pub mod postgres;
pub mod repository;

pub use in_memory::{InMemoryAdvisorRepository, InMemoryProductRepository};
pub use postgres::{PostgresAdvisorRepository, PostgresProductRepository};
pub use repository::{AdvisorRepository, ProductRepository, RepositoryError};
