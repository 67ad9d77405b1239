//! PostgreSQL-backed repositories.
//!
//! ## Error Mapping
//!
//! | SQLx error | SQLSTATE | RepositoryError |
//! |------------|----------|-----------------|
//! | Database (unique violation) | `23505` | `UniqueViolation` |
//! | Database (other) | any | `Database` |
//! | ColumnDecode / Decode | n/a | `Decode` |
//! | PoolClosed, PoolTimedOut, Io, ... | n/a | `Database` |

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::repository::RepositoryError;

mod advisors;
mod products;

pub use advisors::PostgresAdvisorRepository;
pub use products::PostgresProductRepository;

const SCHEMA: &str = include_str!("schema.sql");

/// Open a connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Create tables and indexes if they do not exist yet.
#[tracing::instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    Ok(())
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => RepositoryError::UniqueViolation(
                    db_err.constraint().unwrap_or("unique").to_string(),
                ),
                _ => RepositoryError::Database(msg),
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            RepositoryError::Decode(format!("{operation}: {err}"))
        }
        _ => RepositoryError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct StubDbError {
        code: &'static str,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for StubDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "stub error {}", self.code)
        }
    }

    impl StdError for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.code {
                "23505" => ErrorKind::UniqueViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(code: &'static str, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError { code, constraint }))
    }

    #[test]
    fn unique_violation_keeps_the_constraint_name() {
        let err = map_sqlx_error("create_advisor", db_error("23505", Some("advisors_email_key")));
        assert_eq!(err, RepositoryError::UniqueViolation("advisors_email_key".to_string()));

        let err = map_sqlx_error("create_advisor", db_error("23505", None));
        assert_eq!(err, RepositoryError::UniqueViolation("unique".to_string()));
    }

    #[test]
    fn other_failures_are_database_errors() {
        let err = map_sqlx_error("create_product", db_error("23503", Some("products_advisor_id_fkey")));
        assert!(matches!(err, RepositoryError::Database(msg) if msg.contains("create_product")));

        let err = map_sqlx_error("list_products", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
