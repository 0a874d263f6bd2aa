//! # Campus DB
//!
//! Database pool initialization and the listing query builder used by every
//! paginated endpoint.
//!
//! ```ignore
//! use campus_db::init_db_pool;
//!
//! let pool = init_db_pool().await?;
//! ```

pub mod listing;

use std::env;

use campus_core::{AppError, ErrorKind};
use sqlx::postgres::PgPoolOptions;

pub use listing::{FilterValue, ListQuery};
pub use sqlx::PgPool;

/// Connects to the database named by `DATABASE_URL`.
///
/// Called once during startup; the returned pool is cloned into application state.
pub async fn init_db_pool() -> Result<PgPool, sqlx::Error> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;

    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    tracing::info!(max_connections, "Connecting to database");

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
}

/// Maps a unique-constraint violation to a 400 against `path`; any other database
/// error stays internal.
pub fn unique_violation(err: sqlx::Error, path: &str, msg: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return AppError::field(ErrorKind::BadRequest, path, msg);
    }
    AppError::from(err)
}

/// Maps a unique-constraint violation to a 400 against the field whose constraint
/// was hit. `fields` pairs a constraint name with the reported path and message.
/// A violation on an unlisted constraint is reported against the request body.
pub fn unique_violation_on(err: sqlx::Error, fields: &[(&str, &str, &str)]) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        let constraint = db_err.constraint();
        return match fields.iter().find(|(name, _, _)| Some(*name) == constraint) {
            Some((_, path, msg)) => AppError::field(ErrorKind::BadRequest, *path, *msg),
            None => {
                tracing::warn!(?constraint, "Unmapped unique constraint");
                AppError::field(ErrorKind::BadRequest, "body", "Value already in use")
            }
        };
    }
    AppError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use campus_core::ErrorDetail;
    use sqlx::error::{DatabaseError, ErrorKind as DbErrorKind};

    #[derive(Debug)]
    struct UniqueError(&'static str);

    impl fmt::Display for UniqueError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "duplicate key value violates unique constraint \"{}\"", self.0)
        }
    }

    impl StdError for UniqueError {}

    impl DatabaseError for UniqueError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
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

        fn constraint(&self) -> Option<&str> {
            Some(self.0)
        }

        fn kind(&self) -> DbErrorKind {
            DbErrorKind::UniqueViolation
        }
    }

    const ACCOUNT_FIELDS: &[(&str, &str, &str)] = &[
        ("students_email_key", "email", "Email already in use"),
        ("students_username_key", "username", "Username already in use"),
    ];

    fn duplicate(constraint: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(UniqueError(constraint)))
    }

    fn first_field(err: &AppError) -> (String, String) {
        match err.detail() {
            ErrorDetail::Fields(fields) => (fields[0].path.clone(), fields[0].msg.clone()),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn test_username_collision_reports_username() {
        let err = unique_violation_on(duplicate("students_username_key"), ACCOUNT_FIELDS);
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(
            first_field(&err),
            ("username".to_string(), "Username already in use".to_string())
        );
    }

    #[test]
    fn test_email_collision_reports_email() {
        let err = unique_violation_on(duplicate("students_email_key"), ACCOUNT_FIELDS);
        assert_eq!(first_field(&err).0, "email");
    }

    #[test]
    fn test_unlisted_constraint_reports_body() {
        let err = unique_violation_on(duplicate("students_mobile_key"), ACCOUNT_FIELDS);
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(first_field(&err).0, "body");
    }

    #[test]
    fn test_non_unique_error_stays_internal() {
        let err = unique_violation(sqlx::Error::RowNotFound, "name", "Name already exists");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
