use sea_orm::{sqlx, DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl ModelError {
    /// True when the driver classified the failure as a unique-constraint
    /// violation. Relies on the SQLSTATE or the driver's error kind, not on
    /// the message text.
    pub fn is_unique_violation(&self) -> bool {
        let ModelError::Db(e) = self else {
            return false;
        };
        if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            return true;
        }
        match e {
            DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
            | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db))) => {
                db.is_unique_violation() || db.code().as_deref() == Some(UNIQUE_VIOLATION)
            }
            _ => false,
        }
    }
}

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    /// Driver error carrying only a SQLSTATE, as a server would report it.
    #[derive(Debug)]
    struct SqlState(&'static str);

    impl fmt::Display for SqlState {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "sqlstate {}", self.0)
        }
    }

    impl StdError for SqlState {}

    impl sqlx::error::DatabaseError for SqlState {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"user_email_key\""
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
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

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn db_error(state: &'static str) -> DbErr {
        DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(Box::new(SqlState(state)))))
    }

    #[test]
    fn plain_db_errors_are_not_unique_violations() {
        assert!(!ModelError::Db(DbErr::RecordNotFound("user".into())).is_unique_violation());
        assert!(!ModelError::Validation("x".into()).is_unique_violation());
        assert!(!ModelError::NotFound("user").is_unique_violation());
    }

    #[test]
    fn sqlstate_23505_is_a_unique_violation() {
        assert!(ModelError::Db(db_error("23505")).is_unique_violation());
        let exec = DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(Box::new(SqlState("23505")))));
        assert!(ModelError::Db(exec).is_unique_violation());
    }

    #[test]
    fn other_sqlstates_are_not() {
        // foreign_key_violation, not_null_violation
        assert!(!ModelError::Db(db_error("23503")).is_unique_violation());
        assert!(!ModelError::Db(db_error("23502")).is_unique_violation());
    }
}
