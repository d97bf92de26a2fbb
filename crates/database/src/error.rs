//! The error type shared by every service operation.

use crate::validation::ValidationErrors;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// A query failed.
    #[error("database error: {0}")]
    Db(DbErr),

    /// The record does not exist, or is hidden from the caller's branch.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// The caller's role does not allow the operation.
    #[error("{0}")]
    Forbidden(String),

    /// One or more submitted fields are invalid.
    #[error("The given data was invalid.")]
    Validation(ValidationErrors),

    /// A uniqueness rule was violated by a concurrent or repeated write.
    #[error("{0}")]
    Conflict(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    #[must_use]
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// A validation failure on a single field.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                Self::Conflict(format!("The record conflicts with an existing one: {detail}"))
            }
            _ => Self::Db(err),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ServiceError::not_found("Group").to_string(), "Group not found");
        assert_eq!(
            ServiceError::forbidden("Admins only").to_string(),
            "Admins only"
        );
    }

    #[test]
    fn test_invalid_carries_the_field() {
        let ServiceError::Validation(errors) = ServiceError::invalid("name", "Required") else {
            panic!("expected a validation error");
        };
        assert_eq!(errors.get("name"), Some(&["Required".to_string()][..]));
    }

    #[test]
    fn test_plain_db_error_is_not_a_conflict() {
        let err: ServiceError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, ServiceError::Db(_)));
    }
}
