use blog_sdk::{BlogError, MorphType};
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{kind} owner {id} does not exist")]
    OwnerNotFound { kind: MorphType, id: i64 },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("No users exist to author generated posts")]
    NoUsers,

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("Password hashing failed: {message}")]
    Password { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },
}

impl DomainError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    #[must_use]
    pub fn owner_not_found(owner: impl Into<(MorphType, i64)>) -> Self {
        let (kind, id) = owner.into();
        Self::OwnerNotFound { kind, id }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn constraint_violation(message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            message: message.into(),
        }
    }

    pub fn password(message: impl Into<String>) -> Self {
        Self::Password {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for BlogError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::NotFound { entity, id } => BlogError::not_found(entity, id),
            DomainError::OwnerNotFound { kind, id } => {
                BlogError::validation(format!("{kind} owner {id} does not exist"))
            }
            DomainError::EmailAlreadyExists { email } => {
                BlogError::conflict(format!("email '{email}' is already taken"))
            }
            DomainError::InvalidEmail { email } => {
                BlogError::validation(format!("Invalid email: {email}"))
            }
            DomainError::NoUsers => BlogError::validation("no users exist"),
            DomainError::Conflict { message } => BlogError::conflict(message),
            DomainError::ConstraintViolation { message } | DomainError::Validation { message, .. } => {
                BlogError::validation(message)
            }
            DomainError::Password { .. } | DomainError::Database { .. } => BlogError::internal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_sdk::ImageOwner;

    #[test]
    fn test_maps_to_public_errors() {
        assert_eq!(
            BlogError::from(DomainError::not_found("Post", 7)),
            BlogError::not_found("Post", 7)
        );
        assert!(matches!(
            BlogError::from(DomainError::email_already_exists("a@b.io")),
            BlogError::Conflict { .. }
        ));
        assert_eq!(
            BlogError::from(DomainError::database("disk I/O error")),
            BlogError::Internal
        );
    }

    #[test]
    fn test_owner_not_found_names_the_morph_pair() {
        let err = DomainError::owner_not_found(ImageOwner::User(5));
        assert_eq!(err.to_string(), "user owner 5 does not exist");
    }
}
