use thiserror::Error;

/// Error for identifier and credential input validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("{0} is required")]
    Empty(&'static str),

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Password too short: minimum {min} characters, got {actual}")]
    PasswordTooShort { min: usize, actual: usize },

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Exactly one of email, username or user_id is required")]
    NoSubject,

    #[error("Only one of email, username or user_id may be given")]
    AmbiguousSubject,
}

/// Error reported by identity store adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Identity not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Store operation timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

/// Error for event publishing operations
#[derive(Debug, Clone, Error)]
pub enum EventPublisherError {
    #[error("Failed to serialize event: {0}")]
    SerializationFailed(String),

    #[error("Failed to publish event to broker: {0}")]
    PublishFailed(String),

    #[error("Connection to event broker failed: {0}")]
    ConnectionFailed(String),

    #[error("Event publishing timeout: {0}")]
    Timeout(String),
}

/// Caller-facing error kinds of the credential service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Conflict,
    PermissionDenied,
    NotFound,
    Internal,
}

/// Top-level error for all credential operations.
///
/// Messages are safe to return to callers: internal variants carry a short
/// description of the failed step, never the underlying cause.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] IdentifierError),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Identity not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(&'static str),
}

impl IdentityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            IdentityError::AlreadyExists(_) => ErrorKind::Conflict,
            IdentityError::InvalidCredentials => ErrorKind::PermissionDenied,
            IdentityError::NotFound => ErrorKind::NotFound,
            IdentityError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            IdentityError::from(IdentifierError::NoSubject).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            IdentityError::AlreadyExists("email".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            IdentityError::InvalidCredentials.kind(),
            ErrorKind::PermissionDenied
        );
        assert_eq!(IdentityError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            IdentityError::Internal("lookup failed").kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_internal_message_is_opaque() {
        let err = IdentityError::Internal("create identity failed");
        assert_eq!(err.to_string(), "Internal error: create identity failed");
    }
}
