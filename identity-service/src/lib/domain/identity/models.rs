use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::identity::errors::IdentifierError;

/// Canonical form of an email or username: surrounding whitespace removed,
/// every character lower-cased.
///
/// Every identifier goes through this before it is compared, stored or used
/// as a lookup key.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Identity aggregate entity.
///
/// Created once on registration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub username: Username,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Public view of the identity, without the password hash.
    pub fn profile(&self) -> IdentityProfile {
        IdentityProfile {
            user_id: self.user_id,
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

/// User unique identifier type
///
/// Backed by a UUIDv7, so ids sort by creation time both as values and in
/// their hyphenated string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new time-ordered user ID.
    ///
    /// Ids generated by the same process are strictly increasing.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `Empty` - Input is blank
    /// * `InvalidUserId` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdentifierError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdentifierError::Empty("user id"));
        }
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| IdentifierError::InvalidUserId(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalized email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 255;

    /// Normalize and validate a raw email.
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `TooLong` - Longer than 255 characters
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let email = normalize_identifier(raw);
        check_length("email", &email, Self::MAX_LENGTH)?;
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalized username.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 64;

    /// Normalize and validate a raw username.
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `TooLong` - Longer than 64 characters
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let username = normalize_identifier(raw);
        check_length("username", &username, Self::MAX_LENGTH)?;
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), IdentifierError> {
    let length = value.chars().count();
    if length == 0 {
        Err(IdentifierError::Empty(field))
    } else if length > max {
        Err(IdentifierError::TooLong {
            field,
            max,
            actual: length,
        })
    } else {
        Ok(())
    }
}

/// Plaintext password as submitted by the caller.
///
/// `Debug` is redacted so it never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Enforce the minimum length policy for new credentials.
    ///
    /// # Errors
    /// * `PasswordTooShort` - Fewer than 6 characters
    pub fn check_policy(&self) -> Result<(), IdentifierError> {
        let actual = self.0.chars().count();
        if actual < Self::MIN_LENGTH {
            return Err(IdentifierError::PasswordTooShort {
                min: Self::MIN_LENGTH,
                actual,
            });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Exactly one identifier selecting an identity for login or resolve.
///
/// Values are raw caller input; normalization happens inside the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Email(String),
    Username(String),
    UserId(String),
}

impl Subject {
    /// Build a subject from optional transport fields.
    ///
    /// Blank fields count as absent.
    ///
    /// # Errors
    /// * `NoSubject` - None of the fields is present
    /// * `AmbiguousSubject` - More than one field is present
    pub fn from_parts(
        email: Option<String>,
        username: Option<String>,
        user_id: Option<String>,
    ) -> Result<Self, IdentifierError> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        match (present(email), present(username), present(user_id)) {
            (Some(email), None, None) => Ok(Subject::Email(email)),
            (None, Some(username), None) => Ok(Subject::Username(username)),
            (None, None, Some(user_id)) => Ok(Subject::UserId(user_id)),
            (None, None, None) => Err(IdentifierError::NoSubject),
            _ => Err(IdentifierError::AmbiguousSubject),
        }
    }
}

/// Command to register a new identity with raw caller input.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub username: String,
    pub password: Password,
}

impl RegisterCommand {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: Password::new(password),
        }
    }
}

/// Command to authenticate an identity.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub subject: Subject,
    pub password: Password,
}

impl LoginCommand {
    pub fn new(subject: Subject, password: impl Into<String>) -> Self {
        Self {
            subject,
            password: Password::new(password),
        }
    }
}

/// Identity fields that may be shared with trusted callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub username: Username,
}

/// Result of an availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub email_available: bool,
    pub username_available: bool,
}
