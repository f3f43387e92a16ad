use chrono::DateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::notification::models::UserRegistered;

pub const USER_REGISTERED: &str = "user.registered";

/// Wire message published by identity-service on `user.registered`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRegisteredMessage {
    pub event: String,
    pub event_id: String,
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub occurred_at: i64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageConversionError {
    #[error("Unexpected event type '{0}'")]
    UnexpectedEvent(String),

    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}

impl TryFrom<UserRegisteredMessage> for UserRegistered {
    type Error = MessageConversionError;

    fn try_from(message: UserRegisteredMessage) -> Result<Self, Self::Error> {
        if message.event != USER_REGISTERED {
            return Err(MessageConversionError::UnexpectedEvent(message.event));
        }

        let occurred_at = DateTime::from_timestamp(message.occurred_at, 0)
            .ok_or(MessageConversionError::InvalidTimestamp(message.occurred_at))?;

        Ok(UserRegistered {
            event_id: message.event_id,
            user_id: message.user_id,
            email: message.email,
            username: message.username,
            occurred_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(event: &str) -> UserRegisteredMessage {
        UserRegisteredMessage {
            event: event.to_string(),
            event_id: "e-1".to_string(),
            user_id: "u-1".to_string(),
            email: "a@b.com".to_string(),
            username: "alice".to_string(),
            occurred_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_converts_registration() {
        let event = UserRegistered::try_from(message(USER_REGISTERED)).unwrap();
        assert_eq!(event.email, "a@b.com");
        assert_eq!(event.occurred_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_rejects_other_event_types() {
        assert_eq!(
            UserRegistered::try_from(message("user.deleted")),
            Err(MessageConversionError::UnexpectedEvent(
                "user.deleted".to_string()
            ))
        );
    }
}
