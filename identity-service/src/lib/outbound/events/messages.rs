use serde::Deserialize;
use serde::Serialize;

use crate::domain::identity::events::UserRegisteredEvent;

pub const USER_REGISTERED: &str = "user.registered";

/// Serializable message for the UserRegistered domain event.
///
/// Wire representation published to the `user.registered` topic, keyed by
/// `user_id`. `occurred_at` is in epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegisteredMessage {
    pub event: String,
    pub event_id: String,
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub occurred_at: i64,
}

impl From<&UserRegisteredEvent> for UserRegisteredMessage {
    fn from(event: &UserRegisteredEvent) -> Self {
        Self {
            event: USER_REGISTERED.to_string(),
            event_id: event.event_id.clone(),
            user_id: event.user_id.clone(),
            email: event.email.clone(),
            username: event.username.clone(),
            occurred_at: event.occurred_at.timestamp(),
        }
    }
}
