use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::identity::models::Identity;

/// Domain event published when a new identity is registered.
///
/// Carries the normalized identifiers so downstream consumers never see raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegisteredEvent {
    pub event_id: String,
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub occurred_at: DateTime<Utc>,
}

impl UserRegisteredEvent {
    /// Snapshot a freshly created identity.
    pub fn new(identity: &Identity) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            user_id: identity.user_id.to_string(),
            email: identity.email.as_str().to_string(),
            username: identity.username.as_str().to_string(),
            occurred_at: Utc::now(),
        }
    }
}
