use chrono::DateTime;
use chrono::Utc;

/// A user registration as seen by the notification domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistered {
    pub event_id: String,
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub occurred_at: DateTime<Utc>,
}

/// Fully rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}
