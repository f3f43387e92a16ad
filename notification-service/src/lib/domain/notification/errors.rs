use thiserror::Error;

/// Error reported by mail delivery adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailerError {
    #[error("Mail transport unavailable: {0}")]
    Unavailable(String),

    #[error("Mail rejected: {0}")]
    Rejected(String),
}

/// Top-level error for notification operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Failed to deliver notification: {0}")]
    Delivery(#[from] MailerError),
}
