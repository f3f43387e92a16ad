use async_trait::async_trait;

use crate::domain::notification::errors::MailerError;
use crate::domain::notification::errors::NotificationError;
use crate::domain::notification::models::OutgoingEmail;

/// Port for notifications triggered by identity events.
#[async_trait]
pub trait WelcomeNotifierPort: Send + Sync + 'static {
    /// Send the welcome email to a newly registered user.
    ///
    /// # Errors
    /// * `InvalidRecipient` - Recipient address is blank
    /// * `Delivery` - The mailer failed
    async fn send_welcome(&self, to: &str, username: &str) -> Result<(), NotificationError>;
}

/// Outgoing mail transport.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}
