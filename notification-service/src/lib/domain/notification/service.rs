use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::notification::errors::NotificationError;
use crate::domain::notification::models::OutgoingEmail;
use crate::domain::notification::ports::Mailer;
use crate::domain::notification::ports::WelcomeNotifierPort;
use crate::domain::notification::templates;

/// Builds welcome emails and hands them to the mailer.
pub struct WelcomeNotifier<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    product_name: String,
}

impl<M> WelcomeNotifier<M>
where
    M: Mailer,
{
    pub fn new(mailer: Arc<M>, product_name: impl Into<String>) -> Self {
        Self {
            mailer,
            product_name: product_name.into(),
        }
    }
}

#[async_trait]
impl<M> WelcomeNotifierPort for WelcomeNotifier<M>
where
    M: Mailer,
{
    async fn send_welcome(&self, to: &str, username: &str) -> Result<(), NotificationError> {
        let to = to.trim();
        if to.is_empty() {
            return Err(NotificationError::InvalidRecipient(
                "recipient address is empty".to_string(),
            ));
        }

        let (subject, html_body) = templates::welcome_email(&self.product_name, username);
        let email = OutgoingEmail {
            to: to.to_string(),
            subject,
            html_body,
        };

        self.mailer.send(&email).await?;

        tracing::info!(to = %email.to, "Welcome email sent");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::notification::errors::MailerError;

    mock! {
        pub TestMailer {}

        #[async_trait]
        impl Mailer for TestMailer {
            async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
        }
    }

    #[tokio::test]
    async fn test_send_welcome_builds_email() {
        let mut mailer = MockTestMailer::new();

        mailer
            .expect_send()
            .withf(|email| {
                email.to == "a@b.com"
                    && email.subject == "Welcome to Acme"
                    && email.html_body.contains("Hello, alice!")
            })
            .times(1)
            .returning(|_| Ok(()));

        let notifier = WelcomeNotifier::new(Arc::new(mailer), "Acme");

        assert_eq!(notifier.send_welcome(" a@b.com ", "alice").await, Ok(()));
    }

    #[tokio::test]
    async fn test_send_welcome_rejects_blank_recipient() {
        let mut mailer = MockTestMailer::new();
        mailer.expect_send().times(0);

        let notifier = WelcomeNotifier::new(Arc::new(mailer), "Acme");

        assert!(matches!(
            notifier.send_welcome("  ", "alice").await,
            Err(NotificationError::InvalidRecipient(_))
        ));
    }

    #[tokio::test]
    async fn test_send_welcome_surfaces_mailer_failure() {
        let mut mailer = MockTestMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailerError::Unavailable("smtp down".to_string())));

        let notifier = WelcomeNotifier::new(Arc::new(mailer), "Acme");

        assert_eq!(
            notifier.send_welcome("a@b.com", "alice").await,
            Err(NotificationError::Delivery(MailerError::Unavailable(
                "smtp down".to_string()
            )))
        );
    }
}
