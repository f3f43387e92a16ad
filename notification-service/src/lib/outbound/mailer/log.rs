use async_trait::async_trait;

use crate::domain::notification::errors::MailerError;
use crate::domain::notification::models::OutgoingEmail;
use crate::domain::notification::ports::Mailer;

/// Mailer that writes outgoing mail to the log instead of an SMTP relay.
pub struct LogMailer {
    from_address: String,
}

impl LogMailer {
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        if email.to.is_empty() {
            return Err(MailerError::Rejected("missing recipient".to_string()));
        }

        tracing::info!(
            from = %self.from_address,
            to = %email.to,
            subject = %email.subject,
            body_bytes = email.html_body.len(),
            "Outgoing email"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_accepts_addressed_mail() {
        let mailer = LogMailer::new("no-reply@example.com");
        let email = OutgoingEmail {
            to: "a@b.com".to_string(),
            subject: "Welcome".to_string(),
            html_body: "<p>hi</p>".to_string(),
        };

        assert_eq!(mailer.send(&email).await, Ok(()));
    }

    #[tokio::test]
    async fn test_log_mailer_rejects_missing_recipient() {
        let mailer = LogMailer::new("no-reply@example.com");
        let email = OutgoingEmail {
            to: String::new(),
            subject: "Welcome".to_string(),
            html_body: String::new(),
        };

        assert!(matches!(
            mailer.send(&email).await,
            Err(MailerError::Rejected(_))
        ));
    }
}
