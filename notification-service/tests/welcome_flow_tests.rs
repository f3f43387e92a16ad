use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use notification_service::domain::notification::errors::MailerError;
use notification_service::domain::notification::models::OutgoingEmail;
use notification_service::domain::notification::ports::Mailer;
use notification_service::domain::notification::service::WelcomeNotifier;
use notification_service::inbound::events::UserRegisteredHandler;
use serde_json::json;

/// Mailer that keeps every delivered email in memory.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

fn handler(mailer: Arc<RecordingMailer>) -> UserRegisteredHandler<WelcomeNotifier<RecordingMailer>> {
    UserRegisteredHandler::new(Arc::new(WelcomeNotifier::new(mailer, "Acme")))
}

#[tokio::test]
async fn test_registration_event_produces_welcome_email() {
    let mailer = Arc::new(RecordingMailer::default());
    let handler = handler(Arc::clone(&mailer));

    let payload = serde_json::to_vec(&json!({
        "event": "user.registered",
        "event_id": "e-1",
        "user_id": "0190b2a4-7d2e-7c3a-9f00-000000000001",
        "email": "a@b.com",
        "username": "alice",
        "occurred_at": 1_700_000_000
    }))
    .unwrap();

    handler.handle_payload(&payload).await.unwrap();

    let sent = mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@b.com");
    assert_eq!(sent[0].subject, "Welcome to Acme");
    assert!(sent[0].html_body.contains("Hello, alice!"));
}

#[tokio::test]
async fn test_bad_payload_sends_nothing_and_next_message_still_works() {
    let mailer = Arc::new(RecordingMailer::default());
    let handler = handler(Arc::clone(&mailer));

    assert!(handler.handle_payload(br#"{"event":"user.registered"}"#).await.is_err());

    let payload = serde_json::to_vec(&json!({
        "event": "user.registered",
        "event_id": "e-2",
        "user_id": "0190b2a4-7d2e-7c3a-9f00-000000000002",
        "email": "c@d.com",
        "username": "bob",
        "occurred_at": 1_700_000_100
    }))
    .unwrap();
    handler.handle_payload(&payload).await.unwrap();

    let sent = mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "c@d.com");
}
