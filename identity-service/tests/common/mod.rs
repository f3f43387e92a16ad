#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Argon2PasswordHasher;
use auth::JwtTokenManager;
use auth::TokenConfig;
use identity_service::domain::identity::errors::EventPublisherError;
use identity_service::domain::identity::events::UserRegisteredEvent;
use identity_service::domain::identity::ports::EventPublisher;
use identity_service::domain::identity::service::CredentialService;
use identity_service::inbound::http::router::create_internal_router;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryIdentityRepository;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_ISSUER: &str = "app";

/// Event publisher that keeps every published event in memory.
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<UserRegisteredEvent>>,
}

impl RecordingEventPublisher {
    pub fn events(&self) -> Vec<UserRegisteredEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish_user_registered(
        &self,
        event: &UserRegisteredEvent,
    ) -> Result<(), EventPublisherError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Event publisher whose broker is always unreachable.
pub struct UnreachableEventPublisher;

#[async_trait]
impl EventPublisher for UnreachableEventPublisher {
    async fn publish_user_registered(
        &self,
        _event: &UserRegisteredEvent,
    ) -> Result<(), EventPublisherError> {
        Err(EventPublisherError::ConnectionFailed(
            "broker unreachable".to_string(),
        ))
    }
}

pub fn token_config() -> TokenConfig {
    TokenConfig {
        secret: TEST_SECRET.to_vec(),
        issuer: TEST_ISSUER.to_string(),
        access_ttl: chrono::Duration::minutes(15),
        refresh_ttl: chrono::Duration::days(30),
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub internal_address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryIdentityRepository>,
    pub events: Arc<RecordingEventPublisher>,
    pub token_manager: Arc<JwtTokenManager>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let events = Arc::new(RecordingEventPublisher::default());
        Self::spawn_with_publisher(Arc::clone(&events), events).await
    }

    /// Spawn the application with a publisher that always fails.
    pub async fn spawn_with_unreachable_broker() -> Self {
        Self::spawn_with_publisher(
            Arc::new(UnreachableEventPublisher),
            Arc::new(RecordingEventPublisher::default()),
        )
        .await
    }

    async fn spawn_with_publisher<EP: EventPublisher>(
        publisher: Arc<EP>,
        events: Arc<RecordingEventPublisher>,
    ) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let internal_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let internal_address = format!(
            "http://127.0.0.1:{}",
            internal_listener.local_addr().unwrap().port()
        );

        let repository = Arc::new(InMemoryIdentityRepository::new());
        let credential_service = Arc::new(CredentialService::new(
            Arc::clone(&repository),
            publisher,
            Arc::new(Argon2PasswordHasher::new()),
        ));
        let token_manager = Arc::new(JwtTokenManager::new(token_config()));

        let router = create_router(credential_service.clone(), token_manager.clone());
        let internal_router = create_internal_router(credential_service);

        // Spawn servers in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });
        tokio::spawn(async move {
            axum::serve(internal_listener, internal_router)
                .await
                .expect("Internal server error");
        });

        Self {
            address,
            port,
            internal_address,
            api_client: reqwest::Client::new(),
            repository,
            events,
            token_manager,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request against the internal listener
    pub fn post_internal(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .post(format!("{}{}", self.internal_address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Send a registration request.
    pub async fn register(&self, email: &str, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({
                "email": email,
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an identity that must succeed and return its response data.
    pub async fn register_ok(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> serde_json::Value {
        let response = self.register(email, username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}
