use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::Utc;
use tokio::sync::OnceCell;

use crate::domain::identity::errors::IdentifierError;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::errors::RepositoryError;
use crate::domain::identity::events::UserRegisteredEvent;
use crate::domain::identity::models::Availability;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityProfile;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Subject;
use crate::domain::identity::models::UserId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::CredentialServicePort;
use crate::domain::identity::ports::EventPublisher;
use crate::domain::identity::ports::IdentityRepository;

/// Deadlines imposed on the service's I/O collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTimeouts {
    /// Applied to every identity store call.
    pub store: Duration,
    /// Applied to the event publish after registration.
    pub publish: Duration,
}

impl Default for ServiceTimeouts {
    fn default() -> Self {
        Self {
            store: Duration::from_secs(5),
            publish: Duration::from_secs(3),
        }
    }
}

/// Validated identifier used to address the store.
enum LookupKey {
    Email(EmailAddress),
    Username(Username),
    UserId(UserId),
}

impl TryFrom<&Subject> for LookupKey {
    type Error = IdentifierError;

    fn try_from(subject: &Subject) -> Result<Self, Self::Error> {
        match subject {
            Subject::Email(raw) => EmailAddress::parse(raw).map(LookupKey::Email),
            Subject::Username(raw) => Username::parse(raw).map(LookupKey::Username),
            Subject::UserId(raw) => UserId::from_string(raw).map(LookupKey::UserId),
        }
    }
}

/// Domain service implementation for credential operations.
///
/// Stateless per call: everything it holds is shared read-only between requests.
pub struct CredentialService<IR, EP, PH>
where
    IR: IdentityRepository,
    EP: EventPublisher,
    PH: PasswordHasher,
{
    repository: Arc<IR>,
    event_publisher: Arc<EP>,
    password_hasher: Arc<PH>,
    timeouts: ServiceTimeouts,
    decoy_digest: OnceCell<String>,
}

impl<IR, EP, PH> CredentialService<IR, EP, PH>
where
    IR: IdentityRepository,
    EP: EventPublisher,
    PH: PasswordHasher,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `event_publisher` - Domain event publishing implementation
    /// * `password_hasher` - Password hashing capability
    pub fn new(repository: Arc<IR>, event_publisher: Arc<EP>, password_hasher: Arc<PH>) -> Self {
        Self {
            repository,
            event_publisher,
            password_hasher,
            timeouts: ServiceTimeouts::default(),
            decoy_digest: OnceCell::new(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: ServiceTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    async fn with_store_deadline<T>(
        &self,
        operation: impl Future<Output = Result<T, RepositoryError>>,
    ) -> Result<T, RepositoryError> {
        tokio::time::timeout(self.timeouts.store, operation)
            .await
            .unwrap_or(Err(RepositoryError::Timeout))
    }

    async fn find(&self, key: &LookupKey) -> Result<Identity, RepositoryError> {
        match key {
            LookupKey::Email(email) => {
                self.with_store_deadline(self.repository.find_by_email(email))
                    .await
            }
            LookupKey::Username(username) => {
                self.with_store_deadline(self.repository.find_by_username(username))
                    .await
            }
            LookupKey::UserId(user_id) => {
                self.with_store_deadline(self.repository.find_by_user_id(user_id))
                    .await
            }
        }
    }

    /// Answer one existence check; a miss means the identifier is free.
    async fn is_unclaimed(&self, key: LookupKey) -> Result<bool, IdentityError> {
        match self.find(&key).await {
            Ok(_) => Ok(false),
            Err(RepositoryError::NotFound) => Ok(true),
            Err(e) => {
                tracing::error!("Availability check failed: {}", e);
                Err(IdentityError::Internal("availability check failed"))
            }
        }
    }

    async fn hash_password(&self, password: &Password) -> Result<String, IdentityError> {
        let hasher = Arc::clone(&self.password_hasher);
        let plaintext = password.expose().to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| {
                tracing::error!("Password hashing task failed: {}", e);
                IdentityError::Internal("hash generation failed")
            })?
            .map_err(|e| {
                tracing::error!("Password hashing failed: {}", e);
                IdentityError::Internal("hash generation failed")
            })
    }

    async fn verify_password(
        &self,
        digest: &str,
        password: &Password,
    ) -> Result<bool, IdentityError> {
        let hasher = Arc::clone(&self.password_hasher);
        let digest = digest.to_string();
        let plaintext = password.expose().to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&digest, &plaintext))
            .await
            .map_err(|e| {
                tracing::error!("Password verification task failed: {}", e);
                IdentityError::Internal("credential check failed")
            })
    }

    /// Verify against a throwaway digest, so a login for an unknown identifier
    /// spends the same hashing work as one with a wrong password.
    async fn verify_against_decoy(&self, password: &Password) {
        let decoy = Password::new("decoy-credential");
        let digest = self
            .decoy_digest
            .get_or_try_init(|| self.hash_password(&decoy))
            .await;

        if let Ok(digest) = digest {
            let _ = self.verify_password(digest, password).await;
        }
    }

    /// Best-effort side effect of a registration.
    ///
    /// Publishing is attempted once under the publish deadline. Failures are
    /// logged and never reach the caller of `register`.
    async fn publish_user_registered(&self, identity: &Identity) {
        let event = UserRegisteredEvent::new(identity);
        let publish = self.event_publisher.publish_user_registered(&event);

        match tokio::time::timeout(self.timeouts.publish, publish).await {
            Ok(Ok(())) => {
                tracing::debug!(user_id = %identity.user_id, "UserRegistered event published");
            }
            Ok(Err(e)) => {
                tracing::error!(
                    "Failed to publish UserRegistered event for user {}: {}",
                    identity.user_id,
                    e
                );
            }
            Err(_) => {
                tracing::error!(
                    "Publishing UserRegistered event for user {} timed out after {:?}",
                    identity.user_id,
                    self.timeouts.publish
                );
            }
        }
    }
}

#[async_trait]
impl<IR, EP, PH> CredentialServicePort for CredentialService<IR, EP, PH>
where
    IR: IdentityRepository,
    EP: EventPublisher,
    PH: PasswordHasher,
{
    async fn register(&self, command: RegisterCommand) -> Result<UserId, IdentityError> {
        let email = EmailAddress::parse(&command.email)?;
        let username = Username::parse(&command.username)?;
        command.password.check_policy()?;

        let password_hash = self.hash_password(&command.password).await?;

        let identity = Identity {
            user_id: UserId::new(),
            email,
            username,
            password_hash,
            created_at: Utc::now(),
        };

        self.with_store_deadline(self.repository.create(&identity))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(field) => IdentityError::AlreadyExists(field),
                other => {
                    tracing::error!("Failed to create identity: {}", other);
                    IdentityError::Internal("create identity failed")
                }
            })?;

        tracing::info!(user_id = %identity.user_id, "Identity registered");

        self.publish_user_registered(&identity).await;

        Ok(identity.user_id)
    }

    async fn login(&self, command: LoginCommand) -> Result<UserId, IdentityError> {
        if command.password.is_empty() {
            return Err(IdentifierError::Empty("password").into());
        }

        let key = LookupKey::try_from(&command.subject)?;

        let identity = match self.find(&key).await {
            Ok(identity) => identity,
            Err(RepositoryError::NotFound) => {
                self.verify_against_decoy(&command.password).await;
                tracing::info!("Login rejected");
                return Err(IdentityError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!("Identity lookup failed during login: {}", e);
                return Err(IdentityError::Internal("lookup failed"));
            }
        };

        if !self
            .verify_password(&identity.password_hash, &command.password)
            .await?
        {
            tracing::info!("Login rejected");
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(identity.user_id)
    }

    async fn resolve(&self, subject: Subject) -> Result<IdentityProfile, IdentityError> {
        let key = LookupKey::try_from(&subject)?;

        match self.find(&key).await {
            Ok(identity) => Ok(identity.profile()),
            Err(RepositoryError::NotFound) => Err(IdentityError::NotFound),
            Err(e) => {
                tracing::error!("Identity lookup failed during resolve: {}", e);
                Err(IdentityError::Internal("lookup failed"))
            }
        }
    }

    async fn check_availability(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Availability, IdentityError> {
        let email = EmailAddress::parse(email)?;
        let username = Username::parse(username)?;

        let email_available = self.is_unclaimed(LookupKey::Email(email)).await?;
        let username_available = self.is_unclaimed(LookupKey::Username(username)).await?;

        Ok(Availability {
            email_available,
            username_available,
        })
    }
}
