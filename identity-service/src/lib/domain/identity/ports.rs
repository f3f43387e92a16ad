use async_trait::async_trait;

use crate::domain::identity::errors::EventPublisherError;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::errors::RepositoryError;
use crate::domain::identity::events::UserRegisteredEvent;
use crate::domain::identity::models::Availability;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityProfile;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Subject;
use crate::domain::identity::models::UserId;
use crate::domain::identity::models::Username;

/// Port for credential operations exposed to transports.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Arguments
    /// * `command` - Raw email, username and password
    ///
    /// # Returns
    /// Id of the created identity
    ///
    /// # Errors
    /// * `InvalidArgument` - Blank identifier or password shorter than 6 characters
    /// * `AlreadyExists` - Email or username is already registered
    /// * `Internal` - Hashing or storage failed
    async fn register(&self, command: RegisterCommand) -> Result<UserId, IdentityError>;

    /// Authenticate an identity by email, username or user id.
    ///
    /// # Returns
    /// Id of the authenticated identity
    ///
    /// # Errors
    /// * `InvalidArgument` - Blank subject or password
    /// * `InvalidCredentials` - Unknown identifier or wrong password
    /// * `Internal` - Storage failed
    async fn login(&self, command: LoginCommand) -> Result<UserId, IdentityError>;

    /// Look up an identity without checking a password.
    ///
    /// For trusted internal callers only.
    ///
    /// # Errors
    /// * `InvalidArgument` - Blank or malformed subject
    /// * `NotFound` - No identity matches
    /// * `Internal` - Storage failed
    async fn resolve(&self, subject: Subject) -> Result<IdentityProfile, IdentityError>;

    /// Report whether an email and a username are still unclaimed.
    ///
    /// # Errors
    /// * `InvalidArgument` - Either identifier is blank
    /// * `Internal` - Either existence check failed
    async fn check_availability(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Availability, IdentityError>;
}

/// Persistence operations for identity records.
///
/// Adapters must enforce uniqueness of email and username atomically.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity.
    ///
    /// # Errors
    /// * `Conflict` - Email or username is already taken
    /// * `Database` - Storage operation failed
    async fn create(&self, identity: &Identity) -> Result<(), RepositoryError>;

    /// # Errors
    /// * `NotFound` - No identity with this email
    /// * `Database` - Storage operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Identity, RepositoryError>;

    /// # Errors
    /// * `NotFound` - No identity with this username
    /// * `Database` - Storage operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Identity, RepositoryError>;

    /// # Errors
    /// * `NotFound` - No identity with this id
    /// * `Database` - Storage operation failed
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Identity, RepositoryError>;
}

/// Event publishing for domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Publish a user registration event.
    ///
    /// # Errors
    /// * `SerializationFailed` - Event serialization failed
    /// * `PublishFailed` - Failed to publish to broker
    /// * `ConnectionFailed` - Broker connection failed
    /// * `Timeout` - Publishing timed out
    async fn publish_user_registered(
        &self,
        event: &UserRegisteredEvent,
    ) -> Result<(), EventPublisherError>;
}
