use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::identity::errors::RepositoryError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::UserId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;

#[derive(Default)]
struct Tables {
    by_id: HashMap<UserId, Identity>,
    email_index: HashMap<EmailAddress, UserId>,
    username_index: HashMap<Username, UserId>,
}

/// Process-local identity store.
///
/// All three keys live behind one lock, so the uniqueness check and the
/// insert happen atomically just like a table with unique constraints.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    tables: RwLock<Tables>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: &Identity) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.email_index.contains_key(&identity.email) {
            return Err(RepositoryError::Conflict("email".to_string()));
        }
        if tables.username_index.contains_key(&identity.username) {
            return Err(RepositoryError::Conflict("username".to_string()));
        }
        if tables.by_id.contains_key(&identity.user_id) {
            return Err(RepositoryError::Conflict("identity".to_string()));
        }

        tables
            .email_index
            .insert(identity.email.clone(), identity.user_id);
        tables
            .username_index
            .insert(identity.username.clone(), identity.user_id);
        tables.by_id.insert(identity.user_id, identity.clone());

        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Identity, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .email_index
            .get(email)
            .and_then(|user_id| tables.by_id.get(user_id))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Identity, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .username_index
            .get(username)
            .and_then(|user_id| tables.by_id.get(user_id))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Identity, RepositoryError> {
        self.tables
            .read()
            .await
            .by_id
            .get(user_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}
