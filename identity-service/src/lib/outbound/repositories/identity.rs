use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::errors::RepositoryError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::UserId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;

const EMAIL_CONSTRAINT: &str = "identities_email_key";
const USERNAME_CONSTRAINT: &str = "identities_username_key";

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Identity, RepositoryError> {
        let query = format!(
            r#"
            SELECT user_id, email, username, password_hash, created_at
            FROM identities
            WHERE {} = $1
            "#,
            column
        );

        let row = sqlx::query_as::<_, IdentityRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct IdentityRow {
    user_id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = RepositoryError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            user_id: UserId(row.user_id),
            email: EmailAddress::parse(&row.email)
                .map_err(|e| RepositoryError::Database(format!("corrupt email column: {}", e)))?,
            username: Username::parse(&row.username).map_err(|e| {
                RepositoryError::Database(format!("corrupt username column: {}", e))
            })?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn create(&self, identity: &Identity) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO identities (user_id, email, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(identity.user_id.0)
        .bind(identity.email.as_str())
        .bind(identity.username.as_str())
        .bind(identity.password_hash.as_str())
        .bind(identity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    let field = match db_err.constraint() {
                        Some(EMAIL_CONSTRAINT) => "email",
                        Some(USERNAME_CONSTRAINT) => "username",
                        _ => "identity",
                    };
                    return RepositoryError::Conflict(field.to_string());
                }
            }
            RepositoryError::Database(e.to_string())
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Identity, RepositoryError> {
        self.find_one("email", email.as_str()).await
    }

    async fn find_by_username(&self, username: &Username) -> Result<Identity, RepositoryError> {
        self.find_one("username", username.as_str()).await
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Identity, RepositoryError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT user_id, email, username, password_hash, created_at
            FROM identities
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
