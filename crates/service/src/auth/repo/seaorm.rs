use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::domain::UserRecord;
use crate::auth::repository::AuthRepository;
use crate::errors::ServiceError;

/// SeaORM-backed repository implementation.
pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn record(u: models::user::Model) -> UserRecord {
    UserRecord { id: u.id, email: u.email, password_hash: u.password_hash }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ServiceError> {
        let res = models::user::find_by_email(&self.db, email).await?;
        Ok(res.map(record))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, ServiceError> {
        let res = models::user::find_by_id(&self.db, id).await?;
        Ok(res.map(record))
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, ServiceError> {
        let created = models::user::create(&self.db, email, password_hash).await?;
        Ok(record(created))
    }

    async fn append_token(
        &self,
        user_id: Uuid,
        purpose: &str,
        token: &str,
    ) -> Result<(), ServiceError> {
        models::user_token::append(&self.db, user_id, purpose, token).await?;
        Ok(())
    }

    async fn token_matches(
        &self,
        user_id: Uuid,
        purpose: &str,
        token: &str,
    ) -> Result<bool, ServiceError> {
        let found = models::user_token::find_match(&self.db, user_id, purpose, token).await?;
        Ok(found.is_some())
    }

    async fn remove_token(&self, user_id: Uuid, token: &str) -> Result<(), ServiceError> {
        // Zero rows removed is still success; revocation is idempotent.
        models::user_token::remove(&self.db, user_id, token).await?;
        Ok(())
    }
}
