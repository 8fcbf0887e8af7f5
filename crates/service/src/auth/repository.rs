use async_trait::async_trait;
use uuid::Uuid;

use super::domain::UserRecord;
use crate::errors::ServiceError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ServiceError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, ServiceError>;
    async fn create_user(&self, email: &str, password_hash: &str)
        -> Result<UserRecord, ServiceError>;

    /// Append a session entry to the user's token list.
    async fn append_token(
        &self,
        user_id: Uuid,
        purpose: &str,
        token: &str,
    ) -> Result<(), ServiceError>;
    /// Exact `(user, purpose, token)` membership test.
    async fn token_matches(
        &self,
        user_id: Uuid,
        purpose: &str,
        token: &str,
    ) -> Result<bool, ServiceError>;
    /// Remove the exact matching entry; removing an absent token succeeds.
    async fn remove_token(&self, user_id: Uuid, token: &str) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<Uuid, UserRecord>>,
        // (user_id, purpose, token) in append order
        tokens: Mutex<Vec<(Uuid, String, String)>>,
    }

    impl MockAuthRepository {
        pub fn token_count(&self, user_id: Uuid) -> usize {
            self.tokens
                .lock()
                .unwrap()
                .iter()
                .filter(|(uid, _, _)| *uid == user_id)
                .count()
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(
            &self,
            email: &str,
        ) -> Result<Option<UserRecord>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(&id).cloned())
        }

        async fn create_user(
            &self,
            email: &str,
            password_hash: &str,
        ) -> Result<UserRecord, ServiceError> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email == email) {
                return Err(ServiceError::DuplicateEmail);
            }
            let user = UserRecord {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            };
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn append_token(
            &self,
            user_id: Uuid,
            purpose: &str,
            token: &str,
        ) -> Result<(), ServiceError> {
            self.tokens
                .lock()
                .unwrap()
                .push((user_id, purpose.to_string(), token.to_string()));
            Ok(())
        }

        async fn token_matches(
            &self,
            user_id: Uuid,
            purpose: &str,
            token: &str,
        ) -> Result<bool, ServiceError> {
            let tokens = self.tokens.lock().unwrap();
            Ok(tokens
                .iter()
                .any(|(uid, p, t)| *uid == user_id && p == purpose && t == token))
        }

        async fn remove_token(&self, user_id: Uuid, token: &str) -> Result<(), ServiceError> {
            let mut tokens = self.tokens.lock().unwrap();
            tokens.retain(|(uid, _, t)| !(*uid == user_id && t == token));
            Ok(())
        }
    }
}
