use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Stored user as the repository sees it. Carries the digest, so it must
/// never be serialized outward; handlers work with [`AuthUser`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// External view of a user: id and email only. The password hash and the
/// token list never appear in any response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl From<UserRecord> for AuthUser {
    fn from(r: UserRecord) -> Self {
        Self { id: r.id, email: r.email }
    }
}

/// A resolved session: the user plus the exact raw token that proved it.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}
