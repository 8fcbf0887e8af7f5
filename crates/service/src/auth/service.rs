use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use super::repository::AuthRepository;
use crate::errors::ServiceError;
use crate::password::Hasher;
use crate::token::Issuer;

/// Credential store and session workflows, independent of the web framework.
///
/// The signing secret and the hashing policy are injected at construction;
/// there is no ambient global state.
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    hasher: Hasher,
    issuer: Issuer,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, hasher: Hasher, issuer: Issuer) -> Self {
        Self { repo, hasher, issuer }
    }

    /// Register a new user: validate, then hash, then persist — in that
    /// order, as three explicit steps. The plaintext is hashed exactly once
    /// and dropped; the created user starts with an empty token list.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, ServiceError> {
        models::user::validate_email(&input.email)?;
        models::user::validate_password(&input.password)?;
        if let Some(existing) = self.repo.find_user_by_email(input.email.trim()).await? {
            debug!(user_id = %existing.id, "email already registered");
            return Err(ServiceError::DuplicateEmail);
        }

        let hash = self.hasher.hash(&input.password)?;
        let user = self.repo.create_user(input.email.trim(), &hash).await?;
        info!(user_id = %user.id, "user_registered");
        Ok(user.into())
    }

    /// Check credentials. Unknown email and wrong password produce the same
    /// `InvalidCredentials`, so callers cannot probe for registered emails.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn authenticate(&self, input: LoginInput) -> Result<AuthUser, ServiceError> {
        let user = self
            .repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;
        if !self.hasher.verify(&input.password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }
        Ok(user.into())
    }

    /// Issue a fresh session token and append it to the user's token list.
    pub async fn issue_session(&self, user_id: Uuid) -> Result<String, ServiceError> {
        let token = self.issuer.issue(user_id)?;
        self.repo
            .append_token(user_id, models::user_token::PURPOSE_AUTH, &token)
            .await?;
        Ok(token)
    }

    /// Authenticate then open a session: the login flow.
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, ServiceError> {
        let user = self.authenticate(input).await?;
        let token = self.issue_session(user.id).await?;
        info!(user_id = %user.id, "session_opened");
        Ok(AuthSession { user, token })
    }

    /// Resolve a presented token to a user, the gate algorithm:
    /// verify the signature, load the user by the verified subject, and
    /// require the exact token to appear in that user's list with the
    /// `"auth"` purpose. Every failure collapses into `Unauthenticated`;
    /// the caller learns nothing about which step rejected.
    pub async fn authenticate_token(&self, token: &str) -> Result<AuthSession, ServiceError> {
        let claims = self
            .issuer
            .verify(token)
            .map_err(|_| ServiceError::Unauthenticated)?;
        if claims.purpose != models::user_token::PURPOSE_AUTH {
            return Err(ServiceError::Unauthenticated);
        }
        let user_id = claims.subject_id().ok_or(ServiceError::Unauthenticated)?;
        let user = self
            .repo
            .find_user_by_id(user_id)
            .await
            .map_err(|_| ServiceError::Unauthenticated)?
            .ok_or(ServiceError::Unauthenticated)?;
        let listed = self
            .repo
            .token_matches(user_id, models::user_token::PURPOSE_AUTH, token)
            .await
            .map_err(|_| ServiceError::Unauthenticated)?;
        if !listed {
            return Err(ServiceError::Unauthenticated);
        }
        Ok(AuthSession { user: user.into(), token: token.to_string() })
    }

    /// Remove one session entry. Revoking a token that is already gone is
    /// still success.
    pub async fn revoke_session(&self, user_id: Uuid, token: &str) -> Result<(), ServiceError> {
        self.repo.remove_token(user_id, token).await?;
        info!(user_id = %user_id, "session_revoked");
        Ok(())
    }
}
