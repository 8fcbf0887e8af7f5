use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Claims carried by a session token: the subject identity and a purpose
/// discriminator. There is deliberately no `exp` claim today; adding one
/// later only touches `issue`, not the verification contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub purpose: String,
    /// Random per-issue id so every session gets a distinct token string;
    /// revocation removes exactly one list entry. Ignored by verification.
    #[serde(default)]
    pub jti: String,
}

impl Claims {
    /// The verified subject as a store identifier, when it parses as one.
    pub fn subject_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Opaque verification failure. Callers treat every cause the same, so the
/// reason (malformed, bad signature, decode error) is kept internal.
#[derive(Debug, Error)]
#[error("token verification failed")]
pub struct VerificationError;

/// Signs and validates session tokens with a process-wide secret handed in
/// at construction. Verification is a pure function of token + secret; the
/// storage cross-check belongs to the authentication gate, not here.
#[derive(Clone)]
pub struct Issuer {
    secret: String,
}

impl Issuer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Produce a signed token for `user_id` with the `"auth"` purpose.
    pub fn issue(&self, user_id: Uuid) -> Result<String, ServiceError> {
        let claims = Claims {
            sub: user_id.to_string(),
            purpose: models::user_token::PURPOSE_AUTH.to_string(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("token signing failed: {e}")))
    }

    /// Validate signature and shape, returning the claims. Fails closed on
    /// any tampering or decoding problem.
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No expiry is enforced in the current scope; do not require `exp`.
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| VerificationError)
    }
}
