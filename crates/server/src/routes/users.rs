use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::{AuthUser, LoginInput, RegisterInput};

use crate::auth::{CurrentUser, ServerState, AUTH_HEADER};
use crate::errors::ApiError;

/// External representation of a user: id and email, nothing else. The
/// password hash and the token list stay server-side.
#[derive(Serialize)]
pub struct UserBody {
    pub id: Uuid,
    pub email: String,
}

impl From<AuthUser> for UserBody {
    fn from(u: AuthUser) -> Self {
        Self { id: u.id, email: u.email }
    }
}

/// POST /users — register, open a session, and hand the token back in the
/// `x-auth` response header.
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<([(&'static str, String); 1], Json<UserBody>), ApiError> {
    let user = state.auth.register(input).await?;
    let token = state.auth.issue_session(user.id).await?;
    Ok(([(AUTH_HEADER, token)], Json(user.into())))
}

/// POST /users/login — authenticate and open a fresh session. Bad
/// credentials are a bare 400; the body never says which part was wrong.
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<([(&'static str, String); 1], Json<UserBody>), ApiError> {
    let session = state.auth.login(input).await?;
    Ok(([(AUTH_HEADER, session.token)], Json(session.user.into())))
}

/// GET /users/me — echo the identity the gate resolved.
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<UserBody> {
    Json(current.user.into())
}

/// DELETE /users/me/token — revoke exactly the session token that
/// authenticated this request.
pub async fn logout(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode, ApiError> {
    state
        .auth
        .revoke_session(current.user.id, &current.token)
        .await
        .map_err(|_| ApiError::bad_request())?;
    Ok(StatusCode::OK)
}
