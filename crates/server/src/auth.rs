use std::sync::Arc;

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use sea_orm::DatabaseConnection;
use service::auth::domain::AuthUser;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::AuthService;
use service::password::Hasher;
use service::todos::repository::SeaOrmTodoRepository;
use service::todos::TodoService;
use service::token::Issuer;

use crate::errors::ApiError;

/// Header carrying the raw session token.
pub const AUTH_HEADER: &str = "x-auth";

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub todos: Arc<TodoService<SeaOrmTodoRepository>>,
}

impl ServerState {
    /// Wire the services onto a database connection. The JWT secret arrives
    /// from configuration; nothing here reads the environment.
    pub fn new(db: DatabaseConnection, jwt_secret: &str) -> Self {
        let auth_repo = Arc::new(SeaOrmAuthRepository { db: db.clone() });
        let todo_repo = Arc::new(SeaOrmTodoRepository { db });
        Self {
            auth: Arc::new(AuthService::new(auth_repo, Hasher, Issuer::new(jwt_secret))),
            todos: Arc::new(TodoService::new(todo_repo)),
        }
    }
}

/// Identity resolved by the gate, attached to the request for handlers.
/// Holds the exact raw token so logout can revoke this session and no other.
#[derive(Clone)]
pub struct CurrentUser {
    pub user: AuthUser,
    pub token: String,
}

/// Authentication gate. Extracts `x-auth`, verifies the signature, and
/// cross-checks the token against the user's session list. Read-only; every
/// rejection is 401 with an empty JSON body, whatever the underlying cause.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(ApiError::unauthenticated)?;

    let session = state
        .auth
        .authenticate_token(&token)
        .await
        .map_err(|_| ApiError::unauthenticated())?;

    req.extensions_mut().insert(CurrentUser { user: session.user, token: session.token });
    Ok(next.run(req).await)
}
