use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auth::{self, ServerState};

pub mod todos;
pub mod users;

/// Build the full application router: public account routes plus the
/// token-gated todo and session routes.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    // Public routes (registration and login)
    let public = Router::new()
        .route("/users", post(users::register))
        .route("/users/login", post(users::login));

    // Everything else requires a resolved identity
    let protected = Router::new()
        .route("/todos", post(todos::create).get(todos::list))
        .route(
            "/todos/:id",
            get(todos::get_one).patch(todos::update).delete(todos::delete),
        )
        .route("/users/me", get(users::me))
        .route("/users/me/token", delete(users::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    public
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
