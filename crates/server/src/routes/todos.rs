use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use service::todos::TodoPatch;
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

/// Wire shape of a todo; field names match the original API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoBody {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
    pub completed: bool,
    pub completed_at: Option<i64>,
}

impl From<models::todo::Model> for TodoBody {
    fn from(t: models::todo::Model) -> Self {
        Self {
            id: t.id,
            owner_id: t.owner_id,
            text: t.text,
            completed: t.completed,
            completed_at: t.completed_at,
        }
    }
}

#[derive(Serialize)]
pub struct TodoListBody {
    pub todos: Vec<TodoBody>,
}

#[derive(Serialize)]
pub struct TodoItemBody {
    pub todo: TodoBody,
}

#[derive(Deserialize)]
pub struct CreateTodoInput {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTodoInput {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Malformed ids answer 404 before any store round trip.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found())
}

/// A miss on PATCH/DELETE is a 400, not a 404 — observed contract of the
/// original API, preserved deliberately.
fn miss_as_bad_request(e: ServiceError) -> ApiError {
    match e {
        ServiceError::NotFound => ApiError::bad_request(),
        other => other.into(),
    }
}

/// POST /todos — create for the authenticated owner; responds with the bare
/// created todo.
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<CreateTodoInput>,
) -> Result<Json<TodoBody>, ApiError> {
    let text = input.text.unwrap_or_default();
    let todo = state.todos.create(current.user.id, &text).await?;
    Ok(Json(todo.into()))
}

/// GET /todos — everything the requester owns, and only that.
pub async fn list(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<TodoListBody>, ApiError> {
    let todos = state.todos.list_by_owner(current.user.id).await?;
    Ok(Json(TodoListBody { todos: todos.into_iter().map(Into::into).collect() }))
}

/// GET /todos/:id
pub async fn get_one(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<TodoItemBody>, ApiError> {
    let id = parse_id(&id)?;
    let todo = state.todos.get_by_id_for_owner(id, current.user.id).await?;
    Ok(Json(TodoItemBody { todo: todo.into() }))
}

/// PATCH /todos/:id — partial patch of text/completed; `completedAt` is
/// recomputed server-side.
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTodoInput>,
) -> Result<Json<TodoItemBody>, ApiError> {
    let id = parse_id(&id)?;
    let patch = TodoPatch { text: input.text, completed: input.completed };
    let todo = state
        .todos
        .update_by_id_for_owner(id, current.user.id, patch)
        .await
        .map_err(miss_as_bad_request)?;
    Ok(Json(TodoItemBody { todo: todo.into() }))
}

/// DELETE /todos/:id — responds with the deleted todo.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<TodoItemBody>, ApiError> {
    let id = parse_id(&id)?;
    let todo = state
        .todos
        .delete_by_id_for_owner(id, current.user.id)
        .await
        .map_err(miss_as_bad_request)?;
    Ok(Json(TodoItemBody { todo: todo.into() }))
}
