use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::repository::TodoRepository;
use crate::errors::ServiceError;

/// Partial update accepted by PATCH. Only `text` and `completed` are
/// patchable; `completed_at` is always recomputed, never client-supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

/// Ownership-scoped todo operations. The owner id comes from the resolved
/// request identity, so a miss never reveals whether the id exists at all.
pub struct TodoService<R: TodoRepository> {
    repo: Arc<R>,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, text), fields(owner_id = %owner_id))]
    pub async fn create(
        &self,
        owner_id: Uuid,
        text: &str,
    ) -> Result<models::todo::Model, ServiceError> {
        let text = models::todo::validate_text(text)?;
        let todo = self.repo.create(owner_id, &text).await?;
        info!(todo_id = %todo.id, "todo_created");
        Ok(todo)
    }

    pub async fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<models::todo::Model>, ServiceError> {
        self.repo.list_by_owner(owner_id).await
    }

    pub async fn get_by_id_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<models::todo::Model, ServiceError> {
        self.repo
            .find_for_owner(id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Apply a partial patch. Completion is recomputed from the patch alone:
    /// an explicit `completed: true` stamps the current time, anything else
    /// (false or omitted) forces the todo back to not-completed. This
    /// mirrors the long-observed behavior of the API and is deliberate.
    #[instrument(skip(self, patch), fields(owner_id = %owner_id, todo_id = %id))]
    pub async fn update_by_id_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: TodoPatch,
    ) -> Result<models::todo::Model, ServiceError> {
        let text = match patch.text {
            Some(ref t) => Some(models::todo::validate_text(t)?),
            None => None,
        };
        let (completed, completed_at) = if patch.completed == Some(true) {
            (true, Some(Utc::now().timestamp_millis()))
        } else {
            (false, None)
        };
        self.repo
            .update_for_owner(id, owner_id, text, completed, completed_at)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn delete_by_id_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<models::todo::Model, ServiceError> {
        let deleted = self
            .repo
            .delete_for_owner(id, owner_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        info!(todo_id = %deleted.id, "todo_deleted");
        Ok(deleted)
    }
}
