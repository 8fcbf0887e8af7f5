use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Persistence abstraction for todos. Inputs arrive pre-validated from the
/// service; every query is already owner-filtered.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(&self, owner_id: Uuid, text: &str)
        -> Result<models::todo::Model, ServiceError>;
    async fn list_by_owner(&self, owner_id: Uuid)
        -> Result<Vec<models::todo::Model>, ServiceError>;
    async fn find_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<models::todo::Model>, ServiceError>;
    async fn update_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
        text: Option<String>,
        completed: bool,
        completed_at: Option<i64>,
    ) -> Result<Option<models::todo::Model>, ServiceError>;
    async fn delete_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<models::todo::Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmTodoRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl TodoRepository for SeaOrmTodoRepository {
    async fn create(
        &self,
        owner_id: Uuid,
        text: &str,
    ) -> Result<models::todo::Model, ServiceError> {
        Ok(models::todo::create(&self.db, owner_id, text).await?)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<models::todo::Model>, ServiceError> {
        Ok(models::todo::list_by_owner(&self.db, owner_id).await?)
    }

    async fn find_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<models::todo::Model>, ServiceError> {
        Ok(models::todo::find_for_owner(&self.db, id, owner_id).await?)
    }

    async fn update_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
        text: Option<String>,
        completed: bool,
        completed_at: Option<i64>,
    ) -> Result<Option<models::todo::Model>, ServiceError> {
        Ok(models::todo::update_for_owner(&self.db, id, owner_id, text, completed, completed_at)
            .await?)
    }

    async fn delete_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<models::todo::Model>, ServiceError> {
        Ok(models::todo::delete_for_owner(&self.db, id, owner_id).await?)
    }
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockTodoRepository {
        todos: Mutex<Vec<models::todo::Model>>,
    }

    #[async_trait]
    impl TodoRepository for MockTodoRepository {
        async fn create(
            &self,
            owner_id: Uuid,
            text: &str,
        ) -> Result<models::todo::Model, ServiceError> {
            let now = Utc::now();
            let todo = models::todo::Model {
                id: Uuid::new_v4(),
                owner_id,
                text: text.to_string(),
                completed: false,
                completed_at: None,
                created_at: now.into(),
                updated_at: now.into(),
            };
            self.todos.lock().unwrap().push(todo.clone());
            Ok(todo)
        }

        async fn list_by_owner(
            &self,
            owner_id: Uuid,
        ) -> Result<Vec<models::todo::Model>, ServiceError> {
            let todos = self.todos.lock().unwrap();
            Ok(todos.iter().filter(|t| t.owner_id == owner_id).cloned().collect())
        }

        async fn find_for_owner(
            &self,
            id: Uuid,
            owner_id: Uuid,
        ) -> Result<Option<models::todo::Model>, ServiceError> {
            let todos = self.todos.lock().unwrap();
            Ok(todos.iter().find(|t| t.id == id && t.owner_id == owner_id).cloned())
        }

        async fn update_for_owner(
            &self,
            id: Uuid,
            owner_id: Uuid,
            text: Option<String>,
            completed: bool,
            completed_at: Option<i64>,
        ) -> Result<Option<models::todo::Model>, ServiceError> {
            let mut todos = self.todos.lock().unwrap();
            let Some(todo) = todos.iter_mut().find(|t| t.id == id && t.owner_id == owner_id)
            else {
                return Ok(None);
            };
            if let Some(text) = text {
                todo.text = text;
            }
            todo.completed = completed;
            todo.completed_at = completed_at;
            todo.updated_at = Utc::now().into();
            Ok(Some(todo.clone()))
        }

        async fn delete_for_owner(
            &self,
            id: Uuid,
            owner_id: Uuid,
        ) -> Result<Option<models::todo::Model>, ServiceError> {
            let mut todos = self.todos.lock().unwrap();
            let Some(pos) = todos.iter().position(|t| t.id == id && t.owner_id == owner_id)
            else {
                return Ok(None);
            };
            Ok(Some(todos.remove(pos)))
        }
    }
}
