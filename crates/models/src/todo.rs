use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "todo")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
    pub completed: bool,
    /// Epoch milliseconds; non-null exactly when `completed` is true.
    pub completed_at: Option<i64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(crate::user::Entity)
                .from(Column::OwnerId)
                .to(crate::user::Column::Id)
                .into(),
        }
    }
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim and require at least one character.
pub fn validate_text(text: &str) -> Result<String, errors::ModelError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::validation("text", "text is required"));
    }
    Ok(trimmed.to_string())
}

pub async fn create(
    db: &DatabaseConnection,
    owner_id: Uuid,
    text: &str,
) -> Result<Model, errors::ModelError> {
    let text = validate_text(text)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        text: Set(text),
        completed: Set(false),
        completed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_by_owner(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Fetch a todo only when both the id exists and the owner matches. A miss
/// for either reason is the same `None`; callers cannot tell them apart.
pub async fn find_for_owner(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .filter(Column::OwnerId.eq(owner_id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Apply an already-resolved patch. The completion recompute lives in the
/// service layer; this function writes whatever it is handed.
pub async fn update_for_owner(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
    text: Option<String>,
    completed: bool,
    completed_at: Option<i64>,
) -> Result<Option<Model>, errors::ModelError> {
    let Some(found) = find_for_owner(db, id, owner_id).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    if let Some(text) = text {
        am.text = Set(text);
    }
    am.completed = Set(completed);
    am.completed_at = Set(completed_at);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(Some(updated))
}

/// Delete behind the same ownership gate; returns the removed row.
pub async fn delete_for_owner(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<Model>, errors::ModelError> {
    let Some(found) = find_for_owner(db, id, owner_id).await? else {
        return Ok(None);
    };
    Entity::delete_by_id(found.id)
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(Some(found))
}
