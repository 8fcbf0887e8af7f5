use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Tokens,
    Todos,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Tokens => Entity::has_many(crate::user_token::Entity).into(),
            Relation::Todos => Entity::has_many(crate::todo::Entity).into(),
        }
    }
}

impl Related<crate::user_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
    }
}

impl Related<crate::todo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Todos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Email syntax per the `validator` crate, plus a dotted-domain requirement
/// so bare single-label hosts are rejected for account email. Case is
/// preserved; uniqueness is enforced case-sensitively by the schema.
pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::validation("email", "email is required"));
    }
    let dotted_domain = trimmed
        .rsplit_once('@')
        .map_or(false, |(_, domain)| domain.contains('.'));
    if !dotted_domain || !trimmed.validate_email() {
        return Err(errors::ModelError::validation("email", "not a valid email address"));
    }
    Ok(())
}

/// Plaintext password policy, checked before hashing.
pub fn validate_password(password: &str) -> Result<(), errors::ModelError> {
    if password.len() < 6 {
        return Err(errors::ModelError::validation("password", "password too short (>=6)"));
    }
    Ok(())
}

/// Insert a user. The caller supplies an already-hashed password; plaintext
/// never reaches this layer.
pub async fn create(
    db: &DatabaseConnection,
    email: &str,
    password_hash: &str,
) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    if password_hash.trim().is_empty() {
        return Err(errors::ModelError::validation("password", "password hash required"));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.trim().to_string()),
        password_hash: Set(password_hash.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
