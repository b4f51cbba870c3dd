use chrono::{SubsecRound, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Stored hashes are PHC strings (`$argon2id$v=19$...`).
fn validate_hash(password_hash: &str) -> Result<(), ModelError> {
    if !password_hash.starts_with('$') || password_hash.len() < 16 {
        return Err(ModelError::Validation("password_hash must be a PHC hash string".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, email: &str, password_hash: &str, name: &str) -> Result<Model, ModelError> {
    if !email.contains('@') { return Err(ModelError::Validation("invalid email".into())); }
    if name.trim().is_empty() { return Err(ModelError::Validation("name required".into())); }
    validate_hash(password_hash)?;
    let now = Utc::now().trunc_subsecs(6).into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        name: Set(name.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_active_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    let found = Entity::find_by_id(id)
        .filter(Column::DeletedAt.is_null())
        .one(db)
        .await?;
    Ok(found)
}

pub async fn find_active_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::Email.eq(email))
        .filter(Column::DeletedAt.is_null())
        .one(db)
        .await?;
    Ok(found)
}

/// Persist the mutable columns of `user` (email, name, hash, updated_at).
/// Rows that were logically deleted are left alone and reported as missing.
pub async fn update(db: &DatabaseConnection, user: &Model) -> Result<Model, ModelError> {
    validate_hash(&user.password_hash)?;
    let res = Entity::update_many()
        .col_expr(Column::Email, Expr::value(user.email.clone()))
        .col_expr(Column::Name, Expr::value(user.name.clone()))
        .col_expr(Column::PasswordHash, Expr::value(user.password_hash.clone()))
        .col_expr(Column::UpdatedAt, Expr::value(user.updated_at))
        .filter(Column::Id.eq(user.id))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ModelError::NotFound("user"));
    }
    Ok(user.clone())
}

pub async fn soft_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::DeletedAt, Expr::value(now))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ModelError::NotFound("user"));
    }
    Ok(())
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
