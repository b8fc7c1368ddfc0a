use std::str::FromStr;

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::db::entities::user;
use crate::db::enums::Role;
use crate::error::{validation, AppError, AppResult};
use crate::types::SessionUser;

const MIN_PASSWORD_LEN: usize = 8;

pub async fn count_users<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    Ok(user::Entity::find().count(db).await?)
}

pub async fn find_user_by_email<C: ConnectionTrait>(db: &C, email: &str) -> AppResult<Option<user::Model>> {
    let email = email.trim().to_lowercase();
    Ok(user::Entity::find().filter(user::Column::Email.eq(email)).one(db).await?)
}

pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    email: &str,
    name: &str,
    password: &str,
    role: Role,
    bcrypt_cost: u32,
) -> AppResult<user::Model> {
    let email = validation::optional_email(Some(email), "email")?.ok_or_else(|| AppError::ValidationError {
        field: "email".to_string(),
        message: "email is required".to_string(),
    })?;
    let name = validation::required_text(name, "name", 120)?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError {
            field: "password".to_string(),
            message: format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        });
    }

    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt_cost))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {}", e)))?;

    let model = user::ActiveModel {
        email: Set(email),
        name: Set(name),
        password_hash: Set(password_hash),
        role: Set(role.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

/// Checks the credentials and returns the session view of the user.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate<C: ConnectionTrait>(db: &C, email: &str, password: &str) -> AppResult<SessionUser> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }
    let Some(user) = find_user_by_email(db, email).await? else {
        return Err(AppError::InvalidCredentials);
    };

    let password = password.to_string();
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password verification failed: {}", e)))?;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    session_user(&user)
}

pub fn session_user(user: &user::Model) -> AppResult<SessionUser> {
    let role = Role::from_str(&user.role)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("user {} has unknown role {:?}", user.id, user.role)))?;
    Ok(SessionUser { id: user.id, email: user.email.clone(), name: user.name.clone(), role })
}

pub async fn find_user_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}
