use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::entities::{author, post};
use crate::error::{validation, AppError, AppResult, OptionExt};
use crate::types::AuthorInput;

struct CleanAuthor {
    name: String,
    email: Option<String>,
    bio: Option<String>,
    avatar_url: Option<String>,
}

fn clean(input: &AuthorInput) -> AppResult<CleanAuthor> {
    Ok(CleanAuthor {
        name: validation::required_text(&input.name, "name", 120)?,
        email: validation::optional_email(input.email.as_deref(), "email")?,
        bio: validation::optional_text(input.bio.as_deref(), "bio", 5000)?,
        avatar_url: validation::optional_url(input.avatar_url.as_deref(), "avatar_url")?,
    })
}

pub async fn list_authors<C: ConnectionTrait>(db: &C) -> AppResult<Vec<author::Model>> {
    let authors = author::Entity::find()
        .order_by_asc(author::Column::Name)
        .order_by_asc(author::Column::Id)
        .all(db)
        .await?;
    Ok(authors)
}

pub async fn get_author<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<author::Model> {
    author::Entity::find_by_id(id).one(db).await?.ok_or_not_found("Author")
}

pub async fn create_author<C: ConnectionTrait>(db: &C, input: &AuthorInput) -> AppResult<author::Model> {
    let a = clean(input)?;
    let model = author::ActiveModel {
        name: Set(a.name),
        email: Set(a.email),
        bio: Set(a.bio),
        avatar_url: Set(a.avatar_url),
        ..Default::default()
    }
    .insert(db)
    .await?;
    tracing::info!(author_id = model.id, name = %model.name, "Author created");
    Ok(model)
}

pub async fn update_author<C: ConnectionTrait>(db: &C, id: i32, input: &AuthorInput) -> AppResult<author::Model> {
    let a = clean(input)?;
    let mut active = get_author(db, id).await?.into_active_model();
    active.name = Set(a.name);
    active.email = Set(a.email);
    active.bio = Set(a.bio);
    active.avatar_url = Set(a.avatar_url);
    Ok(active.update(db).await?)
}

/// Refuses to delete an author that still owns posts.
pub async fn delete_author<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    get_author(db, id).await?;
    let owned = post::Entity::find().filter(post::Column::AuthorId.eq(id)).count(db).await?;
    if owned > 0 {
        return Err(AppError::Conflict(format!("Author still has {} post(s); reassign or delete them first", owned)));
    }
    author::Entity::delete_by_id(id).exec(db).await?;
    tracing::info!(author_id = id, "Author deleted");
    Ok(())
}

pub async fn count_authors<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    Ok(author::Entity::find().count(db).await?)
}
