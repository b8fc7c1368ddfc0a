use std::collections::BTreeSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::entities::tag;
use crate::error::{validation, AppError, AppResult, OptionExt};
use crate::types::TagInput;

const TAG_NAME_MAX: usize = 64;

/// All tags ordered by name ascending.
pub async fn list_tags<C: ConnectionTrait>(db: &C) -> AppResult<Vec<tag::Model>> {
    let tags = tag::Entity::find().order_by_asc(tag::Column::Name).all(db).await?;
    Ok(tags)
}

pub async fn get_tag<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<tag::Model> {
    tag::Entity::find_by_id(id).one(db).await?.ok_or_not_found("Tag")
}

pub async fn create_tag<C: ConnectionTrait>(db: &C, input: &TagInput) -> AppResult<tag::Model> {
    let name = validation::required_text(&input.name, "name", TAG_NAME_MAX)?;
    let model = tag::ActiveModel { name: Set(name), ..Default::default() }.insert(db).await?;
    tracing::info!(tag_id = model.id, name = %model.name, "Tag created");
    Ok(model)
}

pub async fn update_tag<C: ConnectionTrait>(db: &C, id: i32, input: &TagInput) -> AppResult<tag::Model> {
    let name = validation::required_text(&input.name, "name", TAG_NAME_MAX)?;
    let mut active = get_tag(db, id).await?.into_active_model();
    active.name = Set(name);
    Ok(active.update(db).await?)
}

/// Deletes the tag; its post associations go with it.
pub async fn delete_tag<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    let res = tag::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Tag not found".to_string()));
    }
    tracing::info!(tag_id = id, "Tag deleted");
    Ok(())
}

pub async fn count_tags<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    Ok(tag::Entity::find().count(db).await?)
}

/// Resolves tag names to rows, creating the ones that do not exist yet.
/// Duplicate and blank names are ignored.
pub async fn ensure_tags_by_name<C: ConnectionTrait>(db: &C, names: &[String]) -> AppResult<Vec<tag::Model>> {
    let mut wanted = BTreeSet::new();
    for name in names {
        let name = name.trim();
        if !name.is_empty() {
            wanted.insert(validation::required_text(name, "tags", TAG_NAME_MAX)?);
        }
    }
    let mut tags = Vec::with_capacity(wanted.len());
    for name in wanted {
        let existing = tag::Entity::find().filter(tag::Column::Name.eq(name.as_str())).one(db).await?;
        let model = match existing {
            Some(t) => t,
            None => tag::ActiveModel { name: Set(name), ..Default::default() }.insert(db).await?,
        };
        tags.push(model);
    }
    Ok(tags)
}
