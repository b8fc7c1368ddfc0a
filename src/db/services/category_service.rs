use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::entities::category;
use crate::error::{validation, AppError, AppResult, OptionExt};
use crate::types::CategoryInput;

fn clean(input: &CategoryInput) -> AppResult<(String, String, Option<String>)> {
    let name = validation::required_text(&input.name, "name", 80)?;
    let slug = validation::slug_or_derive(input.slug.as_deref(), &name, "slug")?;
    let description = validation::optional_text(input.description.as_deref(), "description", 1000)?;
    Ok((name, slug, description))
}

pub async fn list_categories<C: ConnectionTrait>(db: &C) -> AppResult<Vec<category::Model>> {
    let categories = category::Entity::find().order_by_asc(category::Column::Name).all(db).await?;
    Ok(categories)
}

pub async fn get_category<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<category::Model> {
    category::Entity::find_by_id(id).one(db).await?.ok_or_not_found("Category")
}

pub async fn find_category_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> AppResult<Option<category::Model>> {
    Ok(category::Entity::find().filter(category::Column::Slug.eq(slug)).one(db).await?)
}

pub async fn create_category<C: ConnectionTrait>(db: &C, input: &CategoryInput) -> AppResult<category::Model> {
    let (name, slug, description) = clean(input)?;
    let model = category::ActiveModel {
        name: Set(name),
        slug: Set(slug),
        description: Set(description),
        ..Default::default()
    }
    .insert(db)
    .await?;
    tracing::info!(category_id = model.id, slug = %model.slug, "Category created");
    Ok(model)
}

pub async fn update_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: &CategoryInput,
) -> AppResult<category::Model> {
    let (name, slug, description) = clean(input)?;
    let mut active = get_category(db, id).await?.into_active_model();
    active.name = Set(name);
    active.slug = Set(slug);
    active.description = Set(description);
    Ok(active.update(db).await?)
}

/// Posts in the category keep existing with `category_id = NULL`.
pub async fn delete_category<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    let res = category::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Category not found".to_string()));
    }
    tracing::info!(category_id = id, "Category deleted");
    Ok(())
}

pub async fn count_categories<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    Ok(category::Entity::find().count(db).await?)
}
