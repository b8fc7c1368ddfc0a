use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::db::entities::{author, category, post, post_tag, tag};
use crate::error::{validation, AppError, AppResult, OptionExt};
use crate::types::{ContentCounts, PostInput, PostView};

/// Largest offset SQLite can bind; it takes limit and offset as signed 64-bit.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Which posts a listing should return.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostQuery {
    pub published_only: bool,
    pub category_id: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

struct CleanPost {
    title: String,
    slug: String,
    excerpt: Option<String>,
    content: String,
    published: bool,
    author_id: i32,
    category_id: Option<i32>,
    tag_ids: Vec<i32>,
}

async fn clean<C: ConnectionTrait>(db: &C, input: &PostInput) -> AppResult<CleanPost> {
    let title = validation::required_text(&input.title, "title", 200)?;
    let slug = validation::slug_or_derive(input.slug.as_deref(), &title, "slug")?;
    let excerpt = validation::optional_text(input.excerpt.as_deref(), "excerpt", 1000)?;
    if input.content.trim().is_empty() {
        return Err(AppError::ValidationError {
            field: "content".to_string(),
            message: "content is required".to_string(),
        });
    }

    validation::validate_positive_id(input.author_id, "author_id")?;
    if author::Entity::find_by_id(input.author_id).one(db).await?.is_none() {
        return Err(AppError::ValidationError {
            field: "author_id".to_string(),
            message: format!("Author {} does not exist", input.author_id),
        });
    }
    if let Some(category_id) = input.category_id {
        if category::Entity::find_by_id(category_id).one(db).await?.is_none() {
            return Err(AppError::ValidationError {
                field: "category_id".to_string(),
                message: format!("Category {} does not exist", category_id),
            });
        }
    }

    let tag_ids: Vec<i32> = input.tag_ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    if !tag_ids.is_empty() {
        let found = tag::Entity::find().filter(tag::Column::Id.is_in(tag_ids.clone())).count(db).await?;
        if found != tag_ids.len() as u64 {
            return Err(AppError::ValidationError {
                field: "tag_ids".to_string(),
                message: "One or more tags do not exist".to_string(),
            });
        }
    }

    Ok(CleanPost {
        title,
        slug,
        excerpt,
        content: input.content.clone(),
        published: input.published,
        author_id: input.author_id,
        category_id: input.category_id,
        tag_ids,
    })
}

async fn replace_post_tags<C: ConnectionTrait>(db: &C, post_id: i32, tag_ids: &[i32]) -> AppResult<()> {
    post_tag::Entity::delete_many().filter(post_tag::Column::PostId.eq(post_id)).exec(db).await?;
    if tag_ids.is_empty() {
        return Ok(());
    }
    let rows = tag_ids.iter().map(|tag_id| post_tag::ActiveModel { post_id: Set(post_id), tag_id: Set(*tag_id) });
    post_tag::Entity::insert_many(rows).exec_without_returning(db).await?;
    Ok(())
}

/// Attaches author, category and tags to each post, keeping the input order.
async fn hydrate<C: ConnectionTrait>(
    db: &C,
    rows: Vec<(post::Model, Option<author::Model>)>,
) -> AppResult<Vec<PostView>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let post_ids: Vec<i32> = rows.iter().map(|(p, _)| p.id).collect();
    let category_ids: BTreeSet<i32> = rows.iter().filter_map(|(p, _)| p.category_id).collect();

    let categories: HashMap<i32, category::Model> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };

    let mut tags_by_post: HashMap<i32, Vec<tag::Model>> = HashMap::new();
    let links = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.is_in(post_ids))
        .find_also_related(tag::Entity)
        .all(db)
        .await?;
    for (link, tag) in links {
        if let Some(tag) = tag {
            tags_by_post.entry(link.post_id).or_default().push(tag);
        }
    }

    Ok(rows
        .into_iter()
        .map(|(post, author)| {
            let category = post.category_id.and_then(|id| categories.get(&id).cloned());
            let mut tags = tags_by_post.remove(&post.id).unwrap_or_default();
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            PostView { post, author, category, tags }
        })
        .collect())
}

pub async fn list_posts<C: ConnectionTrait>(db: &C, query: PostQuery) -> AppResult<Vec<PostView>> {
    let mut select = post::Entity::find().find_also_related(author::Entity);
    if query.published_only {
        select = select
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::PublishedAt);
    } else {
        select = select.order_by_desc(post::Column::CreatedAt);
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }
    select = select.order_by_desc(post::Column::Id);
    if let Some(limit) = query.limit {
        select = select.limit(limit);
    }
    if let Some(offset) = query.offset {
        select = select.offset(offset);
    }
    let rows = select.all(db).await?;
    hydrate(db, rows).await
}

pub async fn get_post<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<PostView> {
    let row = post::Entity::find_by_id(id)
        .find_also_related(author::Entity)
        .one(db)
        .await?
        .ok_or_not_found("Post")?;
    hydrate(db, vec![row]).await?.pop().ok_or_not_found("Post")
}

/// Only published posts are visible by slug.
pub async fn get_published_post_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> AppResult<PostView> {
    let row = post::Entity::find()
        .filter(post::Column::Slug.eq(slug))
        .filter(post::Column::Published.eq(true))
        .find_also_related(author::Entity)
        .one(db)
        .await?
        .ok_or_not_found("Post")?;
    hydrate(db, vec![row]).await?.pop().ok_or_not_found("Post")
}

pub async fn create_post(db: &DatabaseConnection, input: &PostInput) -> AppResult<PostView> {
    let txn = db.begin().await?;
    let p = clean(&txn, input).await?;
    let model = post::ActiveModel {
        title: Set(p.title),
        slug: Set(p.slug),
        excerpt: Set(p.excerpt),
        content: Set(p.content),
        published: Set(p.published),
        published_at: Set(p.published.then(Utc::now)),
        author_id: Set(p.author_id),
        category_id: Set(p.category_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    replace_post_tags(&txn, model.id, &p.tag_ids).await?;
    txn.commit().await?;
    tracing::info!(post_id = model.id, slug = %model.slug, published = model.published, "Post created");
    get_post(db, model.id).await
}

pub async fn update_post(db: &DatabaseConnection, id: i32, input: &PostInput) -> AppResult<PostView> {
    let txn = db.begin().await?;
    let existing = post::Entity::find_by_id(id).one(&txn).await?.ok_or_not_found("Post")?;
    let p = clean(&txn, input).await?;
    let published_at = match (p.published, existing.published_at) {
        (false, _) => None,
        (true, Some(first)) => Some(first),
        (true, None) => Some(Utc::now()),
    };
    let mut active = existing.into_active_model();
    active.title = Set(p.title);
    active.slug = Set(p.slug);
    active.excerpt = Set(p.excerpt);
    active.content = Set(p.content);
    active.published = Set(p.published);
    active.published_at = Set(published_at);
    active.author_id = Set(p.author_id);
    active.category_id = Set(p.category_id);
    active.update(&txn).await?;
    replace_post_tags(&txn, id, &p.tag_ids).await?;
    txn.commit().await?;
    get_post(db, id).await
}

pub async fn delete_post<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    let res = post::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Post not found".to_string()));
    }
    tracing::info!(post_id = id, "Post deleted");
    Ok(())
}

pub async fn count_posts<C: ConnectionTrait>(db: &C, published_only: bool) -> AppResult<u64> {
    let mut select = post::Entity::find();
    if published_only {
        select = select.filter(post::Column::Published.eq(true));
    }
    Ok(select.count(db).await?)
}

/// Numbers shown on the admin dashboard.
pub async fn content_counts<C: ConnectionTrait>(db: &C) -> AppResult<ContentCounts> {
    Ok(ContentCounts {
        posts: count_posts(db, false).await?,
        published_posts: count_posts(db, true).await?,
        authors: super::count_authors(db).await?,
        categories: super::count_categories(db).await?,
        tags: super::count_tags(db).await?,
    })
}

/// Number of posts a [`PostQuery`] would match, ignoring limit and offset.
pub async fn count_matching<C: ConnectionTrait>(db: &C, query: PostQuery) -> AppResult<u64> {
    let mut select = post::Entity::find();
    if query.published_only {
        select = select.filter(post::Column::Published.eq(true));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }
    Ok(select.count(db).await?)
}
