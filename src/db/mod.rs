//! Database bootstrap: SQLite pool, schema, ORM connection and admin seeding.
//!
//! Tables are created with plain SQL through the `sqlx` pool; everything after
//! startup goes through the SeaORM entities in [`entities`].

pub mod entities;
pub mod enums;
pub mod services;

use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use tracing::info;

use crate::config::{AppConfig, AuthConfig};

/// Opens (creating when needed) the SQLite database behind `url`.
///
/// Every pooled connection gets foreign keys enabled; SQLite keeps that pragma
/// per connection, so setting it once in `init_db` is not enough.
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");
    if !in_memory && !Sqlite::database_exists(url).await.unwrap_or(false) {
        info!("Creating SQLite database at {}", url);
        Sqlite::create_database(url).await?;
    }
    let pool = SqlitePoolOptions::new()
        // an in-memory database lives and dies with its single connection
        .max_connections(if in_memory { 1 } else { max_connections })
        .min_connections(if in_memory { 1 } else { 0 })
        .idle_timeout(if in_memory { None } else { Some(std::time::Duration::from_secs(600)) })
        .max_lifetime(if in_memory { None } else { Some(std::time::Duration::from_secs(1800)) })
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys=ON;").execute(&mut *conn).await?;
                let _ = sqlx::query("PRAGMA busy_timeout=10000;").execute(&mut *conn).await;
                Ok(())
            })
        })
        .connect(url)
        .await?;
    Ok(pool)
}

/// Wraps the pool in a SeaORM connection. The pool is shared, not copied.
pub fn orm(pool: SqlitePool) -> DatabaseConnection {
    SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)
}

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    // Pragmas for better durability/performance
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        tracing::warn!("Failed to set synchronous mode: {}", e);
    }
    // Foreign keys are critical - fail if this doesn't work
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'USER' CHECK (role IN ('ADMIN', 'USER')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NULL UNIQUE,
            bio TEXT NULL,
            avatar_url TEXT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE,
            description TEXT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            excerpt TEXT NULL,
            content TEXT NOT NULL,
            published INTEGER NOT NULL DEFAULT 0,
            published_at TEXT NULL,
            author_id INTEGER NOT NULL,
            category_id INTEGER NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(author_id) REFERENCES authors(id) ON DELETE RESTRICT ON UPDATE CASCADE,
            FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL ON UPDATE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS post_tags (
            post_id INTEGER NOT NULL,
            tag_id INTEGER NOT NULL,
            PRIMARY KEY (post_id, tag_id),
            FOREIGN KEY(post_id) REFERENCES posts(id) ON DELETE CASCADE ON UPDATE CASCADE,
            FOREIGN KEY(tag_id) REFERENCES tags(id) ON DELETE CASCADE ON UPDATE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        ("idx_posts_published", "CREATE INDEX IF NOT EXISTS idx_posts_published ON posts(published, published_at DESC)"),
        ("idx_posts_author", "CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id)"),
        ("idx_posts_category", "CREATE INDEX IF NOT EXISTS idx_posts_category ON posts(category_id)"),
        ("idx_post_tags_tag", "CREATE INDEX IF NOT EXISTS idx_post_tags_tag ON post_tags(tag_id)"),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }

    Ok(())
}

/// Creates the configured admin account when no user exists yet.
///
/// Returns `true` when a user was created.
pub async fn seed_admin(db: &DatabaseConnection, auth: &AuthConfig) -> anyhow::Result<bool> {
    let (Some(email), Some(password)) = (auth.admin_email.as_deref(), auth.admin_password.as_deref()) else {
        return Ok(false);
    };
    if services::user_service::count_users(db).await? > 0 {
        return Ok(false);
    }
    let user = services::user_service::create_user(
        db,
        email,
        &auth.admin_name,
        password,
        enums::Role::Admin,
        auth.bcrypt_cost,
    )
    .await
    .map_err(|e| anyhow::anyhow!("failed to seed admin user: {}", e))?;
    info!(user_id = user.id, email = %user.email, "Seeded initial admin user");
    Ok(true)
}

/// Full startup sequence used by `main`: pool, schema, ORM handle, seed.
pub async fn setup(cfg: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    crate::config::ensure_sqlite_parent_dir(&cfg.database.url)?;
    let pool = connect(&cfg.database.url, cfg.database.max_connections).await?;
    init_db(&pool).await?;
    let db = orm(pool);
    seed_admin(&db, &cfg.auth).await?;
    Ok(db)
}
