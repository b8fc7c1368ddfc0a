//! Query functions over the SeaORM entities.
//!
//! Handlers never touch entities directly; they call into these modules, which
//! validate input, run the query and map `DbErr` into [`crate::error::AppError`].

pub mod author_service;
pub mod category_service;
pub mod post_service;
pub mod tag_service;
pub mod user_service;

pub use author_service::*;
pub use category_service::*;
pub use post_service::*;
pub use tag_service::*;
