//! Lookups used by theme templates.

use crate::error::AppError;
use crate::models::{Post, User, POST_TYPE_PAGES};
use crate::service::crud::CrudService;
use crate::sql::BindValue;
use crate::store::EntityStore;

pub struct SiteService;

impl SiteService {
    /// Static page (a post of type `pages`) with the exact title.
    pub async fn page_by_title(store: &dyn EntityStore, title: &str) -> Result<Option<Post>, AppError> {
        CrudService::find_first_by(store, &[("type", BindValue::from(POST_TYPE_PAGES)), ("title", title.into())]).await
    }

    pub async fn post_by_slug(store: &dyn EntityStore, slug: &str) -> Result<Option<Post>, AppError> {
        CrudService::find_first_by(store, &[("slug", slug.into())]).await
    }

    pub async fn user_by_id(store: &dyn EntityStore, id: i64) -> Result<Option<User>, AppError> {
        CrudService::find(store, id).await
    }
}
