//! Post create/edit from the backend post form.

use crate::error::AppError;
use crate::forms::PostsForm;
use crate::models::{Entity, Post};
use crate::service::crud::{CrudService, ENTRY_NOT_FOUND};
use crate::store::EntityStore;
use std::collections::HashMap;

/// URL slug of a title: lowercase ASCII alphanumerics separated by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn field<'a>(data: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    data.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Validate a submitted post form and create or update the post. A non-empty `id`
/// edits that post; `saveDraft` stores it unpublished (status 0).
pub async fn save_post(
    store: &dyn EntityStore,
    data: &HashMap<String, String>,
    author_id: i64,
) -> Result<Post, AppError> {
    let existing = match field(data, "id") {
        Some(raw) => {
            let id: i64 = raw
                .parse()
                .map_err(|_| AppError::BadRequest(format!("invalid post id '{}'", raw)))?;
            Some(
                CrudService::find::<Post>(store, id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(ENTRY_NOT_FOUND.into()))?,
            )
        }
        None => None,
    };

    PostsForm::build(existing.as_ref()).validate(data)?;

    let now = chrono::Utc::now().timestamp();
    let mut post = match existing {
        Some(mut post) => {
            post.set_modified_at(Some(now));
            post
        }
        None => {
            let mut post = Post::default();
            post.set_author_id(author_id).set_created_at(now);
            post
        }
    };

    let title = field(data, "title").unwrap_or_default();
    post.set_title(title)
        .set_slug(slugify(title))
        .set_content(field(data, "content").unwrap_or_default())
        .set_locked(field(data, "locked").unwrap_or("N"));
    if let Some(kind) = field(data, "type") {
        post.set_kind(kind);
    }
    post.set_status(if data.contains_key("saveDraft") { 0 } else { 1 });

    let saved = CrudService::save(store, &post).await?;
    tracing::info!(id = saved.id(), slug = %saved.slug(), "post saved");
    Ok(saved)
}
