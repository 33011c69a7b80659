//! Forum post. Static pages are posts with `type = 'pages'`.

use super::{flip, Column, Entity, EntityMeta};
use serde::{Deserialize, Serialize};

pub const POST_TYPE_PAGES: &str = "pages";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    id: i64,
    #[serde(rename = "users_id")]
    author_id: i64,
    #[serde(rename = "type")]
    kind: String,
    title: String,
    slug: String,
    content: String,
    number_views: i64,
    number_replies: i64,
    /// 'Y' or 'N'.
    sticked: String,
    /// 'Y' or 'N'.
    locked: String,
    status: i32,
    deleted: i32,
    created_at: i64,
    modified_at: Option<i64>,
}

impl Default for Post {
    fn default() -> Self {
        Post {
            id: 0,
            author_id: 0,
            kind: "questions".into(),
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            number_views: 0,
            number_replies: 0,
            sticked: "N".into(),
            locked: "N".into(),
            status: 1,
            deleted: 0,
            created_at: 0,
            modified_at: None,
        }
    }
}

impl Post {
    pub fn set_id(&mut self, id: i64) -> &mut Self {
        self.id = id;
        self
    }

    pub fn set_author_id(&mut self, author_id: i64) -> &mut Self {
        self.author_id = author_id;
        self
    }

    pub fn set_kind(&mut self, kind: impl Into<String>) -> &mut Self {
        self.kind = kind.into();
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) -> &mut Self {
        self.slug = slug.into();
        self
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> &mut Self {
        self.content = content.into();
        self
    }

    pub fn set_locked(&mut self, locked: impl Into<String>) -> &mut Self {
        self.locked = locked.into();
        self
    }

    pub fn set_status(&mut self, status: i32) -> &mut Self {
        self.status = status;
        self
    }

    pub fn set_created_at(&mut self, created_at: i64) -> &mut Self {
        self.created_at = created_at;
        self
    }

    pub fn set_modified_at(&mut self, modified_at: Option<i64>) -> &mut Self {
        self.modified_at = modified_at;
        self
    }

    pub fn author_id(&self) -> i64 {
        self.author_id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn number_views(&self) -> i64 {
        self.number_views
    }

    pub fn number_replies(&self) -> i64 {
        self.number_replies
    }

    pub fn sticked(&self) -> &str {
        &self.sticked
    }

    pub fn locked(&self) -> &str {
        &self.locked
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn deleted(&self) -> i32 {
        self.deleted
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<i64> {
        self.modified_at
    }

    pub fn is_page(&self) -> bool {
        self.kind == POST_TYPE_PAGES
    }
}

impl Entity for Post {
    const META: EntityMeta = EntityMeta {
        source: "posts",
        primary_key: "id",
        column_map: &[
            Column::new("id", "id", "BIGSERIAL PRIMARY KEY"),
            Column::new("author_id", "users_id", "BIGINT NOT NULL DEFAULT 0"),
            Column::new("kind", "type", "TEXT NOT NULL DEFAULT 'questions'"),
            Column::new("title", "title", "TEXT NOT NULL DEFAULT ''"),
            Column::new("slug", "slug", "TEXT NOT NULL DEFAULT ''"),
            Column::new("content", "content", "TEXT NOT NULL DEFAULT ''"),
            Column::new("number_views", "number_views", "BIGINT NOT NULL DEFAULT 0"),
            Column::new("number_replies", "number_replies", "BIGINT NOT NULL DEFAULT 0"),
            Column::new("sticked", "sticked", "CHAR(1) NOT NULL DEFAULT 'N'"),
            Column::new("locked", "locked", "CHAR(1) NOT NULL DEFAULT 'N'"),
            Column::new("status", "status", "INTEGER NOT NULL DEFAULT 1"),
            Column::new("deleted", "deleted", "INTEGER NOT NULL DEFAULT 0"),
            Column::new("created_at", "created_at", "BIGINT NOT NULL DEFAULT 0"),
            Column::new("modified_at", "modified_at", "BIGINT"),
        ],
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn toggle(&mut self, field: &str) -> bool {
        match field {
            "status" => flip(&mut self.status),
            "deleted" => flip(&mut self.deleted),
            _ => return false,
        }
        true
    }

    fn validation_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if self.title.trim().is_empty() {
            messages.push("The title is required.".to_string());
        }
        if self.locked != "Y" && self.locked != "N" {
            messages.push("Locked must be Y or N.".to_string());
        }
        messages
    }
}
