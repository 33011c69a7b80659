//! Uploaded media file.

use super::{Column, Entity, EntityMeta};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    id: i64,
    username: String,
    /// Media category (image, document, ...) as stored by the uploader.
    #[serde(rename = "type")]
    kind: i32,
    /// Unix timestamp of the upload.
    created_at: i64,
    filename: String,
}

impl Media {
    pub fn set_id(&mut self, id: i64) -> &mut Self {
        self.id = id;
        self
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> &mut Self {
        self.username = username.into();
        self
    }

    pub fn set_kind(&mut self, kind: i32) -> &mut Self {
        self.kind = kind;
        self
    }

    pub fn set_created_at(&mut self, created_at: i64) -> &mut Self {
        self.created_at = created_at;
        self
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) -> &mut Self {
        self.filename = filename.into();
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn kind(&self) -> i32 {
        self.kind
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl Entity for Media {
    const META: EntityMeta = EntityMeta {
        source: "media",
        primary_key: "id",
        column_map: &[
            Column::new("id", "id", "BIGSERIAL PRIMARY KEY"),
            Column::new("username", "username", "TEXT NOT NULL DEFAULT ''"),
            Column::new("kind", "type", "INTEGER NOT NULL DEFAULT 0"),
            Column::new("created_at", "created_at", "BIGINT NOT NULL DEFAULT 0"),
            Column::new("filename", "filename", "TEXT NOT NULL DEFAULT ''"),
        ],
    };

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assert_column_map_matches_serde;

    #[test]
    fn column_map_covers_every_field() {
        assert_column_map_matches_serde::<Media>();
        assert_eq!(Media::META.storage_name("kind"), Some("type"));
    }

    #[test]
    fn media_has_no_toggleable_fields() {
        let mut media = Media::default();
        media.set_id(4).set_filename("a.png");
        assert!(!media.toggle("status"));
        assert_eq!(media.filename(), "a.png");
        assert_eq!(media.id(), 4);
    }
}
