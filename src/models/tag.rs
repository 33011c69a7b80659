use super::{Column, Entity, EntityMeta};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    id: i64,
    name: String,
    slug: String,
    number_posts: i64,
    description: Option<String>,
    created_at: i64,
}

impl Tag {
    pub fn set_id(&mut self, id: i64) -> &mut Self {
        self.id = id;
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) -> &mut Self {
        self.slug = slug.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn number_posts(&self) -> i64 {
        self.number_posts
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Entity for Tag {
    const META: EntityMeta = EntityMeta {
        source: "tags",
        primary_key: "id",
        column_map: &[
            Column::new("id", "id", "BIGSERIAL PRIMARY KEY"),
            Column::new("name", "name", "TEXT NOT NULL DEFAULT ''"),
            Column::new("slug", "slug", "TEXT NOT NULL DEFAULT ''"),
            Column::new("number_posts", "number_posts", "BIGINT NOT NULL DEFAULT 0"),
            Column::new("description", "description", "TEXT"),
            Column::new("created_at", "created_at", "BIGINT NOT NULL DEFAULT 0"),
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
        assert_column_map_matches_serde::<Tag>();
    }
}
