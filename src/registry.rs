//! Route name → entity kind. Replaces building a model class name from the
//! controller name at request time.

use crate::models::{Entity, EntityMeta, Media, Post, Tag, User};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Posts,
    Media,
    Users,
    Tags,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [EntityKind::Posts, EntityKind::Media, EntityKind::Users, EntityKind::Tags];

    /// Entity rendered by a backend controller. The `pages` controller manages posts.
    pub fn from_route(controller: &str) -> Option<Self> {
        match controller {
            "pages" => Some(EntityKind::Posts),
            other => Self::from_model_name(other),
        }
    }

    /// Entity for an explicit model name (`Posts`, `posts`, ...).
    pub fn from_model_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.meta().source.eq_ignore_ascii_case(name))
    }

    pub fn meta(self) -> &'static EntityMeta {
        match self {
            EntityKind::Posts => &Post::META,
            EntityKind::Media => &Media::META,
            EntityKind::Users => &User::META,
            EntityKind::Tags => &Tag::META,
        }
    }

    pub fn name(self) -> &'static str {
        self.meta().source
    }
}
