use super::{flip, Column, Entity, EntityMeta};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: i64,
    username: String,
    email: String,
    firstname: String,
    lastname: String,
    /// 'Y' for administrators.
    admin: String,
    status: i32,
    created_at: i64,
}

impl Default for User {
    fn default() -> Self {
        User {
            id: 0,
            username: String::new(),
            email: String::new(),
            firstname: String::new(),
            lastname: String::new(),
            admin: "N".into(),
            status: 1,
            created_at: 0,
        }
    }
}

impl User {
    pub fn set_id(&mut self, id: i64) -> &mut Self {
        self.id = id;
        self
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> &mut Self {
        self.username = username.into();
        self
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.email = email.into();
        self
    }

    pub fn set_status(&mut self, status: i32) -> &mut Self {
        self.status = status;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname).trim().to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.admin == "Y"
    }

    pub fn status(&self) -> i32 {
        self.status
    }
}

impl Entity for User {
    const META: EntityMeta = EntityMeta {
        source: "users",
        primary_key: "id",
        column_map: &[
            Column::new("id", "id", "BIGSERIAL PRIMARY KEY"),
            Column::new("username", "username", "TEXT NOT NULL DEFAULT ''"),
            Column::new("email", "email", "TEXT NOT NULL DEFAULT ''"),
            Column::new("firstname", "firstname", "TEXT NOT NULL DEFAULT ''"),
            Column::new("lastname", "lastname", "TEXT NOT NULL DEFAULT ''"),
            Column::new("admin", "admin", "CHAR(1) NOT NULL DEFAULT 'N'"),
            Column::new("status", "status", "INTEGER NOT NULL DEFAULT 1"),
            Column::new("created_at", "created_at", "BIGINT NOT NULL DEFAULT 0"),
        ],
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn toggle(&mut self, field: &str) -> bool {
        if field != "status" {
            return false;
        }
        flip(&mut self.status);
        true
    }

    fn validation_messages(&self) -> Vec<String> {
        if self.username.trim().is_empty() {
            vec!["The username is required.".to_string()]
        } else {
            Vec::new()
        }
    }
}
