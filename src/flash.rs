//! One-shot flash messages carried in a cookie until the next list render.

use crate::cookies;
use axum::http::HeaderMap;
use cookie::time::Duration;
use cookie::Cookie;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";
const FLASH_TTL_MINUTES: i64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(rename = "type")]
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlashBag(Vec<Flash>);

impl FlashBag {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        cookies::read(headers, FLASH_COOKIE)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn push(&mut self, kind: FlashKind, message: impl Into<String>) {
        self.0.push(Flash {
            kind,
            message: message.into(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(FlashKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(FlashKind::Error, message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[Flash] {
        &self.0
    }

    pub fn to_cookie(&self) -> Cookie<'static> {
        let value = serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string());
        cookies::persistent(FLASH_COOKIE, value, Duration::minutes(FLASH_TTL_MINUTES))
    }

    pub fn removal_cookie() -> Cookie<'static> {
        cookies::removal(FLASH_COOKIE)
    }
}
