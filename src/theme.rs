//! Theme paths and the site options file.
//!
//! Options are saved by read-merge-write without locking; concurrent saves race and
//! the last write wins.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const TEMPLATE_EXTENSION: &str = "volt";

#[derive(Clone, Debug)]
pub struct Theme {
    root: PathBuf,
    code: String,
}

impl Theme {
    pub fn new(root: impl Into<PathBuf>, code: impl Into<String>) -> Self {
        Theme {
            root: root.into(),
            code: code.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Public URL of a theme asset.
    pub fn asset_content(&self, item: &str) -> String {
        format!("/content/themes/{}/{}", self.code, item.trim_start_matches('/'))
    }

    pub fn template_dir(&self) -> PathBuf {
        self.root.join("content").join("themes").join(&self.code)
    }

    pub fn page_file(&self, name: &str) -> PathBuf {
        self.template_dir()
            .join("pages")
            .join(format!("{}.{}", name, TEMPLATE_EXTENSION))
    }

    pub fn options_file(&self) -> PathBuf {
        self.root.join("content").join("options").join("options.json")
    }

    /// Current options; an absent file is an empty set.
    pub async fn options(&self) -> Result<Map<String, Value>, AppError> {
        let path = self.options_file();
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => parse_options(&path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(write_failed(&path, e)),
        }
    }

    /// Merge `pairs` into the options file, creating it (and its directories) when
    /// absent. New keys override existing ones.
    pub async fn save_config(&self, pairs: Map<String, Value>) -> Result<(), AppError> {
        let path = self.options_file();
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(|e| write_failed(dir, e))?;
        }
        if !tokio::fs::try_exists(&path).await.map_err(|e| write_failed(&path, e))? {
            tokio::fs::write(&path, "{}").await.map_err(|e| write_failed(&path, e))?;
        }
        let text = tokio::fs::read_to_string(&path).await.map_err(|e| write_failed(&path, e))?;
        let mut options = parse_options(&path, &text)?;
        let keys: Vec<String> = pairs.keys().cloned().collect();
        options.extend(pairs);
        let out = serde_json::to_string_pretty(&Value::Object(options))
            .map_err(|e| AppError::ConfigWriteFailed(e.to_string()))?;
        tokio::fs::write(&path, out).await.map_err(|e| write_failed(&path, e))?;
        tracing::info!(path = %path.display(), keys = ?keys, "options saved");
        Ok(())
    }
}

fn write_failed(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::ConfigWriteFailed(format!("{}: {}", path.display(), e))
}

fn parse_options(path: &Path, text: &str) -> Result<Map<String, Value>, AppError> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(write_failed(path, "options file is not a JSON object")),
        Err(e) => Err(write_failed(path, e)),
    }
}

/// Theme metadata from `content/themes/{code}/info.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemeInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
}

impl ThemeInfo {
    fn defaults(code: &str) -> Self {
        ThemeInfo {
            name: code.to_string(),
            code: code.to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
        }
    }

    /// A missing `info.json` yields defaults named after `code`.
    pub async fn load(theme: &Theme) -> Result<Self, AppError> {
        let path = theme.template_dir().join("info.json");
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults(theme.code())),
            Err(e) => return Err(AppError::BadRequest(format!("{}: {}", path.display(), e))),
        };
        let mut info: ThemeInfo = serde_json::from_str(&text)
            .map_err(|e| AppError::BadRequest(format!("{}: {}", path.display(), e)))?;
        if info.code.is_empty() {
            info.code = theme.code().to_string();
        }
        if info.name.is_empty() {
            info.name = info.code.clone();
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn paths_follow_theme_code() {
        let theme = Theme::new("/srv/phanbook", "discourse");
        assert_eq!(theme.asset_content("css/app.css"), "/content/themes/discourse/css/app.css");
        assert_eq!(theme.template_dir(), PathBuf::from("/srv/phanbook/content/themes/discourse"));
        assert_eq!(
            theme.page_file("about"),
            PathBuf::from("/srv/phanbook/content/themes/discourse/pages/about.volt")
        );
    }

    #[tokio::test]
    async fn save_config_creates_and_merges() {
        let dir = tempfile::tempdir().unwrap();
        let theme = Theme::new(dir.path(), "default");
        assert!(theme.options().await.unwrap().is_empty());

        theme.save_config(object(json!({"title": "Phanbook", "foo": "bar"}))).await.unwrap();
        theme.save_config(object(json!({"foo": "baz"}))).await.unwrap();

        let options = theme.options().await.unwrap();
        assert_eq!(options.get("foo"), Some(&json!("baz")));
        assert_eq!(options.get("title"), Some(&json!("Phanbook")));
    }

    #[tokio::test]
    async fn same_key_saved_twice_keeps_second_value() {
        let dir = tempfile::tempdir().unwrap();
        let theme = Theme::new(dir.path(), "default");
        theme.save_config(object(json!({"foo": "bar"}))).await.unwrap();
        theme.save_config(object(json!({"foo": "bar"}))).await.unwrap();
        assert_eq!(theme.options().await.unwrap(), object(json!({"foo": "bar"})));

        theme.save_config(object(json!({"foo": "baz"}))).await.unwrap();
        assert_eq!(theme.options().await.unwrap(), object(json!({"foo": "baz"})));
    }

    #[tokio::test]
    async fn unwritable_options_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        // a file where the content directory should be
        std::fs::write(dir.path().join("content"), "x").unwrap();
        let theme = Theme::new(dir.path(), "default");
        let err = theme.save_config(object(json!({"a": 1}))).await.unwrap_err();
        assert_eq!(err.code(), "config_write_failed");
    }

    #[tokio::test]
    async fn theme_info_defaults_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let theme = Theme::new(dir.path(), "default");
        let info = ThemeInfo::load(&theme).await.unwrap();
        assert_eq!(info.code, "default");
        assert_eq!(info.name, "default");

        std::fs::create_dir_all(theme.template_dir()).unwrap();
        std::fs::write(
            theme.template_dir().join("info.json"),
            r#"{"name": "Default Theme", "version": "2.1.0"}"#,
        )
        .unwrap();
        let info = ThemeInfo::load(&theme).await.unwrap();
        assert_eq!(info.name, "Default Theme");
        assert_eq!(info.code, "default");
        assert_eq!(info.version, "2.1.0");
    }
}
