//! Process settings from the environment.

use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    /// Installation root holding `content/themes` and `content/options`.
    pub root: PathBuf,
    pub theme: String,
    /// Directory of `{controller}.json` grid definitions.
    pub grid_dir: PathBuf,
    /// Token granting administrator access. No token configured means nobody is an administrator.
    pub admin_token: Option<String>,
    pub listen: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: "postgres://localhost/phanbook".into(),
            root: PathBuf::from("."),
            theme: "default".into(),
            grid_dir: PathBuf::from("grids"),
            admin_token: None,
            listen: "0.0.0.0:3000".into(),
        }
    }
}

impl Settings {
    /// Read `DATABASE_URL` and the `PHANBOOK_*` variables; unset ones keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Settings::default();
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        Settings {
            database_url: non_empty("DATABASE_URL").unwrap_or(defaults.database_url),
            root: non_empty("PHANBOOK_ROOT").map(PathBuf::from).unwrap_or(defaults.root),
            theme: non_empty("PHANBOOK_THEME").unwrap_or(defaults.theme),
            grid_dir: non_empty("PHANBOOK_GRID_DIR").map(PathBuf::from).unwrap_or(defaults.grid_dir),
            admin_token: non_empty("PHANBOOK_ADMIN_TOKEN"),
            listen: non_empty("PHANBOOK_LISTEN").unwrap_or(defaults.listen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn unset_and_blank_values_use_defaults() {
        let env = HashMap::from([
            ("PHANBOOK_THEME", "discourse"),
            ("PHANBOOK_ADMIN_TOKEN", "  "),
            ("PHANBOOK_ROOT", "/srv/phanbook"),
        ]);
        let settings = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(settings.theme, "discourse");
        assert_eq!(settings.root, PathBuf::from("/srv/phanbook"));
        assert_eq!(settings.admin_token, None);
        assert_eq!(settings.grid_dir, PathBuf::from("grids"));
        assert_eq!(settings.listen, "0.0.0.0:3000");
    }
}
