use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub const ENV_API_BASE: &str = "WP_API_BASE";
pub const ENV_USERNAME: &str = "WP_USERNAME";
pub const ENV_PASSWORD: &str = "WP_APP_PASSWORD";

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub wordpress: WordPressConfig,
    pub publish: PublishConfig,
    pub posts: Vec<PostEntry>,
}

/// Connection settings handed to the REST client at construction.
#[derive(Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WordPressConfig {
    /// REST root, e.g. `https://example.com/wp-json`.
    pub api_base: String,
    pub username: String,
    /// An application password, not the account password.
    pub password: String,
    pub timeout_secs: u64,
}

impl Default for WordPressConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080/wp-json".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for WordPressConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("WordPressConfig")
            .field("api_base", &self.api_base)
            .field("username", &self.username)
            .field("password", &password)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl WordPressConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PublishConfig {
    /// Pause between successive posts so the CMS is not flooded.
    pub delay_ms: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self { delay_ms: 1500 }
    }
}

impl PublishConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// One post to publish. The target is `id` if given, else the post found by
/// `slug`, else the slug in the file's front matter.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PostEntry {
    pub file: PathBuf,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl PostEntry {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            id: None,
            slug: None,
        }
    }
}

impl Config {
    /// The defaults compiled into the binary.
    pub fn compiled_default() -> Self {
        // build.rs rejects a default_config.toml that does not parse
        toml::from_str(DEFAULT_CONFIG).expect("default_config.toml must deserialize")
    }

    /// Load config from a TOML file merged over the compiled defaults.
    ///
    /// A missing file yields the defaults. Relative post paths are resolved
    /// against the directory holding the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::compiled_default());
            }
            Err(e) => return Err(Error::io(path, e)),
        };

        let mut config = Self::from_toml(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for post in &mut config.posts {
            if post.file.is_relative() {
                post.file = base.join(&post.file);
            }
        }

        Ok(config)
    }

    /// Parse TOML text merged over the compiled defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut merged: toml::Table = DEFAULT_CONFIG.parse()?;
        let user: toml::Table = content.parse()?;
        merge_tables(&mut merged, user);

        Ok(toml::Value::Table(merged).try_into()?)
    }

    /// Apply `WP_API_BASE`, `WP_USERNAME` and `WP_APP_PASSWORD` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(&std::env::vars().collect());
    }

    /// Apply overrides from a provided map. Empty values are ignored.
    pub fn apply_env_with(&mut self, env: &HashMap<String, String>) {
        let lookup = |key: &str| env.get(key).filter(|value| !value.is_empty()).cloned();

        if let Some(api_base) = lookup(ENV_API_BASE) {
            self.wordpress.api_base = api_base;
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.wordpress.username = username;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.wordpress.password = password;
        }
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_default_matches_default_impls() {
        let config = Config::compiled_default();
        assert_eq!(config.wordpress, WordPressConfig::default());
        assert_eq!(config.publish, PublishConfig::default());
        assert!(config.posts.is_empty());
    }

    #[test]
    fn user_values_override_defaults() {
        let config = Config::from_toml(
            r#"
            [wordpress]
            api_base = "https://example.com/wp-json"
            username = "editor"

            [[posts]]
            file = "posts/rack.md"
            id = 42

            [[posts]]
            file = "posts/cabling.md"
            slug = "structured-cabling"
            "#,
        )
        .unwrap();

        assert_eq!(config.wordpress.api_base, "https://example.com/wp-json");
        assert_eq!(config.wordpress.username, "editor");
        assert_eq!(config.wordpress.timeout_secs, 30);
        assert_eq!(config.publish.delay_ms, 1500);
        assert_eq!(config.posts.len(), 2);
        assert_eq!(config.posts[0].id, Some(42));
        assert_eq!(config.posts[1].slug.as_deref(), Some("structured-cabling"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml("[wordpress\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[publish]\ndelay_ms = \"soon\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.publish.delay_ms, 1500);
    }

    #[test]
    fn post_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wpblocks.toml");
        fs::write(
            &path,
            "[[posts]]\nfile = \"a.md\"\n\n[[posts]]\nfile = \"/abs/b.md\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.posts[0].file, dir.path().join("a.md"));
        assert_eq!(config.posts[1].file, PathBuf::from("/abs/b.md"));
    }

    #[test]
    fn env_overrides() {
        let mut config = Config::compiled_default();
        let env = HashMap::from([
            (ENV_USERNAME.to_string(), "bot".to_string()),
            (ENV_PASSWORD.to_string(), "abcd efgh".to_string()),
            (ENV_API_BASE.to_string(), String::new()),
        ]);
        config.apply_env_with(&env);

        assert_eq!(config.wordpress.username, "bot");
        assert_eq!(config.wordpress.password, "abcd efgh");
        assert_eq!(config.wordpress.api_base, "http://localhost:8080/wp-json");
    }

    #[test]
    fn debug_hides_password() {
        let wordpress = WordPressConfig {
            password: "secret".to_string(),
            ..WordPressConfig::default()
        };
        let printed = format!("{:?}", wordpress);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("***"));
    }
}
