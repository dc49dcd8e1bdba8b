use std::env;
use std::path::PathBuf;
use std::str::FromStr;

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Connection pool settings read from `DB_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 5,
            acquire_timeout_secs: 3,
            idle_timeout_secs: 600,
        }
    }

    /// Reads pool tuning from the environment, keeping defaults for unset or
    /// unparsable values.
    pub fn from_env(url: impl Into<String>) -> Self {
        let defaults = Self::new(url);
        Self {
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections),
            acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout_secs),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs),
            ..defaults
        }
    }
}

/// Settings handed to repositories at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub table_prefix: String,
    pub search_locale: String,
    /// Directory of `<locale>.json` label catalogs layered over the bundled ones.
    pub catalog_dir: Option<PathBuf>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            table_prefix: String::new(),
            search_locale: "en".to_string(),
            catalog_dir: None,
        }
    }
}

impl RepositoryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            table_prefix: env::var("DB_TABLE_PREFIX").unwrap_or(defaults.table_prefix),
            search_locale: env::var("SEARCH_LOCALE").unwrap_or(defaults.search_locale),
            catalog_dir: env::var("SEARCH_CATALOG_DIR")
                .ok()
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn with_search_locale(mut self, locale: impl Into<String>) -> Self {
        self.search_locale = locale.into();
        self
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Physical name of `table` including the configured prefix.
    pub fn table(&self, table: &str) -> String {
        format!("{}{}", self.table_prefix, table)
    }
}
