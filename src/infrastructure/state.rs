use crate::infrastructure::config::RepositoryConfig;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::repositories::roles::PostgresRoleRepository;
use crate::shared::translation::{CatalogError, Translator};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<RepositoryConfig>,
    pub translator: Arc<Translator>,
}

impl AppState {
    pub fn new(pool: DbPool, config: RepositoryConfig) -> Self {
        let translator = Translator::for_locale(&config.search_locale);
        Self {
            pool,
            config: Arc::new(config),
            translator: Arc::new(translator),
        }
    }

    /// Like [`AppState::new`], but also reads the configured catalog
    /// directory.
    pub fn load(pool: DbPool, config: RepositoryConfig) -> Result<Self, CatalogError> {
        let translator = match &config.catalog_dir {
            Some(dir) => Some(Translator::from_dir(dir, &config.search_locale)?),
            None => None,
        };

        let state = Self::new(pool, config);
        Ok(match translator {
            Some(translator) => state.with_translator(translator),
            None => state,
        })
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = Arc::new(translator);
        self
    }

    pub fn role_repository(&self) -> PostgresRoleRepository {
        PostgresRoleRepository::new(
            self.pool.clone(),
            self.config.clone(),
            self.translator.clone(),
        )
    }
}
