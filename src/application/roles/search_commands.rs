use crate::domain::roles::RoleRepository;
use crate::shared::translation::Translator;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SearchCommand {
    pub key: String,
    pub label: String,
}

/// Lists the role search commands in the configured locale.
pub struct SearchCommandsUseCase {
    repo: Arc<dyn RoleRepository>,
    translator: Arc<Translator>,
}

impl SearchCommandsUseCase {
    pub fn new(repo: Arc<dyn RoleRepository>, translator: Arc<Translator>) -> Self {
        Self { repo, translator }
    }

    pub fn execute(&self) -> Vec<SearchCommand> {
        self.repo
            .search_commands()
            .iter()
            .map(|key| SearchCommand {
                key: key.to_string(),
                label: self.translator.trans(key).to_string(),
            })
            .collect()
    }
}
