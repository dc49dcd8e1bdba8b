use crate::domain::roles::{RoleListQuery, RoleRepository, RoleSummary};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

fn default_limit() -> i64 {
    RoleListQuery::default().limit
}

#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LookupRolesRequest {
    /// Name prefix; empty matches every role
    #[serde(default)]
    #[param(example = "Adm")]
    pub search: String,
    /// Maximum number of roles, 0 returns every match
    #[serde(default = "default_limit")]
    #[validate(range(min = 0))]
    #[param(example = 10, minimum = 0)]
    pub limit: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    #[param(example = 0, minimum = 0)]
    pub start: i64,
}

impl Default for LookupRolesRequest {
    fn default() -> Self {
        let query = RoleListQuery::default();
        Self {
            search: query.search,
            limit: query.limit,
            start: query.start,
        }
    }
}

/// Name-prefix lookup used by role pickers.
pub struct LookupRolesUseCase {
    repo: Arc<dyn RoleRepository>,
}

impl LookupRolesUseCase {
    pub fn new(repo: Arc<dyn RoleRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, req: LookupRolesRequest) -> Result<Vec<RoleSummary>, AppError> {
        Ok(self
            .repo
            .get_role_list(req.search.trim(), req.limit, req.start)
            .await?)
    }
}
