use crate::domain::roles::RoleRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserCountsRequest {
    #[validate(length(min = 1, max = 500))]
    pub ids: Vec<i64>,
}

/// Number of users assigned to roles.
pub struct RoleUserCountUseCase {
    repo: Arc<dyn RoleRepository>,
}

impl RoleUserCountUseCase {
    pub fn new(repo: Arc<dyn RoleRepository>) -> Self {
        Self { repo }
    }

    pub async fn count_one(&self, role_id: i64) -> Result<i64, AppError> {
        Ok(self.repo.get_user_count(role_id).await?)
    }

    pub async fn count_many(&self, role_ids: &[i64]) -> Result<BTreeMap<i64, i64>, AppError> {
        Ok(self.repo.get_user_counts(role_ids).await?)
    }
}
