use crate::domain::roles::{Role, RoleSummary};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct RoleDbModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_admin: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<RoleDbModel> for Role {
    fn from(model: RoleDbModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            is_admin: model.is_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RoleSummaryDbModel {
    pub id: i64,
    pub name: String,
}

impl From<RoleSummaryDbModel> for RoleSummary {
    fn from(model: RoleSummaryDbModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}
