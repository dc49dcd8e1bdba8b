use super::listing::{Entities, ListArgs};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_admin: bool,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    pub updated_at: OffsetDateTime,
}

/// Partial projection of a role used by lookups and autocompletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub id: i64,
    pub name: String,
}

/// Arguments of the lightweight role lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleListQuery {
    pub search: String,
    pub limit: i64,
    pub start: i64,
}

impl Default for RoleListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            limit: 10,
            start: 0,
        }
    }
}

/// Search commands understood by the role listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleSearchCommand {
    IsAdmin,
    Name,
}

impl RoleSearchCommand {
    pub const ALL: [RoleSearchCommand; 2] = [RoleSearchCommand::IsAdmin, RoleSearchCommand::Name];

    /// Translation key of the command's localized label
    pub fn key(self) -> &'static str {
        match self {
            RoleSearchCommand::IsAdmin => "user.searchcommand.isadmin",
            RoleSearchCommand::Name => "core.searchcommand.name",
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &["user.searchcommand.isadmin", "core.searchcommand.name"]
    }
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists roles, paginated unless `args.ignore_paginator` is set.
    async fn get_entities(&self, args: ListArgs) -> Result<Entities<Role>, anyhow::Error>;

    /// Name-prefix lookup returning `{id, name}` pairs ordered by name.
    /// A `limit` of zero returns every match.
    async fn get_role_list(
        &self,
        search: &str,
        limit: i64,
        start: i64,
    ) -> Result<Vec<RoleSummary>, anyhow::Error>;

    async fn get_user_count(&self, role_id: i64) -> Result<i64, anyhow::Error>;

    /// Counts users per role. The result holds exactly the requested ids;
    /// roles without users map to zero.
    async fn get_user_counts(&self, role_ids: &[i64]) -> Result<BTreeMap<i64, i64>, anyhow::Error>;

    fn search_commands(&self) -> &'static [&'static str] {
        RoleSearchCommand::keys()
    }
}
