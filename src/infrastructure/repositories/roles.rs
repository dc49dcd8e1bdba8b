use crate::domain::listing::{Entities, ListArgs, OrderBy};
use crate::domain::roles::{Role, RoleRepository, RoleSearchCommand, RoleSummary};
use crate::infrastructure::config::RepositoryConfig;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::roles::{RoleDbModel, RoleSummaryDbModel};
use crate::infrastructure::repositories::common::{
    CommonRepository, EntityQuery, SelectQuery, standard_catch_all,
};
use crate::infrastructure::repositories::expr::{Expr, Fragment, Parameters};
use crate::shared::search::SearchFilter;
use crate::shared::translation::{CommandTable, Translator};
use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const ROLE_ALIAS: &str = "r";

const ROLE_COLUMNS: &[&str] = &[
    "r.id",
    "r.name",
    "r.description",
    "r.is_admin",
    "r.created_at",
    "r.updated_at",
];

/// `description` is nullable; coalesced so a negated term keeps those rows.
const CATCH_ALL_COLUMNS: &[&str] = &["r.name", "COALESCE(r.description, '')"];

/// Role specific hooks of the generic listing.
#[derive(Debug, Clone)]
pub struct RoleQuery {
    commands: CommandTable<RoleSearchCommand>,
}

impl RoleQuery {
    pub fn new(translator: &Translator) -> Self {
        Self {
            commands: CommandTable::new(translator, &RoleSearchCommand::ALL, RoleSearchCommand::key),
        }
    }
}

impl EntityQuery for RoleQuery {
    type Row = RoleDbModel;
    type Entity = Role;

    fn table_alias(&self) -> &'static str {
        ROLE_ALIAS
    }

    fn sortable_columns(&self) -> &'static [&'static str] {
        ROLE_COLUMNS
    }

    fn default_order(&self) -> Vec<OrderBy> {
        vec![OrderBy::asc("r.name")]
    }

    fn search_commands(&self) -> &'static [&'static str] {
        RoleSearchCommand::keys()
    }

    fn catch_all_where_clause(&self, filter: &SearchFilter, param: &str) -> Fragment {
        standard_catch_all(CATCH_ALL_COLUMNS, filter, param)
    }

    fn search_command_where_clause(&self, filter: &SearchFilter, param: &str) -> Fragment {
        let fragment = match self.commands.resolve(&filter.command) {
            // the flag is inlined, so nothing is bound for this command
            Some(RoleSearchCommand::IsAdmin) => Fragment::predicate(Expr::eq("r.is_admin", true)),
            Some(RoleSearchCommand::Name) => Fragment::new(
                Expr::like("r.name", param),
                Parameters::from([(param.to_string(), filter.like_value())]),
            ),
            None => Fragment::empty(),
        };

        fragment.negated_if(filter.not)
    }
}

#[derive(Clone)]
pub struct PostgresRoleRepository {
    config: Arc<RepositoryConfig>,
    common: CommonRepository<RoleQuery>,
}

impl PostgresRoleRepository {
    pub fn new(pool: DbPool, config: Arc<RepositoryConfig>, translator: Arc<Translator>) -> Self {
        let query = RoleQuery::new(&translator);
        Self {
            config,
            common: CommonRepository::new(pool, query, translator),
        }
    }

    fn select(&self) -> SelectQuery {
        SelectQuery {
            table: self.config.table("roles"),
            alias: ROLE_ALIAS,
            columns: ROLE_COLUMNS,
        }
    }

    fn role_list_query(&self, search: &str, limit: i64, start: i64) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new("SELECT r.id, r.name FROM ");
        query.push(self.config.table("roles")).push(" r");

        if !search.is_empty() {
            query
                .push(" WHERE r.name LIKE ")
                .push_bind(format!("{}%", search));
        }

        query.push(" ORDER BY r.name ASC");

        if limit > 0 {
            query
                .push(" LIMIT ")
                .push_bind(limit)
                .push(" OFFSET ")
                .push_bind(start.max(0));
        }

        query
    }

    fn user_count_query(&self, role_ids: &[i64]) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new("SELECT u.role_id, COUNT(u.id) AS thecount FROM ");
        query
            .push(self.config.table("users"))
            .push(" u WHERE u.role_id = ANY(")
            .push_bind(role_ids.to_vec())
            .push(") GROUP BY u.role_id");
        query
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    #[tracing::instrument(skip(self))]
    async fn get_entities(&self, args: ListArgs) -> Result<Entities<Role>, anyhow::Error> {
        self.common.get_entities(self.select(), &args).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_role_list(
        &self,
        search: &str,
        limit: i64,
        start: i64,
    ) -> Result<Vec<RoleSummary>, anyhow::Error> {
        let mut query = self.role_list_query(search, limit, start);
        let rows = query
            .build_query_as::<RoleSummaryDbModel>()
            .fetch_all(self.common.pool())
            .await?;

        Ok(rows.into_iter().map(RoleSummary::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn get_user_count(&self, role_id: i64) -> Result<i64, anyhow::Error> {
        let counts = self.get_user_counts(&[role_id]).await?;
        Ok(counts.get(&role_id).copied().unwrap_or(0))
    }

    #[tracing::instrument(skip(self))]
    async fn get_user_counts(&self, role_ids: &[i64]) -> Result<BTreeMap<i64, i64>, anyhow::Error> {
        if role_ids.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut query = self.user_count_query(role_ids);
        let rows = query
            .build_query_as::<(i64, i64)>()
            .fetch_all(self.common.pool())
            .await?;

        let mut counts: BTreeMap<i64, i64> = rows.into_iter().collect();

        // Ensure roles without users have a value
        for id in role_ids {
            counts.entry(*id).or_insert(0);
        }

        Ok(counts)
    }

    fn search_commands(&self) -> &'static [&'static str] {
        self.common.entity_query().search_commands()
    }
}
