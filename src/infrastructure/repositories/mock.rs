use crate::domain::listing::{Entities, ListArgs, Paginated, SortDirection};
use crate::domain::roles::{Role, RoleRepository, RoleSearchCommand, RoleSummary};
use crate::shared::search::{self, Connective, SearchFilter};
use crate::shared::translation::{CommandTable, Translator};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;

/// In-memory role store. Filters go through the same parser and command
/// labels as the Postgres repository; LIKE matching is emulated with
/// `contains` (or equality for strict terms).
#[derive(Clone)]
pub struct MockRoleRepository {
    roles: Arc<Mutex<Vec<Role>>>,
    user_roles: Arc<Mutex<Vec<i64>>>,
    translator: Arc<Translator>,
    commands: CommandTable<RoleSearchCommand>,
}

impl Default for MockRoleRepository {
    fn default() -> Self {
        Self::with_translator(Translator::english())
    }
}

fn matches_text(value: &str, filter: &SearchFilter) -> bool {
    if filter.strict {
        value == filter.string
    } else {
        value.contains(&filter.string)
    }
}

impl MockRoleRepository {
    pub fn with_translator(translator: Translator) -> Self {
        let commands =
            CommandTable::new(&translator, &RoleSearchCommand::ALL, RoleSearchCommand::key);
        Self {
            roles: Arc::default(),
            user_roles: Arc::default(),
            translator: Arc::new(translator),
            commands,
        }
    }

    pub fn add_role(&self, name: &str, description: Option<&str>, is_admin: bool) -> Role {
        let mut roles = self.roles.lock().unwrap();
        let role = Role {
            id: roles.len() as i64 + 1,
            name: name.to_string(),
            description: description.map(str::to_string),
            is_admin,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        roles.push(role.clone());
        role
    }

    pub fn add_user(&self, role_id: i64) {
        self.user_roles.lock().unwrap().push(role_id);
    }

    /// `None` when the term does not constrain anything, like an unknown
    /// command.
    fn matches_term(&self, role: &Role, filter: &SearchFilter) -> Option<bool> {
        let matched = if filter.is_command() {
            match self.commands.resolve(&filter.command)? {
                RoleSearchCommand::IsAdmin => role.is_admin,
                RoleSearchCommand::Name => matches_text(&role.name, filter),
            }
        } else {
            matches_text(&role.name, filter)
                || matches_text(role.description.as_deref().unwrap_or(""), filter)
        };

        Some(matched != filter.not)
    }

    fn matches(&self, role: &Role, filter: Option<&str>) -> bool {
        let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
            return true;
        };

        let mut combined: Option<bool> = None;
        for term in search::parse(filter, &self.translator) {
            let Some(matched) = self.matches_term(role, &term.filter) else {
                continue;
            };
            combined = Some(match (combined, term.connective) {
                (None, _) => matched,
                (Some(acc), Connective::And) => acc && matched,
                (Some(acc), Connective::Or) => acc || matched,
            });
        }

        combined.unwrap_or(true)
    }

    fn sorted_roles(&self, args: &ListArgs) -> Vec<Role> {
        let mut roles: Vec<Role> = self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|role| self.matches(role, args.filter.as_deref()))
            .cloned()
            .collect();

        let (column, direction) = args
            .order_by
            .first()
            .map(|o| (o.column.trim_start_matches("r."), o.direction))
            .unwrap_or(("name", SortDirection::Asc));

        roles.sort_by(|a, b| match column {
            "id" => a.id.cmp(&b.id),
            _ => a.name.cmp(&b.name),
        });
        if direction == SortDirection::Desc {
            roles.reverse();
        }

        roles
    }
}

#[async_trait]
impl RoleRepository for MockRoleRepository {
    async fn get_entities(&self, args: ListArgs) -> Result<Entities<Role>, anyhow::Error> {
        let roles = self.sorted_roles(&args);
        let total = roles.len() as i64;

        let items: Vec<Role> = if args.is_limited() {
            roles
                .into_iter()
                .skip(args.start.max(0) as usize)
                .take(args.limit as usize)
                .collect()
        } else {
            roles
        };

        if args.ignore_paginator {
            return Ok(Entities::List(items));
        }

        Ok(Entities::Page(Paginated {
            items,
            total,
            start: args.start,
            limit: args.limit,
        }))
    }

    async fn get_role_list(
        &self,
        search: &str,
        limit: i64,
        start: i64,
    ) -> Result<Vec<RoleSummary>, anyhow::Error> {
        let matches = self
            .sorted_roles(&ListArgs::new())
            .into_iter()
            .filter(|role| role.name.starts_with(search))
            .map(|role| RoleSummary {
                id: role.id,
                name: role.name,
            });

        Ok(if limit > 0 {
            matches
                .skip(start.max(0) as usize)
                .take(limit as usize)
                .collect()
        } else {
            matches.collect()
        })
    }

    async fn get_user_count(&self, role_id: i64) -> Result<i64, anyhow::Error> {
        let counts = self.get_user_counts(&[role_id]).await?;
        Ok(counts.get(&role_id).copied().unwrap_or(0))
    }

    async fn get_user_counts(&self, role_ids: &[i64]) -> Result<BTreeMap<i64, i64>, anyhow::Error> {
        let user_roles = self.user_roles.lock().unwrap();
        Ok(role_ids
            .iter()
            .map(|id| (*id, user_roles.iter().filter(|r| *r == id).count() as i64))
            .collect())
    }
}
