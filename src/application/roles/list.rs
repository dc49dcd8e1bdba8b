use crate::domain::listing::{Entities, ListArgs, OrderBy};
use crate::domain::roles::{Role, RoleRepository};
use crate::shared::error::AppError;
use crate::shared::pagination::PageParams;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

const SORTABLE_FIELDS: &[(&str, &str)] = &[
    ("id", "r.id"),
    ("name", "r.name"),
    ("isAdmin", "r.is_admin"),
    ("createdAt", "r.created_at"),
    ("updatedAt", "r.updated_at"),
];

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ListRolesRequest {
    /// Search string, e.g. `is:admin` or `!name:sales`
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub page: PageParams,
    /// Comma separated fields, `-` prefix for descending
    #[serde(default)]
    pub sort: Option<String>,
    /// Return every match without pagination
    #[serde(default)]
    pub all: bool,
}

/// Parses a JSON:API sort value such as `-createdAt,name`.
pub fn parse_sort(sort: &str) -> Result<Vec<OrderBy>, AppError> {
    sort.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| {
            let (name, descending) = match field.strip_prefix('-') {
                Some(name) => (name, true),
                None => (field, false),
            };

            let column = SORTABLE_FIELDS
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, column)| *column)
                .ok_or_else(|| {
                    AppError::ValidationError(format!("Cannot sort roles by `{}`", name))
                })?;

            Ok(if descending {
                OrderBy::desc(column)
            } else {
                OrderBy::asc(column)
            })
        })
        .collect()
}

pub struct ListRolesUseCase {
    repo: Arc<dyn RoleRepository>,
}

impl ListRolesUseCase {
    pub fn new(repo: Arc<dyn RoleRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, req: ListRolesRequest) -> Result<Entities<Role>, AppError> {
        let mut args = ListArgs::new();

        if req.all {
            args = args.without_paginator();
        } else {
            let page = req.page.normalized();
            let start = page.start().ok_or_else(|| {
                AppError::ValidationError(format!("Page {} is out of range", page.number))
            })?;
            args = args.with_page(start, page.size);
        }

        if let Some(filter) = req.filter.filter(|f| !f.trim().is_empty()) {
            args = args.with_filter(filter);
        }

        if let Some(sort) = req.sort.as_deref() {
            args.order_by = parse_sort(sort)?;
        }

        Ok(self.repo.get_entities(args).await?)
    }
}
