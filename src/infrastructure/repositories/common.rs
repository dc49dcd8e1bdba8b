//! Generic entity listing shared by the repositories.
//!
//! [`CommonRepository`] turns [`ListArgs`] into a select: it parses the
//! search filter, asks the entity's [`EntityQuery`] hooks for the predicate of
//! each term, applies the requested or default order and wraps the rows in
//! [`Entities`].

use crate::domain::listing::{Entities, ListArgs, OrderBy, Paginated};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::repositories::expr::{Expr, Fragment, Parameters, QueryError};
use crate::shared::search::{self, Connective, SearchFilter};
use crate::shared::translation::Translator;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Postgres, QueryBuilder};
use std::sync::Arc;

/// Entity specific pieces of a listing query.
pub trait EntityQuery: Send + Sync {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;
    type Entity: From<Self::Row> + Send;

    fn table_alias(&self) -> &'static str;

    /// Alias-qualified columns allowed in ORDER BY.
    fn sortable_columns(&self) -> &'static [&'static str];

    fn default_order(&self) -> Vec<OrderBy>;

    /// Translation keys of the search commands the entity understands.
    fn search_commands(&self) -> &'static [&'static str];

    /// Predicate for a free-text term. `param` is the name reserved for the
    /// term's bound value.
    fn catch_all_where_clause(&self, filter: &SearchFilter, param: &str) -> Fragment;

    /// Predicate for a `command:value` term, or an empty fragment when the
    /// command is not one of the entity's commands.
    fn search_command_where_clause(&self, filter: &SearchFilter, param: &str) -> Fragment;
}

/// OR of `column LIKE :param` over `columns`, negated when `filter.not` is set.
pub fn standard_catch_all(columns: &[&str], filter: &SearchFilter, param: &str) -> Fragment {
    let expr = columns
        .iter()
        .map(|column| Expr::like(*column, param))
        .reduce(Expr::or);

    let Some(expr) = expr else {
        return Fragment::empty();
    };

    Fragment::new(
        expr,
        Parameters::from([(param.to_string(), filter.like_value())]),
    )
    .negated_if(filter.not)
}

/// `SELECT <columns> FROM <table> <alias>` the listing starts from.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    pub table: String,
    pub alias: &'static str,
    pub columns: &'static [&'static str],
}

impl SelectQuery {
    fn push_from(&self, query: &mut QueryBuilder<'static, Postgres>) {
        query
            .push(" FROM ")
            .push(&self.table)
            .push(" ")
            .push(self.alias);
    }
}

#[derive(Clone)]
pub struct CommonRepository<Q> {
    pool: DbPool,
    query: Q,
    translator: Arc<Translator>,
}

impl<Q: EntityQuery> CommonRepository<Q> {
    pub fn new(pool: DbPool, query: Q, translator: Arc<Translator>) -> Self {
        Self {
            pool,
            query,
            translator,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn entity_query(&self) -> &Q {
        &self.query
    }

    /// Combines the predicates of every search term into one fragment.
    /// Terms whose command is not recognized contribute nothing.
    pub fn where_clause(&self, filter: Option<&str>) -> Fragment {
        let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
            return Fragment::empty();
        };

        let mut combined: Option<Expr> = None;
        let mut params = Parameters::new();

        for (i, term) in search::parse(filter, &self.translator)
            .into_iter()
            .enumerate()
        {
            let param = format!("p{}", i);
            let fragment = if term.filter.is_command() {
                self.query
                    .search_command_where_clause(&term.filter, &param)
            } else {
                self.query.catch_all_where_clause(&term.filter, &param)
            };

            let Some(expr) = fragment.expr else {
                tracing::debug!(command = %term.filter.command, "ignoring unrecognized search command");
                continue;
            };

            params.extend(fragment.params);
            combined = Some(match (combined, term.connective) {
                (None, _) => expr,
                (Some(acc), Connective::And) => acc.and(expr),
                (Some(acc), Connective::Or) => acc.or(expr),
            });
        }

        Fragment {
            expr: combined,
            params,
        }
    }

    /// Qualifies bare columns with the table alias and checks them against
    /// the sortable columns. Falls back to the default order.
    pub fn order_clause(&self, order_by: &[OrderBy]) -> Result<Vec<OrderBy>, QueryError> {
        let order = if order_by.is_empty() {
            self.query.default_order()
        } else {
            order_by.to_vec()
        };

        order
            .into_iter()
            .map(|order| {
                let column = if order.column.contains('.') {
                    order.column
                } else {
                    format!("{}.{}", self.query.table_alias(), order.column)
                };

                if !self.query.sortable_columns().contains(&column.as_str()) {
                    return Err(QueryError::InvalidOrderColumn(column));
                }

                Ok(OrderBy {
                    column,
                    direction: order.direction,
                })
            })
            .collect()
    }

    pub fn build_select(
        &self,
        select: &SelectQuery,
        args: &ListArgs,
        where_clause: &Fragment,
    ) -> Result<QueryBuilder<'static, Postgres>, QueryError> {
        let order = self.order_clause(&args.order_by)?;

        let mut query = QueryBuilder::new("SELECT ");
        query.push(select.columns.join(", "));
        select.push_from(&mut query);
        where_clause.push_where(&mut query)?;

        query.push(" ORDER BY ");
        let order_sql: Vec<String> = order
            .iter()
            .map(|o| format!("{} {}", o.column, o.direction.as_sql()))
            .collect();
        query.push(order_sql.join(", "));

        if args.is_limited() {
            query
                .push(" LIMIT ")
                .push_bind(args.limit)
                .push(" OFFSET ")
                .push_bind(args.start.max(0));
        }

        Ok(query)
    }

    pub fn build_count(
        &self,
        select: &SelectQuery,
        where_clause: &Fragment,
    ) -> Result<QueryBuilder<'static, Postgres>, QueryError> {
        let mut query = QueryBuilder::new("SELECT COUNT(*)");
        select.push_from(&mut query);
        where_clause.push_where(&mut query)?;
        Ok(query)
    }

    #[tracing::instrument(skip(self, select), fields(table = %select.table))]
    pub async fn get_entities(
        &self,
        select: SelectQuery,
        args: &ListArgs,
    ) -> Result<Entities<Q::Entity>, anyhow::Error> {
        let where_clause = self.where_clause(args.filter.as_deref());

        let mut query = self.build_select(&select, args, &where_clause)?;
        let rows = query
            .build_query_as::<Q::Row>()
            .fetch_all(&self.pool)
            .await?;
        let items: Vec<Q::Entity> = rows.into_iter().map(Into::into).collect();

        if args.ignore_paginator {
            return Ok(Entities::List(items));
        }

        let total = if args.is_limited() {
            let mut count = self.build_count(&select, &where_clause)?;
            count
                .build_query_scalar::<i64>()
                .fetch_one(&self.pool)
                .await?
        } else {
            items.len() as i64
        };

        Ok(Entities::Page(Paginated {
            items,
            total,
            start: args.start,
            limit: args.limit,
        }))
    }
}
