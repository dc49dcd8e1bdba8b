//! Predicate expressions with named parameters.
//!
//! Repositories describe WHERE clauses as an [`Expr`] tree plus a
//! [`Parameters`] mapping. Rendering into a `sqlx::QueryBuilder` turns named
//! parameters into positional binds and rejects mappings that bind a name the
//! expression never references (or reference a name that is never bound).

use sqlx::{Postgres, QueryBuilder};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub type Parameters = BTreeMap<String, String>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("parameter `{0}` is bound but not used by the query")]
    UnusedParameter(String),
    #[error("parameter `{0}` is used by the query but not bound")]
    UnboundParameter(String),
    #[error("cannot order by `{0}`")]
    InvalidOrderColumn(String),
}

fn bool_sql(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Comparison against a boolean inlined into the SQL text.
    Eq { column: String, value: bool },
    Like { column: String, param: String },
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    pub fn eq(column: impl Into<String>, value: bool) -> Self {
        Expr::Eq {
            column: column.into(),
            value,
        }
    }

    pub fn like(column: impl Into<String>, param: impl Into<String>) -> Self {
        Expr::Like {
            column: column.into(),
            param: param.into(),
        }
    }

    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut exprs) => {
                exprs.push(other);
                Expr::And(exprs)
            }
            expr => Expr::And(vec![expr, other]),
        }
    }

    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut exprs) => {
                exprs.push(other);
                Expr::Or(exprs)
            }
            expr => Expr::Or(vec![expr, other]),
        }
    }

    fn referenced_params<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Eq { .. } => {}
            Expr::Like { param, .. } => {
                out.insert(param.as_str());
            }
            Expr::Not(inner) => inner.referenced_params(out),
            Expr::And(exprs) | Expr::Or(exprs) => {
                for expr in exprs {
                    expr.referenced_params(out);
                }
            }
        }
    }

    fn push_to(&self, query: &mut QueryBuilder<'static, Postgres>, params: &Parameters) {
        match self {
            Expr::Eq { column, value } => {
                query.push(column).push(" = ").push(bool_sql(*value));
            }
            Expr::Like { column, param } => {
                // presence checked by `check_parameters`
                let value = params.get(param).cloned().unwrap_or_default();
                query.push(column).push(" LIKE ").push_bind(value);
            }
            Expr::Not(inner) => {
                query.push("NOT (");
                inner.push_to(query, params);
                query.push(")");
            }
            Expr::And(exprs) => push_joined(query, exprs, " AND ", "TRUE", params),
            Expr::Or(exprs) => push_joined(query, exprs, " OR ", "FALSE", params),
        }
    }
}

fn push_joined(
    query: &mut QueryBuilder<'static, Postgres>,
    exprs: &[Expr],
    separator: &str,
    empty: &str,
    params: &Parameters,
) {
    if exprs.is_empty() {
        query.push(empty);
        return;
    }

    query.push("(");
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            query.push(separator);
        }
        expr.push_to(query, params);
    }
    query.push(")");
}

/// An optional predicate together with the parameters it binds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub expr: Option<Expr>,
    pub params: Parameters,
}

impl Fragment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(expr: Expr, params: Parameters) -> Self {
        Self {
            expr: Some(expr),
            params,
        }
    }

    /// Predicate without bound parameters.
    pub fn predicate(expr: Expr) -> Self {
        Self::new(expr, Parameters::new())
    }

    pub fn negated_if(self, not: bool) -> Self {
        if !not {
            return self;
        }
        Self {
            expr: self.expr.map(Expr::negate),
            params: self.params,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expr.is_none()
    }

    pub fn check_parameters(&self) -> Result<(), QueryError> {
        let mut referenced = BTreeSet::new();
        if let Some(expr) = &self.expr {
            expr.referenced_params(&mut referenced);
        }

        if let Some(missing) = referenced.iter().find(|name| !self.params.contains_key(**name)) {
            return Err(QueryError::UnboundParameter(missing.to_string()));
        }

        if let Some(unused) = self
            .params
            .keys()
            .find(|name| !referenced.contains(name.as_str()))
        {
            return Err(QueryError::UnusedParameter(unused.clone()));
        }

        Ok(())
    }

    /// Appends ` WHERE <predicate>` when a predicate is present.
    pub fn push_where(&self, query: &mut QueryBuilder<'static, Postgres>) -> Result<(), QueryError> {
        self.check_parameters()?;

        if let Some(expr) = &self.expr {
            query.push(" WHERE ");
            expr.push_to(query, &self.params);
        }

        Ok(())
    }
}
