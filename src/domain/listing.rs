use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Arguments accepted by the generic entity listing.
///
/// `limit <= 0` disables the limit; `ignore_paginator` returns a plain list
/// without the total count query.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub filter: Option<String>,
    pub start: i64,
    pub limit: i64,
    pub order_by: Vec<OrderBy>,
    pub ignore_paginator: bool,
}

impl ListArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_page(mut self, start: i64, limit: i64) -> Self {
        self.start = start;
        self.limit = limit;
        self
    }

    pub fn with_order(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn without_paginator(mut self) -> Self {
        self.ignore_paginator = true;
        self
    }

    pub fn is_limited(&self) -> bool {
        self.limit > 0
    }
}

/// One page of matches plus the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub start: i64,
    pub limit: i64,
}

impl<T> Paginated<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entities<T> {
    Page(Paginated<T>),
    List(Vec<T>),
}

impl<T> Entities<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Entities::Page(page) => &page.items,
            Entities::List(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Entities::Page(page) => page.items,
            Entities::List(items) => items,
        }
    }

    /// Total number of matches. For a plain list this is the list length.
    pub fn total(&self) -> i64 {
        match self {
            Entities::Page(page) => page.total,
            Entities::List(items) => items.len() as i64,
        }
    }
}
