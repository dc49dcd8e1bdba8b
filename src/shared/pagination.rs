use crate::shared::response::JsonApiLinks;
use axum::http::Uri;
use serde::Deserialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::Validate;

pub const MAX_PAGE_SIZE: i64 = 100;

pub fn default_page_number() -> i64 {
    1
}

pub fn default_page_size() -> i64 {
    20
}

/// `page[number]` / `page[size]` query parameters
#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct PageParams {
    #[serde(default = "default_page_number")]
    #[validate(range(min = 1))]
    pub number: i64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            number: default_page_number(),
            size: default_page_size(),
        }
    }
}

impl PageParams {
    /// Clamps the page into valid bounds.
    pub fn normalized(self) -> Self {
        Self {
            number: self.number.max(1),
            size: self.size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Zero-based row offset of the first item on the page, `None` when it
    /// does not fit in an `i64`.
    pub fn start(&self) -> Option<i64> {
        (self.number.max(1) - 1).checked_mul(self.size)
    }
}

/// Builds JSON:API pagination links, keeping extra query parameters such as
/// the search filter on every link.
pub struct PaginationLinkBuilder {
    base_url: String,
    extra_query: BTreeMap<String, String>,
    page_number: i64,
    page_size: i64,
    total_pages: i64,
}

impl PaginationLinkBuilder {
    pub fn from_uri(uri: &Uri, page_number: i64, page_size: i64, total: i64) -> Self {
        Self::new(uri.path(), page_number, page_size, total)
    }

    pub fn new(base_url: impl Into<String>, page_number: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if total > 0 && page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };

        Self {
            base_url: base_url.into(),
            extra_query: BTreeMap::new(),
            page_number,
            page_size,
            total_pages,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.extra_query.insert(key.into(), value.to_string());
        }
        self
    }

    pub fn build(self) -> JsonApiLinks {
        let extra = self.encoded_extra_query();
        let link = |page: i64| self.page_link(page, &extra);

        let mut links = JsonApiLinks::new()
            .with_self(link(self.page_number))
            .with_first(link(1));

        if self.total_pages > 0 {
            links = links.with_last(link(self.total_pages));
        }

        if self.page_number > 1 {
            links = links.with_prev(link(self.page_number - 1));
        }

        if self.page_number < self.total_pages {
            links = links.with_next(link(self.page_number + 1));
        }

        links
    }

    fn encoded_extra_query(&self) -> String {
        if self.extra_query.is_empty() {
            return String::new();
        }

        match serde_qs::to_string(&self.extra_query) {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!("Failed to encode pagination query: {}", e);
                String::new()
            }
        }
    }

    fn page_link(&self, page: i64, extra: &str) -> String {
        let mut link = format!(
            "{}?page[number]={}&page[size]={}",
            self.base_url, page, self.page_size
        );
        if !extra.is_empty() {
            link.push('&');
            link.push_str(extra);
        }
        link
    }
}
