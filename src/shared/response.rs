use serde::Serialize;
use utoipa::ToSchema;

/// JSON:API top-level document
#[derive(Debug, Serialize, ToSchema)]
pub struct JsonApiResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<JsonApiMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<JsonApiLinks>,
}

impl<T> JsonApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: None,
            links: None,
        }
    }

    pub fn with_meta(mut self, meta: JsonApiMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_links(mut self, links: JsonApiLinks) -> Self {
        self.links = Some(links);
        self
    }
}

/// JSON:API resource object
#[derive(Debug, Serialize, ToSchema)]
pub struct JsonApiResource<T> {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    pub attributes: T,
}

impl<T> JsonApiResource<T> {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>, attributes: T) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            attributes,
        }
    }
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JsonApiMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub extra: Option<serde_json::Value>,
}

impl JsonApiMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn with_total(mut self, total: i64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct JsonApiLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl JsonApiLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_self(mut self, link: String) -> Self {
        self.self_link = Some(link);
        self
    }

    pub fn with_first(mut self, link: String) -> Self {
        self.first = Some(link);
        self
    }

    pub fn with_last(mut self, link: String) -> Self {
        self.last = Some(link);
        self
    }

    pub fn with_prev(mut self, link: String) -> Self {
        self.prev = Some(link);
        self
    }

    pub fn with_next(mut self, link: String) -> Self {
        self.next = Some(link);
        self
    }
}
