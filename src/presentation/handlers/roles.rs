use crate::application::roles::list::{ListRolesRequest, ListRolesUseCase};
use crate::application::roles::lookup::{LookupRolesRequest, LookupRolesUseCase};
use crate::application::roles::search_commands::{SearchCommand, SearchCommandsUseCase};
use crate::application::roles::user_count::{RoleUserCountUseCase, UserCountsRequest};
use crate::domain::roles::{Role, RoleRepository, RoleSummary};
use crate::infrastructure::state::AppState;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::pagination::PaginationLinkBuilder;
use crate::shared::response::{JsonApiMeta, JsonApiResource, JsonApiResponse};
use crate::shared::validation::ValidatedQs;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResource {
    pub name: String,
    pub description: Option<String>,
    pub is_admin: bool,
    pub user_count: i64,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String)]
    pub created_at: time::OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String)]
    pub updated_at: time::OffsetDateTime,
}

impl RoleResource {
    pub fn new(role: Role, user_count: i64) -> Self {
        Self {
            name: role.name,
            description: role.description,
            is_admin: role.is_admin,
            user_count,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct RoleSummaryResource {
    pub name: String,
}

impl From<RoleSummary> for JsonApiResource<RoleSummaryResource> {
    fn from(role: RoleSummary) -> Self {
        JsonApiResource::new(
            "roles",
            role.id.to_string(),
            RoleSummaryResource { name: role.name },
        )
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleUserCountResource {
    pub role_id: i64,
    pub user_count: i64,
}

fn role_repository(state: &AppState) -> Arc<dyn RoleRepository> {
    Arc::new(state.role_repository())
}

/// List roles with search and pagination
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    params(
        ("filter" = Option<String>, Query, description = "Search string, e.g. `is:admin` or `!name:sales`"),
        ("page[number]" = Option<i64>, Query, description = "Page number (1-indexed)", minimum = 1),
        ("page[size]" = Option<i64>, Query, description = "Page size", minimum = 1, maximum = 100),
        ("sort" = Option<String>, Query, description = "Comma separated fields, `-` prefix for descending"),
        ("all" = Option<bool>, Query, description = "Return every match without pagination")
    ),
    responses(
        (status = 200, description = "List of roles", body = JsonApiResponse<Vec<JsonApiResource<RoleResource>>>),
        (status = 422, description = "Invalid query", body = ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn list_roles(
    State(state): State<AppState>,
    uri: Uri,
    ValidatedQs(req): ValidatedQs<ListRolesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let repo = role_repository(&state);

    let page = req.page.normalized();
    let paginated = !req.all;
    let filter = req.filter.clone();
    let sort = req.sort.clone();

    let roles = ListRolesUseCase::new(repo.clone()).execute(req).await?;
    let total = roles.total();

    let ids: Vec<i64> = roles.items().iter().map(|role| role.id).collect();
    let counts = RoleUserCountUseCase::new(repo).count_many(&ids).await?;

    let resources: Vec<JsonApiResource<RoleResource>> = roles
        .into_items()
        .into_iter()
        .map(|role| {
            let user_count = counts.get(&role.id).copied().unwrap_or(0);
            JsonApiResource::new("roles", role.id.to_string(), RoleResource::new(role, user_count))
        })
        .collect();

    let mut meta = JsonApiMeta::new().with_total(total);
    let mut response = JsonApiResponse::new(resources);

    if paginated {
        meta = meta.with_page(page.number).with_per_page(page.size);
        let links = PaginationLinkBuilder::from_uri(&uri, page.number, page.size, total)
            .with_query("filter", filter.as_deref())
            .with_query("sort", sort.as_deref())
            .build();
        response = response.with_links(links);
    }

    Ok((StatusCode::OK, Json(response.with_meta(meta))))
}

/// Look up roles by name prefix
#[utoipa::path(
    get,
    path = "/api/v1/roles/lookup",
    params(LookupRolesRequest),
    responses(
        (status = 200, description = "Matching roles ordered by name", body = JsonApiResponse<Vec<JsonApiResource<RoleSummaryResource>>>),
        (status = 422, description = "Invalid query", body = ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn lookup_roles(
    State(state): State<AppState>,
    ValidatedQs(req): ValidatedQs<LookupRolesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let roles = LookupRolesUseCase::new(role_repository(&state))
        .execute(req)
        .await?;

    let resources: Vec<JsonApiResource<RoleSummaryResource>> =
        roles.into_iter().map(Into::into).collect();

    Ok((StatusCode::OK, Json(JsonApiResponse::new(resources))))
}

/// Count users for several roles
#[utoipa::path(
    get,
    path = "/api/v1/roles/user-counts",
    params(
        ("ids" = Vec<i64>, Query, description = "Role ids, e.g. `ids[0]=1&ids[1]=2`")
    ),
    responses(
        (status = 200, description = "User count per requested role id", body = JsonApiResponse<Vec<RoleUserCountResource>>),
        (status = 422, description = "Invalid query", body = ErrorResponse)
    ),
    tag = "roles"
)]
pub async fn user_counts(
    State(state): State<AppState>,
    ValidatedQs(req): ValidatedQs<UserCountsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let counts = RoleUserCountUseCase::new(role_repository(&state))
        .count_many(&req.ids)
        .await?;

    let data: Vec<RoleUserCountResource> = counts
        .into_iter()
        .map(|(role_id, user_count)| RoleUserCountResource {
            role_id,
            user_count,
        })
        .collect();

    Ok((StatusCode::OK, Json(JsonApiResponse::new(data))))
}

/// Count users assigned to a role
#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}/user-count",
    params(
        ("id" = i64, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "User count of the role", body = JsonApiResponse<RoleUserCountResource>)
    ),
    tag = "roles"
)]
pub async fn role_user_count(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_count = RoleUserCountUseCase::new(role_repository(&state))
        .count_one(id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(JsonApiResponse::new(RoleUserCountResource {
            role_id: id,
            user_count,
        })),
    ))
}

/// Search commands accepted by the role filter
#[utoipa::path(
    get,
    path = "/api/v1/roles/search-commands",
    responses(
        (status = 200, description = "Localized search commands", body = JsonApiResponse<Vec<SearchCommand>>)
    ),
    tag = "roles"
)]
pub async fn search_commands(State(state): State<AppState>) -> impl IntoResponse {
    let commands =
        SearchCommandsUseCase::new(role_repository(&state), state.translator.clone()).execute();

    let meta = JsonApiMeta::new().with_extra(json!({ "locale": state.translator.locale() }));
    (
        StatusCode::OK,
        Json(JsonApiResponse::new(commands).with_meta(meta)),
    )
}
