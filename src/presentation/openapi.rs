use crate::application::roles::list::ListRolesRequest;
use crate::application::roles::lookup::LookupRolesRequest;
use crate::application::roles::search_commands::SearchCommand;
use crate::application::roles::user_count::UserCountsRequest;
use crate::presentation::handlers::health::HealthStatus;
use crate::presentation::handlers::roles::{
    RoleResource, RoleSummaryResource, RoleUserCountResource,
};
use crate::shared::error::{ErrorResponse, JsonApiError, JsonApiErrorSource};
use crate::shared::pagination::PageParams;
use crate::shared::response::{JsonApiLinks, JsonApiMeta};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rolekit Role API",
        version = "0.1.0",
        description = "Read-only role listing, lookup and user counts.\n\nResponses follow the JSON:API v1.1 specification."
    ),
    paths(
        crate::presentation::handlers::roles::list_roles,
        crate::presentation::handlers::roles::lookup_roles,
        crate::presentation::handlers::roles::user_counts,
        crate::presentation::handlers::roles::role_user_count,
        crate::presentation::handlers::roles::search_commands,
        crate::presentation::handlers::health::health_check,
    ),
    components(
        schemas(
            ListRolesRequest,
            LookupRolesRequest,
            UserCountsRequest,
            PageParams,
            RoleResource,
            RoleSummaryResource,
            RoleUserCountResource,
            SearchCommand,
            JsonApiMeta,
            JsonApiLinks,
            ErrorResponse,
            JsonApiError,
            JsonApiErrorSource,
            HealthStatus,
        )
    ),
    tags(
        (name = "roles", description = "Role listing and statistics"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;
