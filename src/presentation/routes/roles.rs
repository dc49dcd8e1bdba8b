use crate::infrastructure::state::AppState;
use crate::presentation::handlers::roles;
use axum::{Router, routing::get};

/// Read-only role routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(roles::list_roles))
        .route("/lookup", get(roles::lookup_roles))
        .route("/user-counts", get(roles::user_counts))
        .route("/search-commands", get(roles::search_commands))
        .route("/{id}/user-count", get(roles::role_user_count))
}
