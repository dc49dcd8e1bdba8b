use crate::infrastructure::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    /// Number of stored roles, absent when the roles table can't be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<i64>,
    pub search_locale: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database and roles table reachable", body = HealthStatus),
        (status = 503, description = "Database unreachable", body = HealthStatus)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let sql = format!("SELECT COUNT(*) FROM {}", state.config.table("roles"));
    let roles = sqlx::query_scalar::<_, i64>(&sql).fetch_one(&state.pool).await;

    let (code, status, database, roles) = match roles {
        Ok(count) => (StatusCode::OK, "healthy", "connected", Some(count)),
        Err(sqlx::Error::Database(e)) => {
            tracing::error!(error = %e, "roles table unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "connected", None)
        }
        Err(e) => {
            tracing::error!(error = %e, "database unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected", None)
        }
    };

    (
        code,
        Json(HealthStatus {
            status: status.to_string(),
            database: database.to_string(),
            roles,
            search_locale: state.translator.locale().to_string(),
        }),
    )
}
