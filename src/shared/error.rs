use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Not found")]
    NotFound,
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// JSON:API error object
#[derive(Debug, Serialize, ToSchema)]
pub struct JsonApiError {
    pub status: String,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<JsonApiErrorSource>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JsonApiErrorSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

/// JSON:API error document
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<JsonApiError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, detail) = match self {
            AppError::ValidationError(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", msg)
            }
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database Error",
                    "Database error".to_string(),
                )
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "Not Found",
                "Resource not found".to_string(),
            ),
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            errors: vec![JsonApiError {
                status: status.as_u16().to_string(),
                title: title.to_string(),
                detail,
                source: None,
            }],
        };

        (status, Json(body)).into_response()
    }
}
