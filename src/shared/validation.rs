use crate::shared::error::AppError;
use crate::shared::query::Qs;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query string extractor that runs `validator` rules after deserializing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQs<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQs<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Qs(value) = Qs::<T>::from_request_parts(parts, state).await?;

        value
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        Ok(ValidatedQs(value))
    }
}
