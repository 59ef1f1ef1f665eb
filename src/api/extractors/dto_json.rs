//! DTO extractor - parses a JSON body and runs presence validation.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;

use crate::domain::Dto;
use crate::errors::AppError;

/// Extracts a validated DTO from the request body.
///
/// Unparseable JSON is a `BAD_REQUEST`; a body that fails
/// [`Dto::create`] is a `VALIDATION_ERROR` carrying `"Invalid Data"`.
///
/// ```rust,ignore
/// async fn login(DtoJson(dto): DtoJson<LoginDto>) { /* dto is validated */ }
/// ```
pub struct DtoJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for DtoJson<T>
where
    S: Send + Sync,
    T: Dto,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(DtoJson(T::create(&body)?))
    }
}
