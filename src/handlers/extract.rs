// handlers/extract.rs - validating extractors
//
// Wrap axum's Json and Query so every rejection comes back in the API error
// shape instead of axum's plain-text bodies.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body deserialized into `T`, then run through its `Validate` rules
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::bad_request(errors.to_string()))?;
        Ok(ValidJson(value))
    }
}

/// Query string deserialized into `T`; bad numbers or unknown keys become 400s
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(ValidQuery(value))
    }
}

/// Path parameters; a non-numeric job id is a 400 rather than axum's text reply
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(ValidPath(value))
    }
}
