use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::RequestPartsExt;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Wraps [`axum::extract::Query`] so a missing or malformed query string
/// produces the same `{ "error": "<message>" }` JSON body as every other
/// 4xx response, instead of axum's plain-text rejection.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = parts.extract::<Query<T>>().await.map_err(ApiError::from)?;
        Ok(Self(value))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.to_string())
    }
}
