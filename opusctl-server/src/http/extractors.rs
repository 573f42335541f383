//! Custom Axum extractors
//!
//! Each one rejects with `ApiError::Validation`, so malformed ids, bodies
//! and query strings become a 400 before any handler touches the database.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::error::ApiError;
use crate::models::{parse_id, Validate, ValidationError};

/// Extract and validate the single UUID segment of a path.
///
/// Errors name the field after the route parameter, so
/// `/works/by-composer/{composer_id}` reports `composerId`.
pub struct ValidUuid(pub Uuid);

/// Wire name for a route parameter.
fn param_field(name: &str) -> &'static str {
    match name {
        "composer_id" => "composerId",
        _ => "id",
    }
}

impl<S> FromRequestParts<S> for ValidUuid
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params): Path<Vec<(String, String)>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Missing { field: "id" }))?;

        let (name, value) = params
            .into_iter()
            .next()
            .ok_or(ApiError::Validation(ValidationError::Missing { field: "id" }))?;

        Ok(Self(parse_id(param_field(&name), &value)?))
    }
}

/// JSON body decoded into `R` and validated into `R::Output`
pub struct ValidJson<R: Validate>(pub R::Output);

impl<S, R> FromRequest<S> for ValidJson<R>
where
    S: Send + Sync,
    R: Validate + DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<R>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::Malformed {
                reason: rejection.body_text(),
            })
        })?;

        Ok(Self(raw.validate()?))
    }
}

/// Query string decoded into `R` and validated into `R::Output`
pub struct ValidQuery<R: Validate>(pub R::Output);

impl<S, R> FromRequestParts<S> for ValidQuery<R>
where
    S: Send + Sync,
    R: Validate + DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<R>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    reason: rejection.body_text(),
                })
            })?;

        Ok(Self(raw.validate()?))
    }
}
