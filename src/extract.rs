//! axum glue: pull a [`GridRequest`] out of the query string and send a
//! [`GridResponse`] back as JSON.
//!
//! ```rust,ignore
//! async fn list_users(
//!     State(db): State<DatabaseConnection>,
//!     GridQuery(request): GridQuery,
//! ) -> Result<GridResponse<serde_json::Value>, GridError> {
//!     users_table()?.translate(&db, &request).await
//! }
//! ```
//!
//! POSTed JSON bodies work through `axum::Json<GridRequest>`.

use axum::{
    Json,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::convert::Infallible;

use crate::datatable::GridResponse;
use crate::request::GridRequest;

/// Extractor for the bracket-notation query string DataTables sends.
/// Never rejects: malformed values fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridQuery(pub GridRequest);

impl<S> FromRequestParts<S> for GridQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        Ok(Self(GridRequest::from_query(query)))
    }
}

impl<T: Serialize> IntoResponse for GridResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
