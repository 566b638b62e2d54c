//! Request extractors
//!
//! Bodies and query strings are parsed leniently: a JSON body is accepted
//! whatever its `Content-Type`, and a repeated query parameter resolves to
//! its first value. Failures are reported in the usual error envelope.

use std::collections::HashMap;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use error::AppError;
use serde::de::DeserializeOwned;

use crate::response::{ApiError, BAD_REQUEST_BODY};

/// JSON body parsed regardless of the request's content type.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read request body");
            bad_body()
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!(error = %e, "Rejected request body");
            bad_body()
        })
    }
}

fn bad_body() -> ApiError {
    ApiError::from(AppError::Validation(BAD_REQUEST_BODY.to_string()))
}

/// Query parameters keyed by name, keeping the first value of each.
#[derive(Debug, Default)]
pub struct FirstQuery(pub HashMap<String, String>);

impl FirstQuery {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for FirstQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = HashMap::new();
        for (key, value) in pairs {
            params.entry(key).or_insert(value);
        }
        Self(params)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for FirstQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e.body_text(), "Rejected query string");
                ApiError::from(AppError::Validation("invalid query string".to_string()))
            })?;
        Ok(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: String,
    }

    async fn parse_body(req: Request) -> Result<Payload, ApiError> {
        JsonBody::<Payload>::from_request(req, &()).await.map(|b| b.0)
    }

    #[tokio::test]
    async fn test_json_body_ignores_content_type() {
        for content_type in [None, Some("text/plain"), Some("application/json")] {
            let mut builder = axum::http::Request::builder().method("POST").uri("/");
            if let Some(value) = content_type {
                builder = builder.header(header::CONTENT_TYPE, value);
            }
            let req = builder.body(Body::from(r#"{"name":"alice"}"#)).unwrap();
            assert_eq!(
                parse_body(req).await.unwrap(),
                Payload {
                    name: "alice".to_string()
                }
            );
        }
    }

    #[tokio::test]
    async fn test_json_body_rejects_garbage() {
        for body in ["", "{", "[1,2]"] {
            let req = axum::http::Request::builder()
                .uri("/")
                .body(Body::from(body))
                .unwrap();
            let err = parse_body(req).await.unwrap_err();
            assert_eq!(err.0.status(), 400);
            assert_eq!(
                err.0.to_string(),
                format!("Validation error: {}", BAD_REQUEST_BODY)
            );
        }
    }

    #[tokio::test]
    async fn test_first_query_keeps_first_value() {
        let req = axum::http::Request::builder()
            .uri("/api/posts?tag=rust&tag=go&page=2&name=a%20b")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = req.into_parts();

        let query = FirstQuery::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(query.get("tag"), Some("rust"));
        assert_eq!(query.get("page"), Some("2"));
        assert_eq!(query.get("name"), Some("a b"));
        assert_eq!(query.get("limit"), None);
    }
}
