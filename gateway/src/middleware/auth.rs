//! Role-based authorization layer.
//!
//! Wraps a protected route. Each request's `Authorization` header is checked
//! against the route's allowed roles; on success the verified [`Claims`] are
//! placed in the request extensions for the handler, otherwise the request is
//! answered with the rejection status and the inner service is never called.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use auth::{authorize, current_timestamp, Claims, JwtManager, Role};
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::{IntoResponse, Response};
use error::AuthError;
use tower::{Layer, Service};

use crate::response::ApiError;

/// Layer that restricts a route to a set of roles.
#[derive(Clone)]
pub struct AuthLayer {
    jwt: Arc<JwtManager>,
    allowed: Arc<[Role]>,
}

impl AuthLayer {
    pub fn new(jwt: Arc<JwtManager>, allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            jwt,
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt: self.jwt.clone(),
            allowed: self.allowed.clone(),
        }
    }
}

/// Service produced by [`AuthLayer`].
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt: Arc<JwtManager>,
    allowed: Arc<[Role]>,
}

impl<S> AuthMiddleware<S> {
    fn check(&self, req: &Request<Body>) -> Result<Claims, AuthError> {
        // Header bytes need not be ASCII; undecodable bytes become U+FFFD.
        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .map(|value| String::from_utf8_lossy(value.as_bytes()));
        authorize(
            &self.jwt,
            header.as_deref(),
            &self.allowed,
            current_timestamp(),
        )
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        match self.check(&req) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                // The clone may not be ready; call the instance poll_ready drove.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            Err(e) => {
                tracing::debug!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    reason = %e,
                    "Request rejected"
                );
                let response = ApiError::from(e).into_response();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
