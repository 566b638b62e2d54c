//! Route table
//!
//! Every API route is declared once in [`route_table`] together with the
//! roles allowed to call it. [`build_router`] turns the table into an axum
//! [`Router`], wrapping each protected entry in an [`AuthLayer`]. The router
//! is built at startup and never changes afterwards.

use std::path::PathBuf;

use auth::{AccessPolicy, Role};
use axum::routing::{delete, get, post, put, MethodRouter};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, health, posts};
use crate::middleware::AuthLayer;
use crate::state::AppState;

/// One API route and who may call it
pub struct RouteEntry {
    pub path: &'static str,
    pub policy: AccessPolicy,
    pub handler: MethodRouter<AppState>,
}

impl RouteEntry {
    fn new(path: &'static str, policy: AccessPolicy, handler: MethodRouter<AppState>) -> Self {
        Self {
            path,
            policy,
            handler,
        }
    }
}

/// The API routes, in registration order.
pub fn route_table() -> Vec<RouteEntry> {
    let authors = || AccessPolicy::roles([Role::User, Role::Admin]);
    let admins = || AccessPolicy::roles([Role::Admin]);

    vec![
        RouteEntry::new(
            "/api/accounts/register",
            AccessPolicy::Public,
            post(accounts::register),
        ),
        RouteEntry::new(
            "/api/accounts/login",
            AccessPolicy::Public,
            post(accounts::login),
        ),
        RouteEntry::new("/api/posts", AccessPolicy::Public, get(posts::search)),
        RouteEntry::new("/api/posts/:id", AccessPolicy::Public, get(posts::get)),
        RouteEntry::new("/api/posts", authors(), post(posts::create)),
        RouteEntry::new("/api/posts/:id", authors(), put(posts::update)),
        RouteEntry::new("/api/posts/:id", admins(), delete(posts::delete)),
        RouteEntry::new("/api/posts/publish/:id", admins(), put(posts::publish)),
        RouteEntry::new("/health", AccessPolicy::Public, get(health::health)),
    ]
}

/// Build the application router.
///
/// Paths no API route matches are served from `static_dir` when given.
pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new();

    for entry in route_table() {
        let handler = match entry.policy {
            AccessPolicy::Public => entry.handler,
            AccessPolicy::Roles(roles) => entry
                .handler
                .route_layer(AuthLayer::new(state.jwt.clone(), roles)),
        };
        router = router.route(entry.path, handler);
    }

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy_of(path: &str, method: &str) -> Option<AccessPolicy> {
        let table = route_table();
        let index = match (path, method) {
            ("/api/posts", "GET") => 2,
            ("/api/posts", "POST") => 4,
            ("/api/posts/:id", "PUT") => 5,
            ("/api/posts/:id", "DELETE") => 6,
            ("/api/posts/publish/:id", "PUT") => 7,
            _ => return None,
        };
        table.into_iter().nth(index).map(|e| {
            assert_eq!(e.path, path);
            e.policy
        })
    }

    #[test]
    fn test_route_policies() {
        assert_eq!(policy_of("/api/posts", "GET"), Some(AccessPolicy::Public));
        assert_eq!(
            policy_of("/api/posts", "POST"),
            Some(AccessPolicy::Roles(vec![Role::User, Role::Admin]))
        );
        assert_eq!(
            policy_of("/api/posts/:id", "PUT"),
            Some(AccessPolicy::Roles(vec![Role::User, Role::Admin]))
        );
        assert_eq!(
            policy_of("/api/posts/:id", "DELETE"),
            Some(AccessPolicy::Roles(vec![Role::Admin]))
        );
        assert_eq!(
            policy_of("/api/posts/publish/:id", "PUT"),
            Some(AccessPolicy::Roles(vec![Role::Admin]))
        );
    }

    #[test]
    fn test_account_routes_are_public() {
        let table = route_table();
        for entry in table.iter().filter(|e| e.path.starts_with("/api/accounts")) {
            assert_eq!(entry.policy, AccessPolicy::Public);
        }
    }
}
