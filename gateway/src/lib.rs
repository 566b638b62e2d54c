//! Gateway library
//!
//! The HTTP surface of the blog backend, exposed as a library so the router
//! can be driven in-process by tests.

pub mod config;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use config::GatewayConfig;
pub use response::{ApiError, ApiResponse};
pub use router::{build_router, route_table, RouteEntry};
pub use state::AppState;
